use rusqlite::{params, Row};

use crate::db::models::Post;
use crate::db::StoreResult;
use crate::state::DbPool;

/// Fields supplied when creating or updating a post. The publication date
/// is set by the database on insert and never touched on update.
pub struct NewPost<'a> {
    pub title: &'a str,
    pub main_image: Option<&'a str>,
    pub text: &'a str,
    pub tags: &'a str,
}

fn row_to_post(row: &Row) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        title: row.get(1)?,
        main_image: row.get(2)?,
        publication_date: row.get(3)?,
        text: row.get(4)?,
        tags: row.get(5)?,
    })
}

/// Insert a post and return its id.
pub fn create(pool: &DbPool, post: &NewPost) -> StoreResult<i64> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO posts (title, main_image, text, tags) VALUES (?1, ?2, ?3, ?4)",
        params![post.title, post.main_image, post.text, post.tags],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update a post's editable fields. A missing id is a no-op.
pub fn update(pool: &DbPool, id: i64, post: &NewPost) -> StoreResult<()> {
    let conn = pool.get()?;
    conn.execute(
        "UPDATE posts SET title = ?1, main_image = ?2, text = ?3, tags = ?4 WHERE id = ?5",
        params![post.title, post.main_image, post.text, post.tags, id],
    )?;
    Ok(())
}

/// Delete a post. A missing id is a no-op. Comments on the post are left
/// in place.
pub fn delete(pool: &DbPool, id: i64) -> StoreResult<()> {
    let conn = pool.get()?;
    conn.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
    Ok(())
}

/// All posts, newest first.
pub fn get_all(pool: &DbPool) -> StoreResult<Vec<Post>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, title, main_image, publication_date, text, tags FROM posts
         ORDER BY publication_date DESC, id DESC",
    )?;
    let posts = stmt
        .query_map([], row_to_post)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

pub fn get_by_id(pool: &DbPool, id: i64) -> StoreResult<Option<Post>> {
    let conn = pool.get()?;
    let result = conn.query_row(
        "SELECT id, title, main_image, publication_date, text, tags FROM posts WHERE id = ?1",
        params![id],
        row_to_post,
    );

    match result {
        Ok(post) => Ok(Some(post)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Posts whose tag list contains `tag` as a substring, newest first.
/// Substring matching means "a" matches a post tagged "cat".
pub fn get_by_tag(pool: &DbPool, tag: &str) -> StoreResult<Vec<Post>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, title, main_image, publication_date, text, tags FROM posts
         WHERE tags LIKE ?1
         ORDER BY publication_date DESC, id DESC",
    )?;
    let pattern = format!("%{}%", tag);
    let posts = stmt
        .query_map(params![pattern], row_to_post)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

/// The `limit` newest posts, for the landing page.
pub fn get_latest(pool: &DbPool, limit: usize) -> StoreResult<Vec<Post>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, title, main_image, publication_date, text, tags FROM posts
         ORDER BY publication_date DESC, id DESC LIMIT ?1",
    )?;
    let posts = stmt
        .query_map(params![limit as i64], row_to_post)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

/// Neighbors of a post in the newest-first list: `(previous, next)` where
/// previous is the older post and next the newer one. A post missing from
/// the list gets `(None, None)`.
pub fn get_navigation(pool: &DbPool, id: i64) -> StoreResult<(Option<Post>, Option<Post>)> {
    let posts = get_all(pool)?;
    let Some(index) = posts.iter().position(|p| p.id == id) else {
        return Ok((None, None));
    };

    let previous = posts.get(index + 1).cloned();
    let next = index.checked_sub(1).and_then(|i| posts.get(i)).cloned();
    Ok((previous, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn insert(pool: &DbPool, title: &str, date: &str) -> i64 {
        let id = create(
            pool,
            &NewPost {
                title,
                main_image: None,
                text: "body",
                tags: "",
            },
        )
        .unwrap();
        let conn = pool.get().unwrap();
        conn.execute(
            "UPDATE posts SET publication_date = ?1 WHERE id = ?2",
            params![date, id],
        )
        .unwrap();
        id
    }

    #[test]
    fn create_then_get_by_id_roundtrips() {
        let pool = test_pool();
        let id = create(
            &pool,
            &NewPost {
                title: "Hello",
                main_image: Some("/uploads/pic.jpg"),
                text: "First post",
                tags: "intro, meta",
            },
        )
        .unwrap();

        let post = get_by_id(&pool, id).unwrap().unwrap();
        assert_eq!(post.id, id);
        assert_eq!(post.title, "Hello");
        assert_eq!(post.main_image.as_deref(), Some("/uploads/pic.jpg"));
        assert_eq!(post.text, "First post");
        assert_eq!(post.tags, "intro, meta");
        assert!(!post.publication_date.is_empty());
    }

    #[test]
    fn get_by_id_returns_none_for_missing_post() {
        let pool = test_pool();
        assert!(get_by_id(&pool, 42).unwrap().is_none());
    }

    #[test]
    fn get_all_orders_newest_first() {
        let pool = test_pool();
        let old = insert(&pool, "Old", "2024-01-01 08:00:00.000");
        let new = insert(&pool, "New", "2024-03-01 08:00:00.000");
        let mid = insert(&pool, "Mid", "2024-02-01 08:00:00.000");

        let ids: Vec<i64> = get_all(&pool).unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![new, mid, old]);
    }

    #[test]
    fn same_instant_posts_order_by_id() {
        let pool = test_pool();
        let first = insert(&pool, "First", "2024-01-01 08:00:00.000");
        let second = insert(&pool, "Second", "2024-01-01 08:00:00.000");

        let ids: Vec<i64> = get_all(&pool).unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn get_by_tag_matches_substring() {
        let pool = test_pool();
        let id = create(
            &pool,
            &NewPost {
                title: "Pets",
                main_image: None,
                text: "body",
                tags: "cat, dog",
            },
        )
        .unwrap();
        create(
            &pool,
            &NewPost {
                title: "Code",
                main_image: None,
                text: "body",
                tags: "rust",
            },
        )
        .unwrap();

        // "a" is a substring of "cat"
        let matches = get_by_tag(&pool, "a").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, id);

        assert!(get_by_tag(&pool, "python").unwrap().is_empty());
    }

    #[test]
    fn get_latest_limits_results() {
        let pool = test_pool();
        insert(&pool, "A", "2024-01-01 08:00:00.000");
        let b = insert(&pool, "B", "2024-01-02 08:00:00.000");
        let c = insert(&pool, "C", "2024-01-03 08:00:00.000");

        let latest: Vec<i64> = get_latest(&pool, 2).unwrap().iter().map(|p| p.id).collect();
        assert_eq!(latest, vec![c, b]);
    }

    #[test]
    fn navigation_for_middle_post() {
        let pool = test_pool();
        let old = insert(&pool, "Old", "2024-01-01 08:00:00.000");
        let mid = insert(&pool, "Mid", "2024-02-01 08:00:00.000");
        let new = insert(&pool, "New", "2024-03-01 08:00:00.000");

        let (previous, next) = get_navigation(&pool, mid).unwrap();
        assert_eq!(previous.unwrap().id, old);
        assert_eq!(next.unwrap().id, new);
    }

    #[test]
    fn navigation_at_the_edges() {
        let pool = test_pool();
        let old = insert(&pool, "Old", "2024-01-01 08:00:00.000");
        let new = insert(&pool, "New", "2024-02-01 08:00:00.000");

        let (previous, next) = get_navigation(&pool, new).unwrap();
        assert_eq!(previous.unwrap().id, old);
        assert!(next.is_none());

        let (previous, next) = get_navigation(&pool, old).unwrap();
        assert!(previous.is_none());
        assert_eq!(next.unwrap().id, new);
    }

    #[test]
    fn navigation_for_missing_post_is_empty() {
        let pool = test_pool();
        insert(&pool, "Only", "2024-01-01 08:00:00.000");
        let (previous, next) = get_navigation(&pool, 999).unwrap();
        assert!(previous.is_none());
        assert!(next.is_none());
    }

    #[test]
    fn update_changes_fields_but_not_publication_date() {
        let pool = test_pool();
        let id = insert(&pool, "Before", "2024-01-01 08:00:00.000");

        update(
            &pool,
            id,
            &NewPost {
                title: "After",
                main_image: Some("/uploads/new.png"),
                text: "edited",
                tags: "updated",
            },
        )
        .unwrap();

        let post = get_by_id(&pool, id).unwrap().unwrap();
        assert_eq!(post.title, "After");
        assert_eq!(post.main_image.as_deref(), Some("/uploads/new.png"));
        assert_eq!(post.text, "edited");
        assert_eq!(post.tags, "updated");
        assert_eq!(post.publication_date, "2024-01-01 08:00:00.000");
    }

    #[test]
    fn update_missing_post_is_silent() {
        let pool = test_pool();
        update(
            &pool,
            999,
            &NewPost {
                title: "Ghost",
                main_image: None,
                text: "never lands",
                tags: "",
            },
        )
        .unwrap();
        assert!(get_all(&pool).unwrap().is_empty());
    }

    #[test]
    fn delete_removes_post_and_missing_delete_is_silent() {
        let pool = test_pool();
        let id = insert(&pool, "Gone", "2024-01-01 08:00:00.000");

        delete(&pool, id).unwrap();
        assert!(get_by_id(&pool, id).unwrap().is_none());

        delete(&pool, id).unwrap(); // second delete is a no-op
    }
}
