use rusqlite::{params, Row};

use crate::db::models::Comment;
use crate::db::StoreResult;
use crate::state::DbPool;

/// Fields supplied when a visitor leaves a comment. `parent_id` points at
/// the comment being replied to, or is None for a top-level comment.
pub struct NewComment<'a> {
    pub post_id: i64,
    pub name: &'a str,
    pub message: &'a str,
    pub parent_id: Option<i64>,
}

fn row_to_comment(row: &Row) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        post_id: row.get(1)?,
        name: row.get(2)?,
        message: row.get(3)?,
        parent_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Insert a comment. Callers never need the new id; comments are only
/// ever read back per post or site-wide.
pub fn create(pool: &DbPool, comment: &NewComment) -> StoreResult<()> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO comments (post_id, name, message, parent_id) VALUES (?1, ?2, ?3, ?4)",
        params![
            comment.post_id,
            comment.name,
            comment.message,
            comment.parent_id
        ],
    )?;
    Ok(())
}

/// Comments on a post, oldest first, the order they are rendered in.
pub fn get_by_post(pool: &DbPool, post_id: i64) -> StoreResult<Vec<Comment>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, post_id, name, message, parent_id, created_at FROM comments
         WHERE post_id = ?1
         ORDER BY created_at ASC, id ASC",
    )?;
    let comments = stmt
        .query_map(params![post_id], row_to_comment)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(comments)
}

/// Every comment across all posts, newest first, for the moderation page.
pub fn get_all(pool: &DbPool) -> StoreResult<Vec<Comment>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, post_id, name, message, parent_id, created_at FROM comments
         ORDER BY created_at DESC, id DESC",
    )?;
    let comments = stmt
        .query_map([], row_to_comment)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(comments)
}

pub fn count_by_post(pool: &DbPool, post_id: i64) -> StoreResult<i64> {
    let conn = pool.get()?;
    let count = conn.query_row(
        "SELECT COUNT(*) FROM comments WHERE post_id = ?1",
        params![post_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Delete a comment. A missing id is a no-op. Replies to the deleted
/// comment stay in place.
pub fn delete(pool: &DbPool, id: i64) -> StoreResult<()> {
    let conn = pool.get()?;
    conn.execute("DELETE FROM comments WHERE id = ?1", params![id])?;
    Ok(())
}
