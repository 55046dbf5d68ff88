pub mod session;

use rand::distributions::Alphanumeric;
use rand::Rng;
use rusqlite::params;

use crate::config::AuthConfig;
use crate::db::models::User;
use crate::db::StoreResult;
use crate::state::DbPool;

/// Hash a credential for storage. Usernames get the same treatment as
/// passwords, so the users table never reveals who the admin is.
pub fn hash_credential(value: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(value, bcrypt::DEFAULT_COST)
}

pub fn verify_credential(value: &str, hash: &str) -> bool {
    bcrypt::verify(value, hash).unwrap_or(false)
}

/// Find the user whose stored hashes match the supplied pair. Hashes are
/// salted, so there is no way to look the username up directly; rows are
/// scanned and both credentials verified against the same row.
pub fn matching_user(pool: &DbPool, username: &str, password: &str) -> StoreResult<Option<i64>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare("SELECT id, username, password FROM users")?;
    let rows = stmt.query_map([], |row| {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            password: row.get(2)?,
        })
    })?;

    for row in rows {
        let user = row?;
        if verify_credential(username, &user.username) && verify_credential(password, &user.password)
        {
            return Ok(Some(user.id));
        }
    }

    Ok(None)
}

/// True when the supplied credentials belong to a stored user.
pub fn authenticate(pool: &DbPool, username: &str, password: &str) -> StoreResult<bool> {
    Ok(matching_user(pool, username, password)?.is_some())
}

/// Create the admin account on first start. Runs only against an empty
/// users table; hashed usernames cannot be compared across restarts, so
/// an existing row is the only signal that seeding already happened.
pub fn seed_admin(pool: &DbPool, auth: &AuthConfig) -> anyhow::Result<()> {
    let conn = pool.get()?;
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(());
    }

    let password = match &auth.admin_password {
        Some(password) => password.clone(),
        None => {
            let generated: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(16)
                .map(char::from)
                .collect();
            tracing::warn!(
                "No admin password configured; generated one for '{}': {}",
                auth.admin_username,
                generated
            );
            generated
        }
    };

    conn.execute(
        "INSERT INTO users (username, password) VALUES (?1, ?2)",
        params![
            hash_credential(&auth.admin_username)?,
            hash_credential(&password)?
        ],
    )?;

    tracing::info!("Seeded admin account");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn seeded_config() -> AuthConfig {
        AuthConfig {
            admin_username: "admin".to_string(),
            admin_password: Some("correct horse".to_string()),
            session_hours: 720,
        }
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_credential("secret").unwrap();
        assert_ne!(hash, "secret");
        assert!(verify_credential("secret", &hash));
        assert!(!verify_credential("wrong", &hash));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify_credential("secret", "not-a-bcrypt-hash"));
    }

    #[test]
    fn authenticate_accepts_only_the_seeded_pair() {
        let pool = test_pool();
        seed_admin(&pool, &seeded_config()).unwrap();

        assert!(authenticate(&pool, "admin", "correct horse").unwrap());
        assert!(!authenticate(&pool, "admin", "wrong").unwrap());
        assert!(!authenticate(&pool, "someone", "correct horse").unwrap());
    }

    #[test]
    fn credentials_must_match_the_same_row() {
        let pool = test_pool();
        seed_admin(&pool, &seeded_config()).unwrap();

        // Second account added by hand; seeding only runs on an empty table
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
            params![
                hash_credential("editor").unwrap(),
                hash_credential("other pass").unwrap()
            ],
        )
        .unwrap();
        drop(conn);

        assert!(authenticate(&pool, "editor", "other pass").unwrap());
        // Mixing one row's username with another row's password fails
        assert!(!authenticate(&pool, "admin", "other pass").unwrap());
        assert!(!authenticate(&pool, "editor", "correct horse").unwrap());
    }

    #[test]
    fn matching_user_returns_the_row_id() {
        let pool = test_pool();
        seed_admin(&pool, &seeded_config()).unwrap();

        let id = matching_user(&pool, "admin", "correct horse").unwrap();
        assert_eq!(id, Some(1));
        assert_eq!(matching_user(&pool, "admin", "nope").unwrap(), None);
    }

    #[test]
    fn seed_admin_runs_once() {
        let pool = test_pool();
        seed_admin(&pool, &seeded_config()).unwrap();
        seed_admin(&pool, &seeded_config()).unwrap();

        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn seed_admin_generates_password_when_unset() {
        let pool = test_pool();
        let config = AuthConfig {
            admin_username: "admin".to_string(),
            admin_password: None,
            session_hours: 720,
        };
        seed_admin(&pool, &config).unwrap();

        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        drop(conn);

        // Whatever was generated, an empty password is not it
        assert!(!authenticate(&pool, "admin", "").unwrap());
    }
}
