use serde::{Deserialize, Serialize};

/// Administrator account. Both fields hold bcrypt hashes, so rows can only
/// be matched by verifying candidate credentials against each one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub main_image: Option<String>,
    pub publication_date: String,
    pub text: String,
    /// Comma-separated tag list, e.g. "rust, sqlite".
    pub tags: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub name: String,
    pub message: String,
    pub parent_id: Option<i64>,
    pub created_at: String,
}
