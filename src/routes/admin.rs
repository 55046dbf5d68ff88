use askama::Template;
use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;

use crate::db::comments;
use crate::db::posts::{self, NewPost};
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentAdmin;
use crate::routes::blog::{format_comment_time, format_post_date};
use crate::routes::home::Html;
use crate::state::AppState;

pub struct AdminPostRow {
    pub id: i64,
    pub title: String,
    pub date: String,
}

pub struct AdminCommentRow {
    pub id: i64,
    pub post_id: i64,
    pub name: String,
    pub message: String,
    pub created: String,
}

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
struct DashboardTemplate {
    posts: Vec<AdminPostRow>,
}

#[derive(Template)]
#[template(path = "pages/create_post.html")]
struct CreatePostTemplate;

#[derive(Template)]
#[template(path = "pages/edit_post.html")]
struct EditPostTemplate {
    id: i64,
    title: String,
    main_image: Option<String>,
    text: String,
    tags: String,
}

#[derive(Template)]
#[template(path = "pages/admin_comments.html")]
struct AdminCommentsTemplate {
    comments: Vec<AdminCommentRow>,
}

/// Post fields collected from the multipart editor form.
struct PostForm {
    title: String,
    text: String,
    tags: String,
    image_path: Option<String>,
}

/// GET /dashboard — every post, newest first, with edit and delete actions.
async fn dashboard(State(state): State<AppState>, _admin: CurrentAdmin) -> AppResult<Response> {
    let rows = posts::get_all(&state.db)?
        .into_iter()
        .map(|post| AdminPostRow {
            id: post.id,
            title: post.title,
            date: format_post_date(&post.publication_date),
        })
        .collect();

    Ok(Html(DashboardTemplate { posts: rows }).into_response())
}

/// GET /create_post — the empty post editor.
async fn create_post_page(_admin: CurrentAdmin) -> Html<CreatePostTemplate> {
    Html(CreatePostTemplate)
}

/// POST /create_post — store a new post, saving the uploaded image first.
async fn create_post_submit(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = read_post_form(&state, multipart).await?;
    if form.title.is_empty() || form.text.is_empty() {
        return Err(AppError::BadRequest("Title and text are required".into()));
    }

    let id = posts::create(
        &state.db,
        &NewPost {
            title: &form.title,
            main_image: form.image_path.as_deref(),
            text: &form.text,
            tags: &form.tags,
        },
    )?;
    tracing::info!("Created post {}", id);

    Ok(Redirect::to("/dashboard").into_response())
}

/// GET /edit_post/{id} — the editor prefilled with an existing post.
/// An unknown id sends the admin back to the dashboard.
async fn edit_post_page(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let Some(post) = posts::get_by_id(&state.db, id)? else {
        return Ok(Redirect::to("/dashboard").into_response());
    };

    Ok(Html(EditPostTemplate {
        id: post.id,
        title: post.title,
        main_image: post.main_image,
        text: post.text,
        tags: post.tags,
    })
    .into_response())
}

/// POST /edit_post/{id} — update a post. The stored image is kept unless a
/// new file is uploaded. The publication date never changes.
async fn edit_post_submit(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Response> {
    let Some(existing) = posts::get_by_id(&state.db, id)? else {
        return Ok(Redirect::to("/dashboard").into_response());
    };

    let form = read_post_form(&state, multipart).await?;
    if form.title.is_empty() || form.text.is_empty() {
        return Err(AppError::BadRequest("Title and text are required".into()));
    }

    let image = form.image_path.or(existing.main_image);

    posts::update(
        &state.db,
        id,
        &NewPost {
            title: &form.title,
            main_image: image.as_deref(),
            text: &form.text,
            tags: &form.tags,
        },
    )?;

    Ok(Redirect::to("/dashboard").into_response())
}

/// POST /delete_post/{id} — drop the post; its comments stay behind.
async fn delete_post(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    posts::delete(&state.db, id)?;
    tracing::info!("Deleted post {}", id);
    Ok(Redirect::to("/dashboard").into_response())
}

/// GET /admin/comments — every comment on the site, newest first.
async fn admin_comments(State(state): State<AppState>, _admin: CurrentAdmin) -> AppResult<Response> {
    let rows = comments::get_all(&state.db)?
        .into_iter()
        .map(|comment| AdminCommentRow {
            id: comment.id,
            post_id: comment.post_id,
            name: comment.name,
            message: comment.message,
            created: format_comment_time(&comment.created_at),
        })
        .collect();

    Ok(Html(AdminCommentsTemplate { comments: rows }).into_response())
}

/// POST /admin/comments/delete/{id} — remove a single comment.
async fn delete_comment(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    comments::delete(&state.db, id)?;
    Ok(Redirect::to("/admin/comments").into_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/create_post", get(create_post_page).post(create_post_submit))
        .route("/edit_post/{id}", get(edit_post_page).post(edit_post_submit))
        .route("/delete_post/{id}", post(delete_post))
        .route("/admin/comments", get(admin_comments))
        .route("/admin/comments/delete/{id}", post(delete_comment))
}

// -- Multipart helpers --

async fn read_post_form(state: &AppState, mut multipart: Multipart) -> AppResult<PostForm> {
    let mut form = PostForm {
        title: String::new(),
        text: String::new(),
        tags: String::new(),
        image_path: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form data: {}", e)))?
    {
        let Some(name) = field.name().map(|n| n.to_string()) else {
            continue;
        };

        match name.as_str() {
            "title" => form.title = read_text(field).await?,
            "text" => form.text = read_text(field).await?,
            "tags" => form.tags = read_text(field).await?,
            "main_image" => {
                let original = field.file_name().map(|f| f.to_string()).unwrap_or_default();
                if original.is_empty() {
                    // file input left empty
                    continue;
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid upload: {}", e)))?;
                if data.is_empty() {
                    continue;
                }
                form.image_path = Some(save_upload(state, &original, &data).await?);
            }
            _ => {}
        }
    }

    form.title = form.title.trim().to_string();
    form.text = form.text.trim().to_string();
    form.tags = form.tags.trim().to_string();
    Ok(form)
}

async fn read_text(field: Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form data: {}", e)))
}

/// Write an upload into the uploads directory under a unique name and
/// return the public path it will be served from.
async fn save_upload(state: &AppState, original: &str, data: &[u8]) -> AppResult<String> {
    let stored = format!("{}-{}", uuid::Uuid::now_v7(), sanitize_filename(original));
    let path = state.config.uploads_path().join(&stored);

    tokio::fs::write(&path, data)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to save upload: {}", e)))?;

    Ok(format!("/uploads/{}", stored))
}

/// Reduce a client-supplied filename to a safe basename. Path separators
/// and anything outside ASCII alphanumerics, dots, dashes and underscores
/// are dropped.
fn sanitize_filename(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "upload".to_string()
    } else {
        cleaned
    }
}
