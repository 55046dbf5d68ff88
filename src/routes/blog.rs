use askama::Template;
use axum::extract::{Form, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::db::comments::{self, NewComment};
use crate::db::models::{Comment, Post};
use crate::db::posts;
use crate::error::{AppError, AppResult};
use crate::pagination;
use crate::routes::home::Html;
use crate::state::AppState;

pub const POSTS_PER_PAGE: usize = 2;

#[derive(Deserialize)]
pub struct ListQuery {
    pub tag: Option<String>,
    pub page: Option<usize>,
}

#[derive(Deserialize)]
pub struct CommentForm {
    pub name: String,
    pub message: String,
    /// Hidden field filled in by the reply script; empty for a top-level
    /// comment.
    #[serde(default)]
    pub parent_id: String,
}

/// A post prepared for rendering.
pub struct PostView {
    pub id: i64,
    pub title: String,
    pub main_image: Option<String>,
    pub date: String,
    pub text: String,
    pub tags: Vec<String>,
}

pub struct PostListItem {
    pub post: PostView,
    pub comment_count: i64,
}

pub struct CommentView {
    pub id: i64,
    pub name: String,
    pub message: String,
    pub created: String,
    pub parent_id: Option<i64>,
    /// Name of the comment being replied to, when it still exists.
    pub parent_name: Option<String>,
}

pub struct NavLink {
    pub id: i64,
    pub title: String,
}

pub struct PageLink {
    pub number: usize,
    pub current: bool,
}

#[derive(Template)]
#[template(path = "pages/posts.html")]
struct PostsTemplate {
    items: Vec<PostListItem>,
    selected_tag: Option<String>,
    pages: Vec<PageLink>,
    show_pagination: bool,
}

#[derive(Template)]
#[template(path = "pages/post_detail.html")]
struct PostDetailTemplate {
    post: PostView,
    comments: Vec<CommentView>,
    prev_post: Option<NavLink>,
    next_post: Option<NavLink>,
}

/// GET /posts — the post list, optionally filtered by tag, two per page.
async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    let selected_tag = query.tag.clone().filter(|t| !t.trim().is_empty());

    let all = match &selected_tag {
        Some(tag) => posts::get_by_tag(&state.db, tag)?,
        None => posts::get_all(&state.db)?,
    };

    let page = pagination::paginate(all, query.page.unwrap_or(1), POSTS_PER_PAGE);

    let mut items = Vec::with_capacity(page.items.len());
    for post in page.items {
        let comment_count = comments::count_by_post(&state.db, post.id)?;
        items.push(PostListItem {
            post: post_view(post),
            comment_count,
        });
    }

    let pages = (1..=page.total_pages)
        .map(|number| PageLink {
            number,
            current: number == page.current,
        })
        .collect();

    Ok(Html(PostsTemplate {
        items,
        selected_tag,
        pages,
        show_pagination: page.total_items > POSTS_PER_PAGE,
    })
    .into_response())
}

/// GET /post/{id} — a single post with its comments and prev/next links.
/// An unknown id sends the visitor back to the list.
async fn post_detail(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Response> {
    let Some(post) = posts::get_by_id(&state.db, id)? else {
        return Ok(Redirect::to("/posts").into_response());
    };

    let post_comments = comments::get_by_post(&state.db, id)?;
    let (previous, next) = posts::get_navigation(&state.db, id)?;

    Ok(Html(PostDetailTemplate {
        post: post_view(post),
        comments: comment_views(&post_comments),
        prev_post: previous.map(nav_link),
        next_post: next.map(nav_link),
    })
    .into_response())
}

/// POST /post/{id} — leave a comment, optionally as a reply.
async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> AppResult<Response> {
    if posts::get_by_id(&state.db, id)?.is_none() {
        return Ok(Redirect::to("/posts").into_response());
    }

    let name = form.name.trim();
    let message = form.message.trim();
    if name.is_empty() || message.is_empty() {
        return Err(AppError::BadRequest("Name and message are required".into()));
    }

    let parent_id = form.parent_id.trim().parse::<i64>().ok();

    comments::create(
        &state.db,
        &NewComment {
            post_id: id,
            name,
            message,
            parent_id,
        },
    )?;

    Ok(Redirect::to(&format!("/post/{}", id)).into_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/post/{id}", get(post_detail).post(add_comment))
}

// -- View helpers --

pub fn post_view(post: Post) -> PostView {
    PostView {
        id: post.id,
        title: post.title,
        main_image: post.main_image,
        date: format_post_date(&post.publication_date),
        text: post.text,
        tags: split_tags(&post.tags),
    }
}

fn nav_link(post: Post) -> NavLink {
    NavLink {
        id: post.id,
        title: post.title,
    }
}

fn comment_views(all: &[Comment]) -> Vec<CommentView> {
    all.iter()
        .map(|comment| CommentView {
            id: comment.id,
            name: comment.name.clone(),
            message: comment.message.clone(),
            created: format_comment_time(&comment.created_at),
            parent_id: comment.parent_id,
            parent_name: comment
                .parent_id
                .and_then(|pid| all.iter().find(|c| c.id == pid))
                .map(|parent| parent.name.clone()),
        })
        .collect()
}

fn parse_db_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").ok()
}

/// "2024-03-01 08:15:00.000" -> "01/03/2024"; unparseable input passes
/// through untouched.
pub fn format_post_date(raw: &str) -> String {
    parse_db_timestamp(raw)
        .map(|dt| dt.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn format_comment_time(raw: &str) -> String {
    parse_db_timestamp(raw)
        .map(|dt| dt.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Split a stored tag string on commas, dropping blanks.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}
