//! JSON endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{
        sse::{Event as SseEvent, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio_stream::{wrappers::IntervalStream, Stream, StreamExt};

use super::SharedState;
use crate::contact::{ContactError, ContactRequest};
use crate::content::{ContentError, Post, PostMeta};
use crate::events::{Countdown, EventView};
use crate::preferences::{theme_from_cookie_header, theme_set_cookie, PreferenceStore, ThemeMode};

/// Error body shared by the JSON endpoints: `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Internal(m) => {
                tracing::error!("{}", m);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ContentError> for ApiError {
    fn from(e: ContentError) -> Self {
        match e {
            ContentError::NotFound { slug } => ApiError::NotFound(format!("Post not found: {}", slug)),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("content task failed: {}", e))
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let status = match &self {
            ContactError::Validation => StatusCode::BAD_REQUEST,
            ContactError::MissingCredentials { .. } => {
                tracing::error!("{}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ContactError::Upstream(_) => {
                tracing::error!("{}", self);
                StatusCode::BAD_GATEWAY
            }
        };
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// GET /api/posts
pub async fn list_posts(State(state): State<SharedState>) -> Result<Json<Vec<PostMeta>>, ApiError> {
    let repository = state.repository.clone();
    let posts = tokio::task::spawn_blocking(move || repository.list_all()).await??;
    Ok(Json(posts))
}

/// GET /api/posts/:slug
pub async fn get_post(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let repository = state.repository.clone();
    let post = tokio::task::spawn_blocking(move || repository.get_by_slug(&slug)).await??;
    Ok(Json(post))
}

/// GET /api/events
pub async fn list_events(State(state): State<SharedState>) -> Json<Vec<EventView>> {
    Json(state.events.views(Utc::now()))
}

/// GET /api/events/:slug
pub async fn get_event(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<EventView>, ApiError> {
    let event = state
        .events
        .get(&slug)
        .ok_or_else(|| ApiError::NotFound(format!("Event not found: {}", slug)))?;
    Ok(Json(state.events.view(event, Utc::now())))
}

/// GET /api/events/:slug/countdown
///
/// One `countdown` event per second; the stream ends after the first
/// expired tick.
pub async fn event_countdown(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, axum::Error>>>, ApiError> {
    let event = state
        .events
        .get(&slug)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Event not found: {}", slug)))?;
    let start = event
        .start_at
        .ok_or_else(|| ApiError::NotFound(format!("Event has no start time: {}", slug)))?
        .with_timezone(&Utc);

    let mut finished = false;
    let ticks = IntervalStream::new(tokio::time::interval(Duration::from_secs(1)))
        .map(move |_| Countdown::until(start, Utc::now()))
        .take_while(move |countdown| {
            if finished {
                return false;
            }
            finished = countdown.is_expired;
            true
        })
        .map(|countdown| SseEvent::default().event("countdown").json_data(&countdown));

    Ok(Sse::new(ticks).keep_alive(KeepAlive::default()))
}

/// POST /api/contact
pub async fn contact(
    State(state): State<SharedState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!("Rejected contact payload: {}", rejection.body_text());
            return ContactError::Validation.into_response();
        }
    };

    match state.contact.submit(&request, Utc::now()).await {
        Ok(()) => Json(json!({ "ok": true })).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct ThemeUpdate {
    theme: String,
}

/// The visitor's theme, seeded from the request cookie
fn theme_preference(headers: &HeaderMap, cookie_name: &str) -> PreferenceStore<ThemeMode> {
    let theme = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| theme_from_cookie_header(value, cookie_name))
        .unwrap_or_default();
    PreferenceStore::new(theme)
}

/// GET /api/preferences/theme
pub async fn get_theme(State(state): State<SharedState>, headers: HeaderMap) -> Json<serde_json::Value> {
    let preference = theme_preference(&headers, &state.theme_cookie);
    Json(json!({ "theme": preference.get() }))
}

/// PUT /api/preferences/theme
///
/// The cookie is only rewritten when the stored theme actually changes.
pub async fn put_theme(
    State(state): State<SharedState>,
    headers: HeaderMap,
    payload: Result<Json<ThemeUpdate>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(update) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let theme = ThemeMode::parse(&update.theme)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown theme: {}", update.theme)))?;

    let preference = theme_preference(&headers, &state.theme_cookie);
    let changes = preference.subscribe();
    preference.set(theme);

    let mut response = Json(json!({ "theme": preference.get() })).into_response();
    if changes.has_changed().unwrap_or(false) {
        let cookie = theme_set_cookie(&state.theme_cookie, preference.get());
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| ApiError::Internal(format!("invalid cookie header: {}", e)))?;
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    Ok(response)
}
