//! HTTP handlers for the catalog pages

pub mod authors;
pub mod genres;
pub mod health;
pub mod openapi;

use axum::{
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{models::FieldError, AppState};

/// A named template and the data it is rendered with.
///
/// Template rendering itself happens outside this server; views are handed
/// over as JSON documents.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct View {
    /// Template name (e.g. `author_form`)
    pub template: String,
    /// Page title
    pub title: String,
    /// Named values available to the template
    #[schema(value_type = Object)]
    pub context: Value,
}

impl View {
    pub fn new(template: &str, title: &str, context: Value) -> Self {
        Self {
            template: template.to_string(),
            title: title.to_string(),
            context,
        }
    }
}

/// What a catalog handler answers with: a rendered view or a redirect
#[derive(Debug)]
pub enum Page {
    Render(View),
    Redirect(String),
}

impl Page {
    pub fn render(template: &str, title: &str, context: Value) -> Self {
        Page::Render(View::new(template, title, context))
    }

    pub fn redirect(url: impl Into<String>) -> Self {
        Page::Redirect(url.into())
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        match self {
            Page::Render(view) => Json(view).into_response(),
            Page::Redirect(url) => Redirect::to(&url).into_response(),
        }
    }
}

/// Context of a re-displayed form: the entered values under `key`, plus errors
fn form_context<T: Serialize>(key: &str, draft: &T, errors: &[FieldError]) -> Value {
    let mut context = serde_json::Map::new();
    context.insert(key.to_string(), serde_json::json!(draft));
    context.insert("errors".to_string(), serde_json::json!(errors));
    Value::Object(context)
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let health = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state.clone());

    let catalog = Router::new()
        // Authors
        .route("/authors", get(authors::list_authors))
        .route(
            "/author/create",
            get(authors::create_author_form).post(authors::create_author),
        )
        .route("/author/:id", get(authors::get_author))
        .route(
            "/author/:id/delete",
            get(authors::delete_author_form).post(authors::delete_author),
        )
        .route(
            "/author/:id/update",
            get(authors::update_author_form).post(authors::update_author),
        )
        // Genres
        .route("/genres", get(genres::list_genres))
        .route(
            "/genre/create",
            get(genres::create_genre_form).post(genres::create_genre),
        )
        .route("/genre/:id", get(genres::get_genre))
        .route(
            "/genre/:id/delete",
            get(genres::delete_genre_form).post(genres::delete_genre),
        )
        .route(
            "/genre/:id/update",
            get(genres::update_genre_form).post(genres::update_genre),
        )
        .with_state(state);

    Router::new()
        .merge(health)
        .nest("/catalog", catalog)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
