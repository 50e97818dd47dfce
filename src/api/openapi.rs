//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, genres, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local Library Catalog",
        version = "0.1.0",
        description = "Author and genre pages of the library catalog"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author_form,
        authors::create_author,
        authors::delete_author_form,
        authors::delete_author,
        authors::update_author_form,
        authors::update_author,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::create_genre_form,
        genres::create_genre,
        genres::delete_genre_form,
        genres::delete_genre,
        genres::update_genre_form,
        genres::update_genre,
    ),
    components(
        schemas(
            crate::api::View,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorView,
            crate::models::author::AuthorForm,
            crate::models::author::AuthorDraft,
            // Genres
            crate::models::genre::Genre,
            crate::models::genre::GenreView,
            crate::models::genre::GenreForm,
            crate::models::genre::GenreDraft,
            // Books
            crate::models::book::Book,
            crate::models::book::BookView,
            crate::models::book::BookSummary,
            crate::models::book::BookSummaryView,
            // Forms
            crate::models::form::FieldError,
            crate::models::form::FieldErrorKind,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "authors", description = "Author pages"),
        (name = "genres", description = "Genre pages")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
