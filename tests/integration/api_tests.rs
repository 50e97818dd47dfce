//! Catalog page tests.
//!
//! The router is driven in-process over in-memory stores. The tests at the
//! bottom need a running server and are ignored by default.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use catalog_server::{
    api,
    error::{AppError, AppResult},
    models::{Author, AuthorDraft, Book, BookReference, BookSummary, Genre, GenreDraft},
    repository::{AuthorStore, BookStore, GenreStore},
    services::Services,
    AppConfig, AppState,
};
use chrono::NaiveDate;
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

/// Stores backed by hash maps, with the same guarantees as the database
#[derive(Default)]
struct MemoryCatalog {
    authors: Mutex<HashMap<Uuid, Author>>,
    genres: Mutex<HashMap<Uuid, Genre>>,
    /// Books with the genres they belong to
    books: Mutex<Vec<(Book, Vec<Uuid>)>>,
}

impl MemoryCatalog {
    async fn add_author(&self, first_name: &str, family_name: &str) -> Author {
        let author = Author {
            id: Uuid::new_v4(),
            first_name: first_name.to_string(),
            family_name: family_name.to_string(),
            date_of_birth: None,
            date_of_death: None,
        };
        self.authors.lock().await.insert(author.id, author.clone());
        author
    }

    async fn add_genre(&self, name: &str) -> Genre {
        let genre = Genre {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.genres.lock().await.insert(genre.id, genre.clone());
        genre
    }

    async fn add_book(&self, title: &str, author_id: Uuid, genres: Vec<Uuid>) {
        let book = Book {
            id: Uuid::new_v4(),
            title: title.to_string(),
            summary: format!("Summary of {}", title),
            isbn: "0000000000".to_string(),
            author_id,
        };
        self.books.lock().await.push((book, genres));
    }

    async fn author_count(&self) -> usize {
        self.authors.lock().await.len()
    }

    async fn genre_count(&self) -> usize {
        self.genres.lock().await.len()
    }
}

#[async_trait]
impl AuthorStore for MemoryCatalog {
    async fn find_all(&self) -> AppResult<Vec<Author>> {
        let mut authors: Vec<Author> = self.authors.lock().await.values().cloned().collect();
        authors.sort_by(|a, b| a.family_name.cmp(&b.family_name));
        Ok(authors)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.authors.lock().await.get(&id).cloned())
    }

    async fn insert(&self, draft: &AuthorDraft) -> AppResult<Author> {
        let author = Author {
            id: Uuid::new_v4(),
            first_name: draft.first_name.clone(),
            family_name: draft.family_name.clone(),
            date_of_birth: draft.date_of_birth,
            date_of_death: draft.date_of_death,
        };
        self.authors.lock().await.insert(author.id, author.clone());
        Ok(author)
    }

    async fn update_by_id(&self, id: Uuid, draft: &AuthorDraft) -> AppResult<Option<Author>> {
        let mut authors = self.authors.lock().await;
        Ok(authors.get_mut(&id).map(|author| {
            author.first_name = draft.first_name.clone();
            author.family_name = draft.family_name.clone();
            author.date_of_birth = draft.date_of_birth;
            author.date_of_death = draft.date_of_death;
            author.clone()
        }))
    }

    async fn remove_by_id(&self, id: Uuid) -> AppResult<()> {
        self.authors
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }
}

#[async_trait]
impl GenreStore for MemoryCatalog {
    async fn find_all(&self) -> AppResult<Vec<Genre>> {
        let mut genres: Vec<Genre> = self.genres.lock().await.values().cloned().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Ok(self.genres.lock().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        Ok(self
            .genres
            .lock()
            .await
            .values()
            .find(|genre| genre.name == name)
            .cloned())
    }

    async fn insert(&self, draft: &GenreDraft) -> AppResult<Genre> {
        let mut genres = self.genres.lock().await;
        if genres.values().any(|genre| genre.name == draft.name) {
            return Err(AppError::Conflict(format!("Genre '{}' already exists", draft.name)));
        }
        let genre = Genre {
            id: Uuid::new_v4(),
            name: draft.name.clone(),
        };
        genres.insert(genre.id, genre.clone());
        Ok(genre)
    }

    async fn update_by_id(&self, id: Uuid, draft: &GenreDraft) -> AppResult<Option<Genre>> {
        let mut genres = self.genres.lock().await;
        if genres
            .values()
            .any(|genre| genre.id != id && genre.name == draft.name)
        {
            return Err(AppError::Conflict(format!("Genre '{}' already exists", draft.name)));
        }
        Ok(genres.get_mut(&id).map(|genre| {
            genre.name = draft.name.clone();
            genre.clone()
        }))
    }

    async fn remove_by_id(&self, id: Uuid) -> AppResult<()> {
        self.genres
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Genre {} not found", id)))
    }
}

#[async_trait]
impl BookStore for MemoryCatalog {
    async fn find_by_reference(&self, reference: BookReference) -> AppResult<Vec<Book>> {
        Ok(self
            .books
            .lock()
            .await
            .iter()
            .filter(|(book, genres)| match reference {
                BookReference::Author(id) => book.author_id == id,
                BookReference::Genre(id) => genres.contains(&id),
            })
            .map(|(book, _)| book.clone())
            .collect())
    }

    async fn find_summaries_by_reference(
        &self,
        reference: BookReference,
    ) -> AppResult<Vec<BookSummary>> {
        let books = self.find_by_reference(reference).await?;
        Ok(books
            .into_iter()
            .map(|book| BookSummary {
                id: book.id,
                title: book.title,
                summary: book.summary,
            })
            .collect())
    }
}

fn app(catalog: Arc<MemoryCatalog>) -> Router {
    app_with_config(catalog, AppConfig::default())
}

fn app_with_config(catalog: Arc<MemoryCatalog>, config: AppConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(Services::from_stores(
            catalog.clone(),
            catalog.clone(),
            catalog,
        )),
    };
    api::create_router(state)
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, form: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_create_author_redirects_to_sanitized_record() {
    let catalog = Arc::new(MemoryCatalog::default());
    let app = app(catalog.clone());

    let response = post_form(
        &app,
        "/catalog/author/create",
        "first_name=++Jane+&family_name=Austen123&date_of_birth=1775-12-16&date_of_death=",
    )
    .await;
    let url = location(&response);
    assert!(url.starts_with("/catalog/author/"));

    let id: Uuid = url.trim_start_matches("/catalog/author/").parse().unwrap();
    let stored = AuthorStore::find_by_id(catalog.as_ref(), id).await.unwrap().unwrap();
    assert_eq!(stored.first_name, "Jane");
    assert_eq!(stored.family_name, "Austen123");
    assert_eq!(stored.date_of_birth, NaiveDate::from_ymd_opt(1775, 12, 16));
    assert_eq!(stored.date_of_death, None);

    let view = json_body(get(&app, &url).await).await;
    assert_eq!(view["template"], "author_detail");
    assert_eq!(view["title"], "Author Detail");
    assert_eq!(view["context"]["author"]["name"], "Austen123, Jane");
    assert_eq!(view["context"]["author"]["date_of_birth"], "1775-12-16");
    assert_eq!(view["context"]["author"]["url"], url);
}

#[tokio::test]
async fn test_invalid_author_form_is_redisplayed() {
    let catalog = Arc::new(MemoryCatalog::default());
    let app = app(catalog.clone());

    let response = post_form(
        &app,
        "/catalog/author/create",
        "first_name=Jane&family_name=&date_of_birth=16%2F12%2F1775",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let view = json_body(response).await;
    assert_eq!(view["template"], "author_form");
    assert_eq!(view["title"], "Create Author");
    assert_eq!(view["context"]["author"]["first_name"], "Jane");
    assert_eq!(view["context"]["author"]["date_of_birth"], Value::Null);

    let kinds: Vec<(&str, &str)> = view["context"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| (e["field"].as_str().unwrap(), e["kind"].as_str().unwrap()))
        .collect();
    assert_eq!(
        kinds,
        vec![("family_name", "missing_field"), ("date_of_birth", "invalid_date")]
    );
    assert_eq!(catalog.author_count().await, 0);
}

#[tokio::test]
async fn test_loose_date_is_rejected() {
    let catalog = Arc::new(MemoryCatalog::default());
    let app = app(catalog.clone());

    let response = post_form(
        &app,
        "/catalog/author/create",
        "first_name=Jane&family_name=Austen&date_of_birth=1775-1-6&date_of_death=+1817-07-18",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let view = json_body(response).await;
    let fields: Vec<&str> = view["context"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["date_of_birth", "date_of_death"]);
    assert_eq!(catalog.author_count().await, 0);
}

#[tokio::test]
async fn test_non_alphanumeric_family_name_is_not_stored() {
    let catalog = Arc::new(MemoryCatalog::default());
    let app = app(catalog.clone());

    let response = post_form(
        &app,
        "/catalog/author/create",
        "first_name=Ursula&family_name=Le+Guin",
    )
    .await;
    let view = json_body(response).await;
    assert_eq!(view["context"]["errors"][0]["kind"], "invalid_format");
    assert_eq!(catalog.author_count().await, 0);
}

#[tokio::test]
async fn test_author_list_is_sorted_by_family_name() {
    let catalog = Arc::new(MemoryCatalog::default());
    catalog.add_author("Leo", "Tolstoy").await;
    catalog.add_author("Jane", "Austen").await;
    catalog.add_author("Charles", "Dickens").await;
    let app = app(catalog);

    let view = json_body(get(&app, "/catalog/authors").await).await;
    assert_eq!(view["template"], "author_list");
    let names: Vec<&str> = view["context"]["author_list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["family_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Austen", "Dickens", "Tolstoy"]);
}

#[tokio::test]
async fn test_unknown_author_detail_renders_null() {
    let app = app(Arc::new(MemoryCatalog::default()));

    let response = get(&app, &format!("/catalog/author/{}", Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let view = json_body(response).await;
    assert_eq!(view["context"]["author"], Value::Null);
    assert_eq!(view["context"]["author_books"], serde_json::json!([]));
}

#[tokio::test]
async fn test_author_detail_lists_book_summaries() {
    let catalog = Arc::new(MemoryCatalog::default());
    let author = catalog.add_author("Jane", "Austen").await;
    catalog.add_book("Emma", author.id, vec![]).await;
    let app = app(catalog);

    let view = json_body(get(&app, &author.url()).await).await;
    let books = view["context"]["author_books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "Emma");
    assert!(books[0].get("isbn").is_none());
}

#[tokio::test]
async fn test_update_author_preserves_identity() {
    let catalog = Arc::new(MemoryCatalog::default());
    let author = catalog.add_author("Jane", "Austen").await;
    let app = app(catalog.clone());

    let view = json_body(get(&app, &format!("{}/update", author.url())).await).await;
    assert_eq!(view["title"], "Update Author");
    assert_eq!(view["context"]["author"]["first_name"], "Jane");

    let response = post_form(
        &app,
        &format!("{}/update", author.url()),
        "first_name=Janet&family_name=Austen",
    )
    .await;
    assert_eq!(location(&response), author.url());

    let stored = AuthorStore::find_by_id(catalog.as_ref(), author.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, author.id);
    assert_eq!(stored.first_name, "Janet");
    assert_eq!(catalog.author_count().await, 1);
}

#[tokio::test]
async fn test_update_unknown_author_is_not_found() {
    let app = app(Arc::new(MemoryCatalog::default()));
    let url = format!("/catalog/author/{}/update", Uuid::new_v4());

    assert_eq!(get(&app, &url).await.status(), StatusCode::NOT_FOUND);
    let response = post_form(&app, &url, "first_name=Jane&family_name=Austen").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_author_with_books_is_not_deleted() {
    let catalog = Arc::new(MemoryCatalog::default());
    let author = catalog.add_author("Jane", "Austen").await;
    catalog.add_book("Emma", author.id, vec![]).await;
    catalog.add_book("Persuasion", author.id, vec![]).await;
    let app = app(catalog.clone());

    let delete_url = format!("{}/delete", author.url());
    let confirmation = json_body(get(&app, &delete_url).await).await;
    assert_eq!(confirmation["template"], "author_delete");
    assert_eq!(confirmation["context"]["author_books"].as_array().unwrap().len(), 2);

    let response = post_form(&app, &delete_url, &format!("authorid={}", author.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let view = json_body(response).await;
    assert_eq!(view["template"], "author_delete");
    assert_eq!(view["title"], "Delete Author");
    assert_eq!(view["context"]["author_books"].as_array().unwrap().len(), 2);

    assert!(AuthorStore::find_by_id(catalog.as_ref(), author.id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_author_without_books_is_deleted() {
    let catalog = Arc::new(MemoryCatalog::default());
    let author = catalog.add_author("Jane", "Austen").await;
    let app = app(catalog.clone());

    let response = post_form(&app, &format!("{}/delete", author.url()), "").await;
    assert_eq!(location(&response), "/catalog/authors");

    assert!(AuthorStore::find_by_id(catalog.as_ref(), author.id)
        .await
        .unwrap()
        .is_none());
    let response = get(&app, &format!("{}/delete", author.url())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_genre_create_is_idempotent_by_name() {
    let catalog = Arc::new(MemoryCatalog::default());
    let app = app(catalog.clone());

    let first = location(&post_form(&app, "/catalog/genre/create", "name=Fantasy").await);
    let second = location(&post_form(&app, "/catalog/genre/create", "name=+Fantasy+").await);

    assert_eq!(first, second);
    assert!(first.starts_with("/catalog/genre/"));
    assert_eq!(catalog.genre_count().await, 1);
}

#[tokio::test]
async fn test_missing_genre_name_is_redisplayed() {
    let catalog = Arc::new(MemoryCatalog::default());
    let app = app(catalog.clone());

    let response = post_form(&app, "/catalog/genre/create", "name=").await;
    assert_eq!(response.status(), StatusCode::OK);
    let view = json_body(response).await;
    assert_eq!(view["template"], "genre_form");
    assert_eq!(view["context"]["errors"][0]["kind"], "missing_field");
    assert_eq!(catalog.genre_count().await, 0);
}

#[tokio::test]
async fn test_genre_rename_to_taken_name_is_rejected() {
    let catalog = Arc::new(MemoryCatalog::default());
    let poetry = catalog.add_genre("Poetry").await;
    catalog.add_genre("Drama").await;
    let app = app(catalog.clone());

    let response = post_form(&app, &format!("{}/update", poetry.url()), "name=Drama").await;
    assert_eq!(response.status(), StatusCode::OK);
    let view = json_body(response).await;
    assert_eq!(view["title"], "Update Genre");
    assert_eq!(view["context"]["errors"][0]["kind"], "duplicate_name");

    let response = post_form(&app, &format!("{}/update", poetry.url()), "name=Verse").await;
    assert_eq!(location(&response), poetry.url());
    let stored = GenreStore::find_by_id(catalog.as_ref(), poetry.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "Verse");
}

#[tokio::test]
async fn test_genre_delete_gated_by_books() {
    let catalog = Arc::new(MemoryCatalog::default());
    let author = catalog.add_author("Walt", "Whitman").await;
    let poetry = catalog.add_genre("Poetry").await;
    let drama = catalog.add_genre("Drama").await;
    catalog.add_book("Leaves of Grass", author.id, vec![poetry.id]).await;
    let app = app(catalog.clone());

    let response = post_form(&app, &format!("{}/delete", poetry.url()), "").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["template"], "genre_delete");

    let response = post_form(&app, &format!("{}/delete", drama.url()), "").await;
    assert_eq!(location(&response), "/catalog/genres");

    let view = json_body(get(&app, "/catalog/genres").await).await;
    let names: Vec<&str> = view["context"]["genre_list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Poetry"]);
}

#[tokio::test]
async fn test_genre_detail_lists_books() {
    let catalog = Arc::new(MemoryCatalog::default());
    let author = catalog.add_author("Walt", "Whitman").await;
    let poetry = catalog.add_genre("Poetry").await;
    catalog.add_book("Leaves of Grass", author.id, vec![poetry.id]).await;
    let app = app(catalog);

    let view = json_body(get(&app, &poetry.url()).await).await;
    assert_eq!(view["template"], "genre_detail");
    assert_eq!(view["title"], "Genre Details");
    assert_eq!(view["context"]["genre"]["name"], "Poetry");
    assert_eq!(view["context"]["genre_books"][0]["title"], "Leaves of Grass");
}

#[tokio::test]
async fn test_health_check_in_process() {
    let app = app(Arc::new(MemoryCatalog::default()));
    let body = json_body(get(&app, "/health").await).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "catalog-server");
}

#[tokio::test]
async fn test_health_reports_configured_name() {
    let mut config = AppConfig::default();
    config.server.name = "branch-library".to_string();
    let app = app_with_config(Arc::new(MemoryCatalog::default()), config);

    let body = json_body(get(&app, "/ready").await).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["service"], "branch-library");
}

const BASE_URL: &str = "http://localhost:3000";

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_live_health_check() {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_live_author_list() {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/catalog/authors", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["template"], "author_list");
    assert!(body["context"]["author_list"].is_array());
}
