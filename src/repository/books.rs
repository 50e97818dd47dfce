//! Book lookups by author or genre

use async_trait::async_trait;

use super::{BookStore, Repository};
use crate::{
    error::AppResult,
    models::book::{Book, BookReference, BookSummary},
};

#[async_trait]
impl BookStore for Repository {
    async fn find_by_reference(&self, reference: BookReference) -> AppResult<Vec<Book>> {
        let rows = match reference {
            BookReference::Author(id) => {
                sqlx::query_as::<_, Book>(
                    "SELECT * FROM books WHERE author_id = $1 ORDER BY title"
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            BookReference::Genre(id) => {
                sqlx::query_as::<_, Book>(
                    r#"
                    SELECT b.* FROM books b
                    JOIN book_genres bg ON bg.book_id = b.id
                    WHERE bg.genre_id = $1
                    ORDER BY b.title
                    "#,
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn find_summaries_by_reference(
        &self,
        reference: BookReference,
    ) -> AppResult<Vec<BookSummary>> {
        let rows = match reference {
            BookReference::Author(id) => {
                sqlx::query_as::<_, BookSummary>(
                    "SELECT id, title, summary FROM books WHERE author_id = $1 ORDER BY title"
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            BookReference::Genre(id) => {
                sqlx::query_as::<_, BookSummary>(
                    r#"
                    SELECT b.id, b.title, b.summary FROM books b
                    JOIN book_genres bg ON bg.book_id = b.id
                    WHERE bg.genre_id = $1
                    ORDER BY b.title
                    "#,
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }
}
