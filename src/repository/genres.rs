//! Genre store on PostgreSQL

use async_trait::async_trait;
use uuid::Uuid;

use super::{GenreStore, Repository};
use crate::{
    error::{AppError, AppResult},
    models::genre::{Genre, GenreDraft},
};

/// Map a violation of the unique genre name to `AppError::Conflict`
fn name_conflict(e: sqlx::Error, name: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("Genre '{}' already exists", name))
        }
        _ => AppError::Database(e),
    }
}

#[async_trait]
impl GenreStore for Repository {
    async fn find_all(&self) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>("SELECT * FROM genres ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>("SELECT * FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>("SELECT * FROM genres WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, draft: &GenreDraft) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>("INSERT INTO genres (id, name) VALUES ($1, $2) RETURNING *")
            .bind(Uuid::new_v4())
            .bind(&draft.name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| name_conflict(e, &draft.name))
    }

    async fn update_by_id(&self, id: Uuid, draft: &GenreDraft) -> AppResult<Option<Genre>> {
        sqlx::query_as::<_, Genre>("UPDATE genres SET name = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(&draft.name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| name_conflict(e, &draft.name))
    }

    async fn remove_by_id(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Genre {} not found", id)));
        }
        Ok(())
    }
}
