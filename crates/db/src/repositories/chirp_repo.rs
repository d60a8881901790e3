//! Repository for the `chirps` table.

use chirpy_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::chirp::{Chirp, CreateChirp};

const COLUMNS: &str = "id, created_at, updated_at, body, user_id";

/// Provides create and read operations for chirps.
pub struct ChirpRepo;

impl ChirpRepo {
    /// Insert a new chirp, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateChirp) -> Result<Chirp, sqlx::Error> {
        let query = format!(
            "INSERT INTO chirps (id, body, user_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Chirp>(&query)
            .bind(Uuid::new_v4())
            .bind(&input.body)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a chirp by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Chirp>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chirps WHERE id = $1");
        sqlx::query_as::<_, Chirp>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every chirp, oldest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Chirp>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chirps ORDER BY created_at ASC, id ASC");
        sqlx::query_as::<_, Chirp>(&query).fetch_all(pool).await
    }
}
