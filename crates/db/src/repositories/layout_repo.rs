//! Repository for the `layouts` table.

use sqlx::PgPool;

use mosaic_core::types::DbId;

use crate::models::layout::{CreateLayout, Layout, UpdateLayout};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, shared, config, created_at, updated_at";

/// Provides CRUD operations for layouts.
pub struct LayoutRepo;

impl LayoutRepo {
    /// Insert a new layout. `config` is expected to be validated and
    /// defaulted by the caller.
    pub async fn create(
        pool: &PgPool,
        input: &CreateLayout,
        config: &serde_json::Value,
    ) -> Result<Layout, sqlx::Error> {
        let query = format!(
            "INSERT INTO layouts (name, description, shared, config)
             VALUES ($1, $2, COALESCE($3, false), $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Layout>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.shared)
            .bind(config)
            .fetch_one(pool)
            .await
    }

    /// Find a layout by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Layout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM layouts WHERE id = $1");
        sqlx::query_as::<_, Layout>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all layouts, ordered by name.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Layout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM layouts ORDER BY name");
        sqlx::query_as::<_, Layout>(&query).fetch_all(pool).await
    }

    /// Update a layout. Only non-`None` fields in `input` are applied;
    /// `config` replaces the stored object wholesale when given.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLayout,
        config: Option<&serde_json::Value>,
    ) -> Result<Option<Layout>, sqlx::Error> {
        let query = format!(
            "UPDATE layouts SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                shared = COALESCE($4, shared),
                config = COALESCE($5, config),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Layout>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.shared)
            .bind(config)
            .fetch_optional(pool)
            .await
    }

    /// Delete a layout. Returns `true` if a row was deleted. Rules pointing
    /// at it keep existing with their layout reference cleared.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM layouts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
