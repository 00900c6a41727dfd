//! Repository for the `collections` table.

use sqlx::PgPool;

use mosaic_core::types::DbId;

use crate::models::collection::{Collection, CreateCollection, UpdateCollection};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, start_offset, item_limit, query_type, query_params, \
    is_contextual, created_at, updated_at";

/// Provides CRUD operations for collections.
pub struct CollectionRepo;

impl CollectionRepo {
    /// Insert a new collection.
    pub async fn create(pool: &PgPool, input: &CreateCollection) -> Result<Collection, sqlx::Error> {
        let query = format!(
            "INSERT INTO collections
                (name, start_offset, item_limit, query_type, query_params, is_contextual)
             VALUES ($1, COALESCE($2, 0), $3, $4, COALESCE($5, '{{}}'::jsonb), COALESCE($6, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Collection>(&query)
            .bind(&input.name)
            .bind(input.start_offset)
            .bind(input.item_limit)
            .bind(&input.query_type)
            .bind(&input.query_params)
            .bind(input.is_contextual)
            .fetch_one(pool)
            .await
    }

    /// Find a collection by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Collection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM collections WHERE id = $1");
        sqlx::query_as::<_, Collection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all collections, ordered by name.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Collection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM collections ORDER BY name");
        sqlx::query_as::<_, Collection>(&query).fetch_all(pool).await
    }

    /// Update a collection. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCollection,
    ) -> Result<Option<Collection>, sqlx::Error> {
        let query = format!(
            "UPDATE collections SET
                name = COALESCE($2, name),
                start_offset = COALESCE($3, start_offset),
                item_limit = COALESCE($4, item_limit),
                query_type = COALESCE($5, query_type),
                query_params = COALESCE($6, query_params),
                is_contextual = COALESCE($7, is_contextual),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Collection>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.start_offset)
            .bind(input.item_limit)
            .bind(&input.query_type)
            .bind(&input.query_params)
            .bind(input.is_contextual)
            .fetch_optional(pool)
            .await
    }

    /// Delete a collection and (via cascade) its items. Returns `true` if a
    /// row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
