//! Repository for the `collection_items` table.

use sqlx::PgPool;

use mosaic_core::types::DbId;

use crate::models::collection::{CollectionItem, CreateCollectionItem, UpdateCollectionItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, collection_id, position, value_id, value_type, visible, created_at, updated_at";

/// Provides CRUD operations for manually pinned collection items.
pub struct ItemRepo;

impl ItemRepo {
    /// Pin an item into a collection.
    pub async fn create(
        pool: &PgPool,
        collection_id: DbId,
        input: &CreateCollectionItem,
    ) -> Result<CollectionItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO collection_items
                (collection_id, position, value_id, value_type, visible)
             VALUES ($1, $2, $3, $4, COALESCE($5, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CollectionItem>(&query)
            .bind(collection_id)
            .bind(input.position)
            .bind(input.value_id)
            .bind(&input.value_type)
            .bind(input.visible)
            .fetch_one(pool)
            .await
    }

    /// Find an item by ID within a collection.
    pub async fn find_by_id(
        pool: &PgPool,
        collection_id: DbId,
        item_id: DbId,
    ) -> Result<Option<CollectionItem>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM collection_items WHERE id = $1 AND collection_id = $2");
        sqlx::query_as::<_, CollectionItem>(&query)
            .bind(item_id)
            .bind(collection_id)
            .fetch_optional(pool)
            .await
    }

    /// List a collection's items in position order.
    pub async fn list_for_collection(
        pool: &PgPool,
        collection_id: DbId,
    ) -> Result<Vec<CollectionItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM collection_items WHERE collection_id = $1 ORDER BY position"
        );
        sqlx::query_as::<_, CollectionItem>(&query)
            .bind(collection_id)
            .fetch_all(pool)
            .await
    }

    /// Update an item's position or visibility.
    pub async fn update(
        pool: &PgPool,
        collection_id: DbId,
        item_id: DbId,
        input: &UpdateCollectionItem,
    ) -> Result<Option<CollectionItem>, sqlx::Error> {
        let query = format!(
            "UPDATE collection_items SET
                position = COALESCE($3, position),
                visible = COALESCE($4, visible),
                updated_at = NOW()
             WHERE id = $1 AND collection_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CollectionItem>(&query)
            .bind(item_id)
            .bind(collection_id)
            .bind(input.position)
            .bind(input.visible)
            .fetch_optional(pool)
            .await
    }

    /// Remove an item from a collection. Returns `true` if a row was deleted.
    pub async fn delete(
        pool: &PgPool,
        collection_id: DbId,
        item_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM collection_items WHERE id = $1 AND collection_id = $2")
            .bind(item_id)
            .bind(collection_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
