//! Integration tests for collection and item CRUD.

use serde_json::json;
use sqlx::PgPool;

use mosaic_db::models::collection::{
    CreateCollection, CreateCollectionItem, UpdateCollection, UpdateCollectionItem,
};
use mosaic_db::repositories::{CollectionRepo, ItemRepo};

fn new_collection(name: &str) -> CreateCollection {
    CreateCollection {
        name: name.to_string(),
        start_offset: None,
        item_limit: None,
        query_type: None,
        query_params: None,
        is_contextual: None,
    }
}

fn new_item(position: i32, value_id: i64) -> CreateCollectionItem {
    CreateCollectionItem {
        position,
        value_id,
        value_type: "remote".to_string(),
        visible: None,
    }
}

#[sqlx::test]
async fn create_applies_defaults(pool: PgPool) {
    let collection = CollectionRepo::create(&pool, &new_collection("featured"))
        .await
        .unwrap();

    assert_eq!(collection.start_offset, 0);
    assert!(collection.item_limit.is_none());
    assert!(collection.query_type.is_none());
    assert!(!collection.is_contextual);
    assert_eq!(collection.query_params, json!({}));
}

#[sqlx::test]
async fn duplicate_name_violates_unique_constraint(pool: PgPool) {
    CollectionRepo::create(&pool, &new_collection("featured"))
        .await
        .unwrap();
    let result = CollectionRepo::create(&pool, &new_collection("featured")).await;
    assert!(result.is_err());
}

#[sqlx::test]
async fn update_replaces_query_definition(pool: PgPool) {
    let collection = CollectionRepo::create(&pool, &new_collection("latest"))
        .await
        .unwrap();

    let updated = CollectionRepo::update(
        &pool,
        collection.id,
        &UpdateCollection {
            name: None,
            start_offset: None,
            item_limit: Some(10),
            query_type: Some("related_items".to_string()),
            query_params: Some(json!({"content_type": "article"})),
            is_contextual: Some(true),
        },
    )
    .await
    .unwrap()
    .expect("collection should exist");

    assert_eq!(updated.name, "latest");
    assert_eq!(updated.query_type.as_deref(), Some("related_items"));
    assert!(updated.is_contextual);
}

#[sqlx::test]
async fn items_list_in_position_order(pool: PgPool) {
    let collection = CollectionRepo::create(&pool, &new_collection("featured"))
        .await
        .unwrap();

    ItemRepo::create(&pool, collection.id, &new_item(2, 300))
        .await
        .unwrap();
    ItemRepo::create(&pool, collection.id, &new_item(0, 100))
        .await
        .unwrap();

    let items = ItemRepo::list_for_collection(&pool, collection.id)
        .await
        .unwrap();
    let positions: Vec<i32> = items.iter().map(|i| i.position).collect();
    assert_eq!(positions, vec![0, 2]);
    assert!(items.iter().all(|i| i.visible));
}

#[sqlx::test]
async fn duplicate_position_is_rejected(pool: PgPool) {
    let collection = CollectionRepo::create(&pool, &new_collection("featured"))
        .await
        .unwrap();
    ItemRepo::create(&pool, collection.id, &new_item(0, 100))
        .await
        .unwrap();
    let result = ItemRepo::create(&pool, collection.id, &new_item(0, 200)).await;
    assert!(result.is_err());
}

#[sqlx::test]
async fn item_update_and_delete(pool: PgPool) {
    let collection = CollectionRepo::create(&pool, &new_collection("featured"))
        .await
        .unwrap();
    let item = ItemRepo::create(&pool, collection.id, &new_item(0, 100))
        .await
        .unwrap();

    let updated = ItemRepo::update(
        &pool,
        collection.id,
        item.id,
        &UpdateCollectionItem {
            position: Some(5),
            visible: Some(false),
        },
    )
    .await
    .unwrap()
    .expect("item should exist");
    assert_eq!(updated.position, 5);
    assert!(!updated.visible);

    assert!(ItemRepo::delete(&pool, collection.id, item.id).await.unwrap());
    assert!(ItemRepo::find_by_id(&pool, collection.id, item.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test]
async fn deleting_collection_cascades_to_items(pool: PgPool) {
    let collection = CollectionRepo::create(&pool, &new_collection("featured"))
        .await
        .unwrap();
    ItemRepo::create(&pool, collection.id, &new_item(0, 100))
        .await
        .unwrap();

    assert!(CollectionRepo::delete(&pool, collection.id).await.unwrap());

    let orphans: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM collection_items WHERE collection_id = $1")
            .bind(collection.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(orphans, 0);
}
