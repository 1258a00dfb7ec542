//! End-to-end facade scenarios over the in-memory store and index.
//!
//! Run with: `cargo test --test service`

use std::sync::Arc;

use restaurant_index::search::{IndexClient, InMemoryIndexClient, SchemaStatus};
use restaurant_index::storage::memory::InMemoryRestaurantStore;
use restaurant_index::{
    HydrationReport, IndexConfig, RestaurantFields, RestaurantService, RestaurantStore, RetryConfig,
    ServiceError, ServiceState,
};

// =============================================================================
// Helpers
// =============================================================================

struct Harness {
    service: RestaurantService,
    store: Arc<InMemoryRestaurantStore>,
    index: Arc<InMemoryIndexClient>,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryRestaurantStore::new());
    let index = Arc::new(InMemoryIndexClient::new());
    let service = RestaurantService::new(IndexConfig::default(), store.clone(), index.clone())
        .with_search_retry(RetryConfig::test());
    Harness { service, store, index }
}

async fn started() -> Harness {
    let h = harness();
    h.service.start().await.expect("start failed");
    h
}

fn fields(name: &str, location: &str) -> RestaurantFields {
    RestaurantFields::new(name, location)
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn start_on_empty_store_becomes_ready() {
    let h = harness();
    assert_eq!(h.service.state(), ServiceState::Created);

    let report = h.service.start().await.unwrap();
    assert_eq!(report, HydrationReport::default());
    assert!(h.service.is_ready());
    assert!(h.index.has_schema("restaurants"));
}

#[tokio::test]
async fn start_twice_keeps_schema_and_succeeds() {
    let h = started().await;
    // Restart of the same process (or another replica) re-declares the schema
    h.service.start().await.expect("second start failed");
    assert!(h.service.is_ready());

    let status = h
        .index
        .ensure_schema(&h.service.config().search_index())
        .await
        .unwrap();
    assert_eq!(status, SchemaStatus::AlreadyExists);
}

#[tokio::test]
async fn start_hydrates_existing_records() {
    let h = harness();
    for (name, location) in [("Pizza Place", "Downtown"), ("Sushi Bar", "Harbor"), ("Taco Stand", "Downtown")] {
        h.store.create(&fields(name, location)).await.unwrap();
    }
    assert!(h.index.is_empty());

    let report = h.service.start().await.unwrap();
    assert_eq!(report, HydrationReport { total: 3, indexed: 3, failed: 0 });
    for id in 1..=3 {
        assert!(h.index.document(&format!("restaurant:{}", id)).is_some());
    }

    let downtown = h.service.search("location", "downtown").await.unwrap();
    let ids: Vec<i64> = downtown.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn state_receiver_observes_transitions() {
    let h = harness();
    let rx = h.service.state_receiver();
    h.service.start().await.unwrap();
    assert_eq!(*rx.borrow(), ServiceState::Ready);

    h.service.shutdown().await;
    assert_eq!(*rx.borrow(), ServiceState::ShuttingDown);
}

// =============================================================================
// Create / update / list
// =============================================================================

#[tokio::test]
async fn created_restaurant_is_searchable_by_name() {
    let h = started().await;

    let created = h.service.create(&fields("Pizza Place", "Downtown")).await.unwrap();
    assert_eq!(created.id, 1);

    let found = h.service.search("name", "Pizza").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 1);
    assert_eq!(found[0].name, "Pizza Place");
    assert_eq!(found[0].location, "Downtown");
}

#[tokio::test]
async fn update_replaces_indexed_fields() {
    let h = started().await;
    let created = h.service.create(&fields("Pizza Place", "Downtown")).await.unwrap();

    let updated = h
        .service
        .update(created.id, &fields("Pizza Palace", "Downtown"))
        .await
        .unwrap();
    assert_eq!(updated.name, "Pizza Palace");

    let palace = h.service.search("name", "Palace").await.unwrap();
    assert_eq!(palace.len(), 1);
    assert_eq!(palace[0].id, created.id);
    assert!(h.service.search("name", "Place").await.unwrap().is_empty());
}

#[tokio::test]
async fn update_drops_cleared_description_from_index() {
    let h = started().await;
    let with_description = fields("Pizza Place", "Downtown").with_description("Wood oven");
    let created = h.service.create(&with_description).await.unwrap();

    h.service.update(created.id, &fields("Pizza Place", "Downtown")).await.unwrap();

    let doc = h.index.document("restaurant:1").unwrap();
    assert_eq!(doc.get("description"), None);
    let found = h.service.search("name", "pizza").await.unwrap();
    assert_eq!(found[0].description, None);
}

#[tokio::test]
async fn update_missing_record_is_not_found_and_not_indexed() {
    let h = started().await;

    let err = h.service.update(42, &fields("Ghost", "Nowhere")).await.unwrap_err();
    assert!(matches!(err, ServiceError::RecordNotFound(42)));
    assert!(err.is_client_error());

    assert!(h.index.document("restaurant:42").is_none());
    assert_eq!(h.service.sync_stats().succeeded, 0);
}

#[tokio::test]
async fn invalid_fields_are_rejected_before_store() {
    let h = started().await;

    let err = h.service.create(&fields("   ", "Downtown")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ref msg) if msg.contains("name")));

    let err = h.service.create(&fields("Pizza Place", "")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ref msg) if msg.contains("location")));

    assert!(h.store.is_empty());
    assert!(h.index.is_empty());
}

#[tokio::test]
async fn list_reads_primary_store_in_id_order() {
    let h = started().await;
    for name in ["C", "A", "B"] {
        h.service.create(&fields(name, "Here")).await.unwrap();
    }

    let all = h.service.list().await.unwrap();
    let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(all[0].name, "C");
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let h = started().await;
    h.service.create(&fields("Pizza Place", "Downtown")).await.unwrap();
    h.service.create(&fields("Burger Joint", "Uptown")).await.unwrap();

    assert_eq!(h.service.search("name", "PIZZ").await.unwrap().len(), 1);
    assert_eq!(h.service.search("location", "town").await.unwrap().len(), 2);
    assert!(h.service.search("name", "sushi").await.unwrap().is_empty());
}

#[tokio::test]
async fn search_multi_word_requires_every_word() {
    let h = started().await;
    h.service.create(&fields("Pizza Place", "Downtown")).await.unwrap();
    h.service.create(&fields("Pizza Hut", "Downtown")).await.unwrap();

    let found = h.service.search("name", "pizza place").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Pizza Place");
}

#[tokio::test]
async fn search_punctuated_value_matches() {
    let h = started().await;
    h.service.create(&fields("Joe's Tex-Mex", "Main St.")).await.unwrap();
    h.service.create(&fields("Tex Burger", "Main St.")).await.unwrap();

    let found = h.service.search("name", "Tex-Mex").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Joe's Tex-Mex");
    assert_eq!(h.service.search("name", "joe's").await.unwrap().len(), 1);
    assert_eq!(h.service.search("location", "main st.").await.unwrap().len(), 2);
}

#[tokio::test]
async fn search_rejects_unknown_field_without_contacting_index() {
    // Never started: the index has no schema, so any query would fail
    let h = harness();

    let err = h.service.search("owner", "bob").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidSearchField(ref f) if f == "owner"));

    let err = h.service.search("Name", "pizza").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidSearchField(_)));
}

#[tokio::test]
async fn search_rejects_blank_value() {
    let h = started().await;
    let err = h.service.search("name", "  ").await.unwrap_err();
    assert!(matches!(err, ServiceError::EmptySearchValue));
    assert!(err.is_client_error());

    // Nothing left to search for once separators are removed
    let err = h.service.search("name", " - ' ").await.unwrap_err();
    assert!(matches!(err, ServiceError::EmptySearchValue));
}

#[tokio::test]
async fn search_results_respect_limit() {
    let store = Arc::new(InMemoryRestaurantStore::new());
    let index = Arc::new(InMemoryIndexClient::new());
    let config = IndexConfig {
        search_limit: 2,
        ..Default::default()
    };
    let service = RestaurantService::new(config, store, index);
    service.start().await.unwrap();
    for _ in 0..5 {
        service.create(&fields("Diner", "Route 66")).await.unwrap();
    }

    let found = service.search("name", "diner").await.unwrap();
    let ids: Vec<i64> = found.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

// =============================================================================
// Shutdown
// =============================================================================

#[tokio::test]
async fn writes_after_shutdown_skip_index() {
    let h = started().await;
    assert!(h.service.shutdown().await);

    let created = h.service.create(&fields("Late Night", "Downtown")).await.unwrap();
    assert_eq!(h.store.len(), 1);
    assert!(h.index.document(&format!("restaurant:{}", created.id)).is_none());
    assert_eq!(h.service.sync_stats().skipped, 1);
}
