//! Behaviour every [`VehicleStore`] must share, written once against
//! `&dyn VehicleStore` and run from each backend's test module.

use super::{UpsertOutcome, VehicleStore};
use crate::domain::vehicle::tests::passat;
use crate::domain::{NewVehicle, Source, Status, Vehicle, VehicleChanges, VehicleId};
use crate::error::ListingError;

async fn create(store: &dyn VehicleStore, vehicle: NewVehicle) -> VehicleId {
    let Ok(id) = store.create(vehicle).await else {
        panic!("create failed");
    };
    id
}

async fn fetch(store: &dyn VehicleStore, id: VehicleId) -> Vehicle {
    let Ok(Some(vehicle)) = store.get_by_id(id).await else {
        panic!("vehicle {id} not found");
    };
    vehicle
}

async fn all(store: &dyn VehicleStore) -> Vec<Vehicle> {
    let Ok(all) = store.list_all().await else {
        panic!("list_all failed");
    };
    all
}

fn scraped(price: i64, km: i64) -> NewVehicle {
    let mut v = passat();
    v.title = "2019 Volkswagen Passat 1.6 TDI Comfortline".to_string();
    v.price = price;
    v.km = km;
    v.source = Source::Sahibinden;
    v.description = Some("Sahibinden temiz araç".to_string());
    v
}

pub(crate) async fn passat_scenario(store: &dyn VehicleStore) {
    let id = create(store, passat()).await;
    assert_eq!(id, VehicleId::new(1));

    let stored = fetch(store, id).await;
    assert_eq!(stored.title, "2019 VW Passat");
    assert_eq!(stored.price, 890_000);
    assert_eq!(stored.images, vec!["https://x/1.jpg".to_string()]);
    assert_eq!(stored.created_at, stored.updated_at);

    let updated = store.update(id, &VehicleChanges::status(Status::Sold)).await;
    assert!(matches!(updated, Ok(true)));
    let sold = fetch(store, id).await;
    assert_eq!(sold.status, Status::Sold);
    assert_eq!(sold.title, stored.title);
    assert_eq!(sold.images, stored.images);
    assert_eq!(sold.created_at, stored.created_at);
    assert!(sold.updated_at > stored.updated_at);

    assert!(matches!(store.delete(id).await, Ok(true)));
    assert!(matches!(store.get_by_id(id).await, Ok(None)));
}

pub(crate) async fn create_round_trips_every_field(store: &dyn VehicleStore) {
    let mut new = passat();
    new.images = vec![
        "https://x/3.jpg".to_string(),
        "https://x/1.jpg".to_string(),
        "https://x/2.jpg".to_string(),
    ];
    new.whatsapp = Some("905320000000".to_string());
    new.description = Some("Hatasız, boyasız".to_string());
    new.scrape_id = Some("manual-import-7".to_string());

    let id = create(store, new.clone()).await;
    let stored = fetch(store, id).await;
    let expected = new.into_vehicle(id, stored.created_at);
    assert_eq!(stored, expected);
}

pub(crate) async fn partial_update_changes_only_named_fields(store: &dyn VehicleStore) {
    let mut new = passat();
    new.whatsapp = Some("905320000000".to_string());
    let id = create(store, new).await;
    let before = fetch(store, id).await;

    let changes = VehicleChanges {
        price: Some(850_000),
        images: Some(vec![]),
        description: Some(Some("Fiyat düştü".to_string())),
        ..VehicleChanges::default()
    };
    assert!(matches!(store.update(id, &changes).await, Ok(true)));

    let after = fetch(store, id).await;
    let mut expected = before.clone();
    expected.price = 850_000;
    expected.images = vec![];
    expected.description = Some("Fiyat düştü".to_string());
    expected.updated_at = after.updated_at;
    assert_eq!(after, expected);
    assert!(after.updated_at > before.updated_at);
}

pub(crate) async fn explicit_null_clears_nullable_field(store: &dyn VehicleStore) {
    let mut new = passat();
    new.whatsapp = Some("905320000000".to_string());
    new.description = Some("Tramer kaydı yok".to_string());
    let id = create(store, new).await;

    let changes = VehicleChanges {
        whatsapp: Some(None),
        ..VehicleChanges::default()
    };
    assert!(matches!(store.update(id, &changes).await, Ok(true)));

    let after = fetch(store, id).await;
    assert_eq!(after.whatsapp, None);
    assert_eq!(after.description.as_deref(), Some("Tramer kaydı yok"));
}

pub(crate) async fn empty_or_unknown_update_is_a_no_op(store: &dyn VehicleStore) {
    let id = create(store, passat()).await;
    let before = fetch(store, id).await;

    assert!(matches!(
        store.update(id, &VehicleChanges::default()).await,
        Ok(false)
    ));
    assert_eq!(fetch(store, id).await, before);

    assert!(matches!(
        store
            .update(VehicleId::new(9_999), &VehicleChanges::status(Status::Sold))
            .await,
        Ok(false)
    ));
}

pub(crate) async fn repeated_updates_keep_advancing_updated_at(store: &dyn VehicleStore) {
    let id = create(store, passat()).await;

    let mut last = fetch(store, id).await.updated_at;
    for status in [Status::Sold, Status::Active, Status::Sold, Status::Sold] {
        let _ = store.update(id, &VehicleChanges::status(status)).await;
        let now = fetch(store, id).await.updated_at;
        assert!(now > last);
        last = now;
    }
}

pub(crate) async fn delete_is_idempotent(store: &dyn VehicleStore) {
    assert!(matches!(store.delete(VehicleId::new(9_999)).await, Ok(false)));

    let id = create(store, passat()).await;
    assert!(matches!(store.delete(id).await, Ok(true)));
    assert!(matches!(store.delete(id).await, Ok(false)));
    assert!(all(store).await.is_empty());
}

pub(crate) async fn ids_are_not_reused(store: &dyn VehicleStore) {
    let first = create(store, passat()).await;
    let _ = store.delete(first).await;
    let second = create(store, passat()).await;
    assert!(second > first);
}

pub(crate) async fn list_active_is_ordered_subset_of_list_all(store: &dyn VehicleStore) {
    for i in 0..5 {
        let mut v = passat();
        v.title = format!("listing {i}");
        if i % 2 == 1 {
            v.status = Status::Sold;
        }
        let _ = create(store, v).await;
    }

    let all = all(store).await;
    let Ok(active) = store.list_active().await else {
        panic!("list_active failed");
    };

    let expected: Vec<Vehicle> = all.iter().filter(|v| v.is_active()).cloned().collect();
    assert_eq!(active, expected);
    assert_eq!(all.len(), 5);
    assert_eq!(active.len(), 3);

    // Newest first: later inserts come first.
    let titles: Vec<&str> = all.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["listing 4", "listing 3", "listing 2", "listing 1", "listing 0"]
    );
}

pub(crate) async fn upsert_creates_then_refreshes_price_and_km_only(store: &dyn VehicleStore) {
    let first = store
        .upsert_by_scrape_id("sahibinden_test_12345", scraped(890_000, 78_000))
        .await;
    let Ok(UpsertOutcome::Created(id)) = first else {
        panic!("expected a created outcome");
    };
    let created = fetch(store, id).await;
    assert_eq!(created.scrape_id.as_deref(), Some("sahibinden_test_12345"));
    assert_eq!(created.source, Source::Sahibinden);
    assert_eq!(created.price, 890_000);

    // Manual edits made after ingestion.
    let edit = VehicleChanges {
        status: Some(Status::Sold),
        description: Some(Some("Elden satıldı".to_string())),
        ..VehicleChanges::default()
    };
    let _ = store.update(id, &edit).await;
    let edited = fetch(store, id).await;

    let mut rescrape = scraped(870_000, 79_500);
    rescrape.title = "Different title".to_string();
    rescrape.images = vec!["https://x/other.jpg".to_string()];
    rescrape.description = Some("Different description".to_string());
    rescrape.status = Status::Active;

    let second = store
        .upsert_by_scrape_id("sahibinden_test_12345", rescrape)
        .await;
    assert!(matches!(second, Ok(UpsertOutcome::Updated(same)) if same == id));

    let refreshed = fetch(store, id).await;
    let mut expected = edited.clone();
    expected.price = 870_000;
    expected.km = 79_500;
    expected.updated_at = refreshed.updated_at;
    assert_eq!(refreshed, expected);
    assert!(refreshed.updated_at > edited.updated_at);
    assert_eq!(all(store).await.len(), 1);
}

pub(crate) async fn concurrent_refreshes_of_one_scrape_id(store: &dyn VehicleStore) {
    let Ok(UpsertOutcome::Created(id)) = store
        .upsert_by_scrape_id("sahibinden_race", scraped(500_000, 10_000))
        .await
    else {
        panic!("expected a created outcome");
    };

    let (a, b) = tokio::join!(
        store.upsert_by_scrape_id("sahibinden_race", scraped(490_000, 10_500)),
        store.upsert_by_scrape_id("sahibinden_race", scraped(480_000, 11_000)),
    );
    assert!(matches!(a, Ok(UpsertOutcome::Updated(same)) if same == id));
    assert!(matches!(b, Ok(UpsertOutcome::Updated(same)) if same == id));

    let listings = all(store).await;
    assert_eq!(listings.len(), 1);
    let refreshed = fetch(store, id).await;
    assert!(
        (refreshed.price, refreshed.km) == (490_000, 10_500)
            || (refreshed.price, refreshed.km) == (480_000, 11_000)
    );
}

pub(crate) async fn duplicate_scrape_id_on_create_is_a_storage_error(store: &dyn VehicleStore) {
    let mut v = scraped(1, 1);
    v.scrape_id = Some("dup".to_string());
    let _ = create(store, v.clone()).await;

    assert!(matches!(store.create(v).await, Err(ListingError::Storage(_))));
    assert_eq!(all(store).await.len(), 1);
}
