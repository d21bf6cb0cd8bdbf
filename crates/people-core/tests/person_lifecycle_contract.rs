//! Contract Test: Person Lifecycle
//!
//! Constraints verified:
//! - An empty partial update is rejected and changes nothing
//! - Partial updates only overwrite supplied fields
//! - Concurrent partial updates of different fields all survive
//! - Records and principal flags survive a restart of the file store

mod common;

use common::*;
use people_core::store::MemoryStore;
use people_core::{
    AddressDraft, Entity, Error, PersonDraft, PersonId, PersonPatch, PersonService, Services,
    StoreConfig, StoreRegistry,
};
use std::sync::Arc;
use tempfile::tempdir;

#[tokio::test]
async fn empty_update_is_invalid_and_changes_nothing() {
    let fixture = Fixture::new();
    let ana = fixture.seed_person(1, "Ana", "01/02/1990").await;

    let err = fixture
        .persons
        .update(PersonId(1), PersonPatch::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidArguments(_)));
    assert_eq!(fixture.persons.get(PersonId(1)).await.unwrap(), ana);
}

#[tokio::test]
async fn update_of_unknown_person_is_not_found() {
    let fixture = Fixture::new();

    let err = fixture
        .persons
        .update(PersonId(5), PersonPatch::default().with_name("Bia"))
        .await
        .unwrap_err();

    assert!(err.is_not_found(Entity::Person));
    assert!(fixture.persons.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn partial_update_keeps_absent_fields() {
    let fixture = Fixture::new();
    fixture.seed_person(1, "Ana", "01/02/1990").await;

    fixture
        .persons
        .update(PersonId(1), PersonPatch::default().with_birth_date("09/09/1999"))
        .await
        .unwrap();

    let stored = fixture.persons.get(PersonId(1)).await.unwrap();
    assert_eq!(stored.name, "Ana");
    assert_eq!(stored.birth_date, "09/09/1999");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_updates_of_different_fields_both_survive() {
    let store = Arc::new(MemoryStore::new());
    let service = PersonService::new(Arc::new(YieldingPersonStore::new(store.clone())));
    let id = service
        .create(PersonDraft::new("Ana", "01/02/1990"))
        .await
        .unwrap()
        .id;

    for round in 0..50 {
        let name = format!("Ana {}", round);
        let birth_date = format!("{:02}/03/1990", round % 28 + 1);

        let rename = {
            let service = service.clone();
            let patch = PersonPatch::default().with_name(name.clone());
            tokio::spawn(async move { service.update(id, patch).await })
        };
        let redate = {
            let service = service.clone();
            let patch = PersonPatch::default().with_birth_date(birth_date.clone());
            tokio::spawn(async move { service.update(id, patch).await })
        };
        rename.await.unwrap().unwrap();
        redate.await.unwrap().unwrap();

        let stored = service.get(id).await.unwrap();
        assert_eq!(
            (stored.name.as_str(), stored.birth_date.as_str()),
            (name.as_str(), birth_date.as_str()),
            "Round {}: a concurrent update was lost",
            round
        );
    }
}

#[tokio::test]
async fn file_backed_services_survive_restart() {
    let dir = tempdir().unwrap();
    let config = StoreConfig::File {
        path: dir.path().join("people.json").to_string_lossy().into_owned(),
    };
    let registry = StoreRegistry::with_builtin();

    let (ana, home) = {
        let services = Services::new(registry.create_stores(&config).await.unwrap());
        let ana = services
            .persons
            .create(PersonDraft::new("Ana", "01/02/1990"))
            .await
            .unwrap();
        services
            .addresses
            .add_address(ana.id, AddressDraft::new("Rua A", "50000-000", "1", "Recife"))
            .await
            .unwrap();
        let home = services
            .addresses
            .add_address(ana.id, AddressDraft::new("Rua B", "50000-001", "2", "Recife"))
            .await
            .unwrap();
        services.addresses.set_principal(ana.id, home.id).await.unwrap();
        (ana, home)
    };

    let services = Services::new(registry.create_stores(&config).await.unwrap());
    assert_eq!(services.persons.get(ana.id).await.unwrap(), ana);

    let principal = services.addresses.get_principal(ana.id).await.unwrap();
    assert_eq!(principal.id, home.id);
    assert_eq!(services.addresses.list_addresses(ana.id).await.unwrap().len(), 2);
}
