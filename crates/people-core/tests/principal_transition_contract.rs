//! Contract Test: Principal Address Transition
//!
//! Constraints verified:
//! - At most one address per person is principal after any transition
//! - Repeating a transition is idempotent and performs no write
//! - `get_principal` reflects the last successful transition
//! - Concurrent transitions for the same person never leave two principals
//! - Transitions for one person never touch another person's addresses
//! - A transition leaves a single principal even if the store held several

mod common;

use common::*;
use people_core::{AddressId, Entity, PersonId};
use std::sync::Arc;

#[tokio::test]
async fn principal_moves_from_one_address_to_another() {
    let fixture = Fixture::with_two_addresses().await;

    fixture
        .manager
        .set_principal(PersonId(1), AddressId(11))
        .await
        .expect("set principal succeeds");

    assert!(fixture.address(11).await.principal);
    assert!(!fixture.address(10).await.principal);
    assert_eq!(
        fixture.manager.get_principal(PersonId(1)).await.unwrap().id,
        AddressId(11)
    );

    fixture
        .manager
        .set_principal(PersonId(1), AddressId(10))
        .await
        .expect("set principal succeeds");

    assert!(fixture.address(10).await.principal);
    assert!(!fixture.address(11).await.principal);
    assert_eq!(
        fixture.manager.get_principal(PersonId(1)).await.unwrap().id,
        AddressId(10)
    );
}

#[tokio::test]
async fn repeating_a_transition_is_idempotent() {
    let fixture = Fixture::with_two_addresses().await;

    fixture
        .manager
        .set_principal(PersonId(1), AddressId(10))
        .await
        .unwrap();
    let writes_after_first = fixture.addresses.write_count();
    let before = fixture.manager.list_addresses(PersonId(1)).await.unwrap();

    fixture
        .manager
        .set_principal(PersonId(1), AddressId(10))
        .await
        .expect("second call succeeds");

    assert_eq!(
        fixture.addresses.write_count(),
        writes_after_first,
        "Second identical call must not write"
    );
    assert_eq!(fixture.manager.list_addresses(PersonId(1)).await.unwrap(), before);
}

#[tokio::test]
async fn address_of_another_person_is_not_found() {
    let fixture = Fixture::with_two_addresses().await;
    fixture.seed_person(2, "Bia", "02/03/1991").await;
    fixture.seed_address(20, 2, "Rua C").await;

    let err = fixture
        .manager
        .set_principal(PersonId(1), AddressId(20))
        .await
        .unwrap_err();

    assert!(err.is_not_found(Entity::Address));
    assert_eq!(fixture.addresses.write_count(), 0);
    assert!(!fixture.address(20).await.principal);
}

#[tokio::test]
async fn transitions_are_scoped_to_the_owner() {
    let fixture = Fixture::with_two_addresses().await;
    fixture.seed_person(2, "Bia", "02/03/1991").await;
    fixture.seed_address(20, 2, "Rua C").await;

    fixture
        .manager
        .set_principal(PersonId(2), AddressId(20))
        .await
        .unwrap();
    fixture
        .manager
        .set_principal(PersonId(1), AddressId(11))
        .await
        .unwrap();

    assert_eq!(fixture.principal_ids(2).await, vec![AddressId(20)]);
    assert_eq!(fixture.principal_ids(1).await, vec![AddressId(11)]);
}

#[tokio::test]
async fn any_sequence_leaves_at_most_one_principal() {
    let fixture = Fixture::new();
    fixture.seed_person(1, "Ana", "01/02/1990").await;

    let mut ids = Vec::new();
    for n in 0..5 {
        let address = fixture
            .manager
            .add_address(PersonId(1), draft(&format!("Rua {}", n)))
            .await
            .unwrap();
        ids.push(address.id);
    }

    assert!(fixture.principal_ids(1).await.is_empty());

    // Deterministic but irregular visiting order, with repeats
    let sequence = [3, 0, 0, 4, 1, 3, 2, 2, 4, 0];
    for &index in &sequence {
        fixture
            .manager
            .set_principal(PersonId(1), ids[index])
            .await
            .unwrap();

        assert_eq!(fixture.principal_ids(1).await, vec![ids[index]]);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_transitions_leave_exactly_one_principal() {
    let fixture = Arc::new(Fixture::new());
    fixture.seed_person(1, "Ana", "01/02/1990").await;
    for id in 10..18 {
        fixture.seed_address(id, 1, "Rua").await;
    }

    for round in 0..20 {
        let mut handles = Vec::new();
        for id in 10..18 {
            let fixture = Arc::clone(&fixture);
            handles.push(tokio::spawn(async move {
                fixture
                    .manager
                    .set_principal(PersonId(1), AddressId(id))
                    .await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let principals = fixture.principal_ids(1).await;
        assert_eq!(
            principals.len(),
            1,
            "Round {}: expected exactly one principal, got {:?}",
            round,
            principals
        );
    }
}

#[tokio::test]
async fn transition_to_one_of_two_principals_clears_the_other() {
    let fixture = Fixture::new();
    fixture.seed_person(1, "Ana", "01/02/1990").await;
    fixture.seed_principal_address(10, 1, "Rua A").await;
    fixture.seed_principal_address(11, 1, "Rua B").await;

    fixture
        .manager
        .set_principal(PersonId(1), AddressId(11))
        .await
        .expect("set principal succeeds");

    assert_eq!(fixture.principal_ids(1).await, vec![AddressId(11)]);
    assert_eq!(fixture.addresses.write_count(), 1);
    assert_eq!(
        fixture.manager.get_principal(PersonId(1)).await.unwrap().id,
        AddressId(11)
    );

    // Now the only principal, so a repeat writes nothing
    fixture
        .manager
        .set_principal(PersonId(1), AddressId(11))
        .await
        .unwrap();
    assert_eq!(fixture.addresses.write_count(), 1);
}

#[tokio::test]
async fn transition_to_a_third_address_clears_every_principal() {
    let fixture = Fixture::new();
    fixture.seed_person(1, "Ana", "01/02/1990").await;
    fixture.seed_principal_address(10, 1, "Rua A").await;
    fixture.seed_principal_address(11, 1, "Rua B").await;
    fixture.seed_address(12, 1, "Rua C").await;

    fixture
        .manager
        .set_principal(PersonId(1), AddressId(12))
        .await
        .unwrap();

    assert_eq!(fixture.principal_ids(1).await, vec![AddressId(12)]);
}
