//! Minimal embedding example for people-core
//!
//! The application owns the store, registers it under a custom factory name
//! and drives the services directly instead of going through `peoplectl`.

use async_trait::async_trait;
use people_core::{
    AddressDraft, MemoryStore, PersonDraft, Result, Services, StoreConfig, StoreFactory,
    StoreHandles, StoreRegistry, Validate,
};
use std::sync::Arc;

/// Hands out one application-owned store to every caller
struct SharedStoreFactory {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl StoreFactory for SharedStoreFactory {
    async fn create(&self, _config: &StoreConfig) -> Result<StoreHandles> {
        Ok(StoreHandles::shared(self.store.clone()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let store = Arc::new(MemoryStore::new());
    let registry = StoreRegistry::with_builtin();
    registry.register_store(
        "shared",
        Box::new(SharedStoreFactory {
            store: store.clone(),
        }),
    );

    let config = StoreConfig::Custom {
        factory: "shared".to_string(),
        config: serde_json::json!({}),
    };
    let services = Services::new(registry.create_stores(&config).await?);

    let draft = PersonDraft::new("Ana", "01/02/1990");
    draft.validate()?;
    let ana = services.persons.create(draft).await?;

    let work = services
        .addresses
        .add_address(ana.id, AddressDraft::new("Rua A", "50000-000", "10", "Recife"))
        .await?;
    let home = services
        .addresses
        .add_address(ana.id, AddressDraft::new("Rua B", "50000-001", "22", "Recife"))
        .await?;

    services.addresses.set_principal(ana.id, work.id).await?;
    services.addresses.set_principal(ana.id, home.id).await?;

    let principal = services.addresses.get_principal(ana.id).await?;
    tracing::info!(
        person = %ana.id,
        address = %principal.id,
        street = %principal.street,
        "Principal address"
    );

    tracing::info!(
        persons = store.person_count().await,
        addresses = store.address_count().await,
        "Store contents"
    );

    Ok(())
}
