// # File Store
//
// File-based implementation of PersonStore and AddressStore with crash
// recovery.
//
// ## Purpose
//
// Keeps person and address records across process restarts in a single
// JSON snapshot file. Several processes (or several `FileStore` values in
// one process) may open the same path at once.
//
// ## Crash Recovery
//
// - Atomic writes: Uses write-then-rename for atomicity
// - Corruption detection: Validates JSON on load
// - Automatic backup: Keeps .backup of last known good snapshot
// - Recovery: Falls back to backup if corruption detected
//
// ## Locking
//
// Nothing is cached between calls. Every call takes an advisory lock on the
// sidecar `.lock` file and reads the snapshot from disk:
//
// - Reads hold a shared lock
// - Mutations (and every `WriteBatch`) hold an exclusive lock across
//   load, mutate and write, so two writers never start from the same
//   snapshot and a failed write leaves the file at the previous state
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "written_at": "2025-01-09T12:00:00Z",
//   "next_person_id": 2,
//   "next_address_id": 3,
//   "persons": [
//     { "id": 1, "name": "Ana", "birth_date": "01/02/1990" }
//   ],
//   "addresses": [
//     { "id": 1, "person_id": 1, "street": "Rua A", "postal_code": "50000-000",
//       "number": "10", "city": "Recife", "principal": true }
//   ]
// }
// ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::records::Records;
use crate::Error;
use crate::config::StoreConfig;
use crate::model::{
    Address, AddressDraft, AddressId, Person, PersonDraft, PersonId, PersonPatch,
};
use crate::traits::{AddressStore, PersonStore, StoreFactory, StoreHandles, WriteBatch};

/// Store file format version
/// Used for future migration if format changes
const STORE_FILE_VERSION: &str = "1.0";

/// File-based store with crash recovery
///
/// # Example
///
/// ```rust,no_run
/// use people_core::store::FileStore;
/// use people_core::{PersonDraft, PersonStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileStore::new("/var/lib/people/people.json").await?;
///
///     // Atomically written to disk before returning
///     let ana = store.create_person(PersonDraft::new("Ana", "01/02/1990")).await?;
///     assert!(store.exists(ana.id).await?);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

/// Serializable store file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct StoreFileFormat {
    version: String,
    written_at: chrono::DateTime<chrono::Utc>,
    next_person_id: i64,
    next_address_id: i64,
    #[serde(default)]
    persons: Vec<Person>,
    #[serde(default)]
    addresses: Vec<Address>,
}

impl StoreFileFormat {
    fn snapshot(records: &Records) -> Self {
        Self {
            version: STORE_FILE_VERSION.to_string(),
            written_at: chrono::Utc::now(),
            next_person_id: records.next_person_id(),
            next_address_id: records.next_address_id(),
            persons: records.persons().cloned().collect(),
            addresses: records.addresses().cloned().collect(),
        }
    }

    fn into_records(self) -> Result<Records, Error> {
        Records::from_parts(
            self.next_person_id,
            self.next_address_id,
            self.persons,
            self.addresses,
        )
    }
}

/// Why a snapshot could not be loaded
enum LoadFailure {
    /// File exists but could not be read
    Unreadable(Error),
    /// File was read but is not a valid snapshot
    Corrupted(Error),
}

/// Where loaded tables came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// The main file, which is safe to copy over the backup
    Main,
    /// The backup, because the main file is corrupted
    Backup,
    /// Nothing usable on disk
    Empty,
}

#[derive(Debug, Clone, Copy)]
enum LockMode {
    Shared,
    Exclusive,
}

/// Advisory lock on the store's `.lock` file, released on drop
struct StoreLock {
    file: std::fs::File,
}

impl StoreLock {
    async fn acquire(path: PathBuf, mode: LockMode) -> Result<Self, Error> {
        tokio::task::spawn_blocking(move || {
            let file = std::fs::OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(&path)
                .map_err(|e| {
                    Error::store(format!(
                        "Failed to open lock file {}: {}",
                        path.display(),
                        e
                    ))
                })?;

            let locked = match mode {
                LockMode::Shared => fs2::FileExt::lock_shared(&file),
                LockMode::Exclusive => fs2::FileExt::lock_exclusive(&file),
            };
            locked.map_err(|e| {
                Error::store(format!("Failed to lock {}: {}", path.display(), e))
            })?;

            Ok(Self { file })
        })
        .await
        .map_err(|e| Error::store(format!("Lock task failed: {}", e)))?
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

impl FileStore {
    /// Create or load a file store
    ///
    /// This will:
    /// 1. Create parent directories if needed
    /// 2. Try to load the existing snapshot
    /// 3. If corruption detected, restore the main file from backup
    /// 4. If both fail, start with empty tables
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create store directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let store = Self { path };
        let _lock = store.lock(LockMode::Exclusive).await?;
        let (_, origin) = Self::load_with_recovery(&store.path).await?;
        if origin == Origin::Backup
            && let Err(restore_err) =
                Self::restore_from_backup(&store.path, &Self::backup_path(&store.path)).await
        {
            tracing::error!("Failed to restore store file from backup: {}", restore_err);
        }

        Ok(store)
    }

    async fn lock(&self, mode: LockMode) -> Result<StoreLock, Error> {
        StoreLock::acquire(Self::lock_path(&self.path), mode).await
    }

    /// Load the snapshot with automatic recovery
    ///
    /// Recovery strategy:
    /// 1. Try to load main file
    /// 2. If it is corrupted, try loading backup
    /// 3. If backup also fails, start with empty tables
    async fn load_with_recovery(path: &Path) -> Result<(Records, Origin), Error> {
        match Self::load(path).await {
            Ok(Some(records)) => Ok((records, Origin::Main)),
            Ok(None) => Ok((Records::default(), Origin::Empty)),
            Err(LoadFailure::Unreadable(e)) => Err(e),
            Err(LoadFailure::Corrupted(e)) => {
                tracing::warn!(
                    "Store file appears corrupted: {}. Attempting recovery from backup.",
                    e
                );

                let backup_path = Self::backup_path(path);
                match Self::load(&backup_path).await {
                    Ok(Some(records)) => {
                        tracing::info!(
                            "Recovered store from backup: {} persons, {} addresses",
                            records.persons().count(),
                            records.addresses().count()
                        );
                        Ok((records, Origin::Backup))
                    }
                    Ok(None) => {
                        tracing::warn!("No backup file found. Starting with empty store.");
                        Ok((Records::default(), Origin::Empty))
                    }
                    Err(LoadFailure::Unreadable(backup_err))
                    | Err(LoadFailure::Corrupted(backup_err)) => {
                        tracing::error!(
                            "Backup also unusable: {}. Starting with empty store.",
                            backup_err
                        );
                        Ok((Records::default(), Origin::Empty))
                    }
                }
            }
        }
    }

    /// Load tables from a snapshot file, `None` if there is no file
    async fn load(path: &Path) -> Result<Option<Records>, LoadFailure> {
        if !path.exists() {
            tracing::debug!("Store file does not exist: {}", path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            LoadFailure::Unreadable(Error::store(format!(
                "Failed to read store file {}: {}",
                path.display(),
                e
            )))
        })?;

        let snapshot: StoreFileFormat = serde_json::from_str(&content).map_err(|e| {
            LoadFailure::Corrupted(Error::store(format!(
                "Failed to parse store file {}: {}",
                path.display(),
                e
            )))
        })?;

        if snapshot.version != STORE_FILE_VERSION {
            tracing::warn!(
                "Store file version mismatch: expected {}, got {}. \
                Attempting to load anyway.",
                STORE_FILE_VERSION,
                snapshot.version
            );
        }

        let records = snapshot.into_records().map_err(LoadFailure::Corrupted)?;
        tracing::trace!(
            "Loaded store from {}: {} persons, {} addresses",
            path.display(),
            records.persons().count(),
            records.addresses().count()
        );
        Ok(Some(records))
    }

    /// Run `query` against the tables currently on disk
    async fn read<T, F>(&self, query: F) -> Result<T, Error>
    where
        F: FnOnce(&Records) -> T + Send,
        T: Send,
    {
        let _lock = self.lock(LockMode::Shared).await?;
        let (records, _) = Self::load_with_recovery(&self.path).await?;
        Ok(query(&records))
    }

    /// Load the tables, apply `mutation` and write them back
    ///
    /// The exclusive lock is held for the whole sequence. Nothing is written
    /// if `mutation` fails.
    async fn commit<T, F>(&self, mutation: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Records) -> Result<T, Error> + Send,
        T: Send,
    {
        let _lock = self.lock(LockMode::Exclusive).await?;
        let (mut records, origin) = Self::load_with_recovery(&self.path).await?;
        let output = mutation(&mut records)?;
        self.write_snapshot(&records, origin == Origin::Main).await?;
        Ok(output)
    }

    /// Write a snapshot to file atomically
    ///
    /// The current main file is copied to the backup first when
    /// `backup_current` is set.
    async fn write_snapshot(&self, records: &Records, backup_current: bool) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(&StoreFileFormat::snapshot(records))
            .map_err(|e| Error::store(format!("Failed to serialize store: {}", e)))?;

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::store(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.sync_all().await.map_err(|e| {
                Error::store(format!(
                    "Failed to sync temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        if backup_current {
            let backup_path = Self::backup_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &backup_path).await {
                tracing::warn!("Failed to create backup: {}", e);
            }
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Store written to file: {}", self.path.display());
        Ok(())
    }

    /// Restore store file from backup
    async fn restore_from_backup(path: &Path, backup_path: &Path) -> Result<(), Error> {
        fs::copy(backup_path, path).await.map_err(|e| {
            Error::store(format!(
                "Failed to restore from backup {} to {}: {}",
                backup_path.display(),
                path.display(),
                e
            ))
        })?;

        tracing::info!("Restored store file from backup");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }

    fn lock_path(path: &Path) -> PathBuf {
        let mut lock = path.to_path_buf();
        lock.set_extension("lock");
        lock
    }
}

#[async_trait]
impl PersonStore for FileStore {
    async fn exists(&self, id: PersonId) -> Result<bool, Error> {
        self.read(|records| records.person(id).is_some()).await
    }

    async fn get_person(&self, id: PersonId) -> Result<Option<Person>, Error> {
        self.read(|records| records.person(id).cloned()).await
    }

    async fn create_person(&self, draft: PersonDraft) -> Result<Person, Error> {
        self.commit(|records| records.create_person(draft)).await
    }

    async fn save_person(&self, person: &Person) -> Result<(), Error> {
        let person = person.clone();
        self.commit(|records| records.save_person(person)).await
    }

    async fn update_person(
        &self,
        id: PersonId,
        patch: PersonPatch,
    ) -> Result<Option<Person>, Error> {
        self.commit(|records| Ok(records.update_person(id, patch)))
            .await
    }

    async fn list_all(&self) -> Result<Vec<Person>, Error> {
        self.read(|records| records.persons().cloned().collect())
            .await
    }
}

#[async_trait]
impl AddressStore for FileStore {
    async fn get_address(&self, id: AddressId) -> Result<Option<Address>, Error> {
        self.read(|records| records.address(id).cloned()).await
    }

    async fn list_by_person(&self, person_id: PersonId) -> Result<Vec<Address>, Error> {
        self.read(|records| records.addresses_of(person_id)).await
    }

    async fn create_address(
        &self,
        person_id: PersonId,
        draft: AddressDraft,
    ) -> Result<Address, Error> {
        self.commit(|records| records.create_address(person_id, draft))
            .await
    }

    async fn save_address(&self, address: &Address) -> Result<(), Error> {
        let address = address.clone();
        self.commit(|records| records.save_address(address)).await
    }

    async fn clear_principal_for_person(&self, person_id: PersonId) -> Result<usize, Error> {
        self.commit(|records| Ok(records.clear_principal(person_id)))
            .await
    }

    async fn apply(&self, batch: WriteBatch) -> Result<(), Error> {
        if batch.is_empty() {
            return Ok(());
        }
        self.commit(|records| records.apply(batch)).await
    }
}

/// Factory registered as `file` in the store registry
#[derive(Debug, Default)]
pub struct FileStoreFactory;

#[async_trait]
impl StoreFactory for FileStoreFactory {
    async fn create(&self, config: &StoreConfig) -> Result<StoreHandles, Error> {
        match config {
            StoreConfig::File { path } => {
                let store = FileStore::new(path).await?;
                Ok(StoreHandles::shared(Arc::new(store)))
            }
            other => Err(Error::config(format!(
                "File store factory cannot build a '{}' store",
                other.type_name()
            ))),
        }
    }
}
