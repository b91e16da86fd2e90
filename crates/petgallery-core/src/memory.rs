// In-memory implementations for local runs and testing
//
// These implementations keep all data in memory, making them perfect for:
// - Running the API locally without a database
// - Unit tests
// - Quick prototyping

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::entity_event::{EntityEvent, EntityType, NewEntityEvent};
use crate::error::{Result, StoreError, UploadError};
use crate::file::FileUpload;
use crate::pet::Pet;
use crate::traits::{FileStore, PetStore, PetUnitOfWork};

// ============================================================================
// InMemoryPetStore - Stores pets and events in memory
// ============================================================================

#[derive(Debug, Clone, Default)]
struct StoreState {
    pets: BTreeMap<i32, Pet>,
    events: Vec<EntityEvent>,
    last_pet_id: i32,
    last_event_id: i32,
}

/// In-memory pet store
///
/// Pets are kept ordered by id. A unit of work holds the store lock until it
/// is committed or dropped, and works on a private copy of the state that
/// only replaces the shared state on commit.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPetStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryPetStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with pets (useful for testing). Ids are kept as given.
    pub async fn seed(&self, pets: Vec<Pet>) {
        let mut state = self.state.lock().await;
        for pet in pets {
            state.last_pet_id = state.last_pet_id.max(pet.pet_id);
            state.pets.insert(pet.pet_id, pet);
        }
    }

    /// Every recorded event, oldest first
    pub async fn events(&self) -> Vec<EntityEvent> {
        self.state.lock().await.events.clone()
    }
}

#[async_trait]
impl PetStore for InMemoryPetStore {
    async fn find_all(&self) -> Result<Vec<Pet>> {
        Ok(self.state.lock().await.pets.values().cloned().collect())
    }

    async fn find_by_id(&self, pet_id: i32) -> Result<Option<Pet>> {
        Ok(self.state.lock().await.pets.get(&pet_id).cloned())
    }

    async fn find_events(
        &self,
        entity_type: EntityType,
        entity_id: i32,
    ) -> Result<Vec<EntityEvent>> {
        Ok(self
            .state
            .lock()
            .await
            .events
            .iter()
            .filter(|e| e.entity_type == entity_type && e.entity_id == entity_id)
            .cloned()
            .collect())
    }

    async fn begin(&self) -> Result<Box<dyn PetUnitOfWork>> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryUnitOfWork {
            guard: Some(guard),
            staged,
        }))
    }
}

struct InMemoryUnitOfWork {
    guard: Option<OwnedMutexGuard<StoreState>>,
    staged: StoreState,
}

impl InMemoryUnitOfWork {
    fn ensure_open(&self) -> Result<()> {
        if self.guard.is_none() {
            return Err(StoreError::database("unit of work already committed"));
        }
        Ok(())
    }
}

#[async_trait]
impl PetUnitOfWork for InMemoryUnitOfWork {
    async fn insert_pet(&mut self, pet: &Pet) -> Result<Pet> {
        self.ensure_open()?;
        self.staged.last_pet_id += 1;
        let saved = Pet {
            pet_id: self.staged.last_pet_id,
            ..pet.clone()
        };
        self.staged.pets.insert(saved.pet_id, saved.clone());
        Ok(saved)
    }

    async fn update_pet(&mut self, pet: &Pet) -> Result<Pet> {
        self.ensure_open()?;
        match self.staged.pets.get_mut(&pet.pet_id) {
            Some(existing) => {
                *existing = pet.clone();
                Ok(pet.clone())
            }
            None => Err(StoreError::not_found(pet.pet_id)),
        }
    }

    async fn delete_pet(&mut self, pet_id: i32) -> Result<()> {
        self.ensure_open()?;
        self.staged
            .pets
            .remove(&pet_id)
            .map(|_| ())
            .ok_or(StoreError::not_found(pet_id))
    }

    async fn append_event(&mut self, event: NewEntityEvent) -> Result<EntityEvent> {
        self.ensure_open()?;
        self.staged.last_event_id += 1;
        let event = event.into_event(self.staged.last_event_id, Utc::now());
        self.staged.events.push(event.clone());
        Ok(event)
    }

    async fn commit(&mut self) -> Result<()> {
        let mut guard = self
            .guard
            .take()
            .ok_or_else(|| StoreError::database("unit of work already committed"))?;
        *guard = std::mem::take(&mut self.staged);
        Ok(())
    }
}

// ============================================================================
// InMemoryFileStore - Keeps uploaded files in memory
// ============================================================================

/// In-memory file store
///
/// Returns `memory://{file_name}` URLs. Useful for testing the upload path
/// without object storage.
#[derive(Debug, Default, Clone)]
pub struct InMemoryFileStore {
    files: Arc<RwLock<BTreeMap<String, FileUpload>>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an uploaded file by name
    pub async fn get(&self, file_name: &str) -> Option<FileUpload> {
        self.files.read().await.get(file_name).cloned()
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn upload(&self, file: FileUpload) -> std::result::Result<String, UploadError> {
        if file.file_name.trim().is_empty() {
            return Err(UploadError::InvalidFileName(file.file_name));
        }
        let url = format!("memory://{}", file.file_name);
        self.files
            .write()
            .await
            .insert(file.file_name.clone(), file);
        Ok(url)
    }
}
