// Core traits for pluggable backends
//
// These traits allow the service layer to run against different backends:
// - In-memory implementations for local runs and testing
// - Database implementations for production
//
// PetStore/PetUnitOfWork are the raw storage seam. PetRepository is what
// services call; its production implementation is AuditingPetRepository,
// which turns every save/delete into one unit of work with an audit event.

use async_trait::async_trait;

use crate::entity_event::{EntityEvent, EntityType, NewEntityEvent};
use crate::error::{Result, UploadError};
use crate::file::FileUpload;
use crate::pet::Pet;

// ============================================================================
// PetUnitOfWork - Writes that commit or roll back together
// ============================================================================

/// A set of writes that become visible together on `commit`
///
/// Dropping a unit of work without committing discards every write made
/// through it.
#[async_trait]
pub trait PetUnitOfWork: Send {
    /// Insert a new pet, assigning a fresh id
    async fn insert_pet(&mut self, pet: &Pet) -> Result<Pet>;

    /// Replace all fields of an existing pet; NotFound if the row is absent
    async fn update_pet(&mut self, pet: &Pet) -> Result<Pet>;

    /// Remove a pet; NotFound if the row is absent
    async fn delete_pet(&mut self, pet_id: i32) -> Result<()>;

    /// Append an audit event
    async fn append_event(&mut self, event: NewEntityEvent) -> Result<EntityEvent>;

    /// Make all writes durable. Calling any method after commit is an error.
    async fn commit(&mut self) -> Result<()>;
}

// ============================================================================
// PetStore - Reads plus the entry point for writes
// ============================================================================

#[async_trait]
pub trait PetStore: Send + Sync {
    /// All pets in storage order
    async fn find_all(&self) -> Result<Vec<Pet>>;

    async fn find_by_id(&self, pet_id: i32) -> Result<Option<Pet>>;

    /// Audit events recorded for one entity, oldest first
    async fn find_events(&self, entity_type: EntityType, entity_id: i32)
        -> Result<Vec<EntityEvent>>;

    /// Start a unit of work
    async fn begin(&self) -> Result<Box<dyn PetUnitOfWork>>;
}

// ============================================================================
// PetRepository - Actor-aware persistence used by services
// ============================================================================

#[async_trait]
pub trait PetRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Pet>>;

    async fn find_by_id(&self, pet_id: i32) -> Result<Option<Pet>>;

    /// Insert when `pet.pet_id` is 0, otherwise update
    async fn save(&self, pet: Pet, actor_id: i32) -> Result<Pet>;

    async fn delete_by_id(&self, pet_id: i32, actor_id: i32) -> Result<()>;
}

// ============================================================================
// FileStore - Uploads to object storage
// ============================================================================

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store the file and return the URL it can be fetched from
    async fn upload(&self, file: FileUpload) -> std::result::Result<String, UploadError>;
}
