// Pet Gallery Core
//
// This crate provides the DB-agnostic domain of the pet gallery service.
//
// Key design decisions:
// - Uses traits (PetStore, PetUnitOfWork, PetRepository, FileStore) for pluggable backends
// - AuditingPetRepository pairs every mutation with exactly one EntityEvent in one unit of work
// - Entity types are tagged explicitly (EntityType) rather than derived from type names
// - Service outcomes use ServiceResult<T> for expected failures (invalid input, not found)
// - Validation is an ordered list of rules that collects every violation

// Domain entity types
pub mod entity_event;
pub mod file;
pub mod pet;

pub mod audit;
pub mod error;
pub mod result;
pub mod traits;
pub mod validation;

// In-memory implementations for local runs and testing
pub mod memory;

// Re-exports for convenience
pub use audit::AuditingPetRepository;
pub use entity_event::{EntityEvent, EntityEventKind, EntityType, NewEntityEvent};
pub use error::{Result, StoreError, UploadError};
pub use file::{FileUpload, MAX_IMAGE_WIDTH};
pub use memory::{InMemoryFileStore, InMemoryPetStore};
pub use pet::{Pet, PetRequest};
pub use result::{ResultType, ServiceResult};
pub use traits::{FileStore, PetRepository, PetStore, PetUnitOfWork};
pub use validation::{validate_pet, ValidationRule, PET_RULES};
