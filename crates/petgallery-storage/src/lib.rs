// Postgres and object storage layer
//
// This crate provides production implementations for core traits:
// - DbPetStore: implements PetStore with transaction-backed units of work
// - ObjectFileStore: implements FileStore on top of object_store (S3)

pub mod file_store;
pub mod models;
pub mod pet_store;
pub mod repositories;

pub use file_store::{ObjectFileStore, S3Config};
pub use models::*;
pub use pet_store::{create_db_pet_store, DbPetStore};
pub use repositories::*;
