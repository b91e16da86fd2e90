// Services layer for business logic
// Services own validation and outcome mapping, calling repositories and stores

pub mod file;
pub mod pet;

pub use file::{FileService, UnconfiguredFileStore};
pub use pet::PetService;
