// Pet service for business logic

use petgallery_core::{
    validate_pet, Pet, PetRepository, PetRequest, Result, ServiceResult, StoreError,
};
use std::sync::Arc;

pub struct PetService {
    repository: Arc<dyn PetRepository>,
}

impl PetService {
    pub fn new(repository: Arc<dyn PetRepository>) -> Self {
        Self { repository }
    }

    pub async fn find_all(&self) -> Result<Vec<Pet>> {
        self.repository.find_all().await
    }

    pub async fn find_by_id(&self, pet_id: i32) -> Result<Option<Pet>> {
        self.repository.find_by_id(pet_id).await
    }

    /// Validate and create a pet. Any client-supplied id is ignored.
    pub async fn add(&self, pet: Option<PetRequest>, actor_id: i32) -> Result<ServiceResult<Pet>> {
        let mut pet = match validate_pet(pet.as_ref()) {
            Ok(pet) => pet,
            Err(messages) => {
                tracing::warn!(?messages, "Rejected invalid pet");
                return Ok(ServiceResult::invalid(messages));
            }
        };
        pet.pet_id = 0;

        let saved = self.repository.save(pet, actor_id).await?;
        Ok(ServiceResult::with_payload(saved))
    }

    /// Validate and replace an existing pet
    pub async fn update(&self, pet: Option<PetRequest>, actor_id: i32) -> Result<ServiceResult<()>> {
        let pet = match validate_pet(pet.as_ref()) {
            Ok(pet) => pet,
            Err(messages) => {
                tracing::warn!(?messages, "Rejected invalid pet");
                return Ok(ServiceResult::invalid(messages));
            }
        };

        if self.find_by_id(pet.pet_id).await?.is_none() {
            return Ok(Self::not_found(pet.pet_id));
        }

        // The row can vanish between the check and the write.
        match self.repository.save(pet, actor_id).await {
            Ok(_) => Ok(ServiceResult::success()),
            Err(StoreError::NotFound(pet_id)) => Ok(Self::not_found(pet_id)),
            Err(e) => Err(e),
        }
    }

    pub async fn delete_by_id(&self, pet_id: i32, actor_id: i32) -> Result<ServiceResult<()>> {
        if self.find_by_id(pet_id).await?.is_none() {
            return Ok(Self::not_found(pet_id));
        }

        match self.repository.delete_by_id(pet_id, actor_id).await {
            Ok(()) => Ok(ServiceResult::success()),
            Err(StoreError::NotFound(pet_id)) => Ok(Self::not_found(pet_id)),
            Err(e) => Err(e),
        }
    }

    fn not_found<T>(pet_id: i32) -> ServiceResult<T> {
        tracing::warn!(pet_id, "Pet not found");
        ServiceResult::not_found(format!("Pet id: '{}' not found.", pet_id))
    }
}
