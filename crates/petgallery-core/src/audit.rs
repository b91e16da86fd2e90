// Audited pet repository
//
// Wraps a PetStore so that every successful save or delete is paired with
// exactly one EntityEvent, written in the same unit of work. If either write
// fails the unit of work is dropped uncommitted and nothing persists.

use async_trait::async_trait;

use crate::entity_event::{EntityEventKind, EntityType, NewEntityEvent};
use crate::error::Result;
use crate::pet::Pet;
use crate::traits::{PetRepository, PetStore};

/// PetRepository that records an audit event for every mutation
#[derive(Debug, Clone)]
pub struct AuditingPetRepository<S> {
    store: S,
}

impl<S: PetStore> AuditingPetRepository<S> {
    /// Tag written on every event produced by this repository
    pub const ENTITY_TYPE: EntityType = EntityType::Pet;

    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S: PetStore> PetRepository for AuditingPetRepository<S> {
    async fn find_all(&self) -> Result<Vec<Pet>> {
        self.store.find_all().await
    }

    async fn find_by_id(&self, pet_id: i32) -> Result<Option<Pet>> {
        self.store.find_by_id(pet_id).await
    }

    async fn save(&self, pet: Pet, actor_id: i32) -> Result<Pet> {
        let event_kind = if pet.is_new() {
            EntityEventKind::Create
        } else {
            EntityEventKind::Update
        };

        let mut uow = self.store.begin().await?;

        let saved = match event_kind {
            EntityEventKind::Create => uow.insert_pet(&pet).await?,
            _ => uow.update_pet(&pet).await?,
        };

        let event = NewEntityEvent::for_save(
            Self::ENTITY_TYPE,
            saved.pet_id,
            &saved,
            event_kind,
            actor_id,
        )?;
        let event = uow.append_event(event).await?;

        uow.commit().await?;

        tracing::debug!(
            pet_id = saved.pet_id,
            actor_id,
            event_id = event.entity_event_id,
            kind = %event_kind,
            "Saved pet"
        );

        Ok(saved)
    }

    async fn delete_by_id(&self, pet_id: i32, actor_id: i32) -> Result<()> {
        let mut uow = self.store.begin().await?;

        uow.delete_pet(pet_id).await?;
        let event = uow
            .append_event(NewEntityEvent::for_delete(
                Self::ENTITY_TYPE,
                pet_id,
                actor_id,
            ))
            .await?;

        uow.commit().await?;

        tracing::debug!(
            pet_id,
            actor_id,
            event_id = event.entity_event_id,
            "Deleted pet"
        );

        Ok(())
    }
}
