// Database-backed PetStore implementation
//
// Query failures surface as StoreError::Internal; transaction begin/commit
// failures as StoreError::Database.
//
// Each unit of work is one Postgres transaction. sqlx rolls a transaction
// back when it is dropped without commit, which is what makes a failed
// audit write undo the pet write that preceded it.

use async_trait::async_trait;
use petgallery_core::{
    EntityEvent, EntityType, NewEntityEvent, Pet, PetStore, PetUnitOfWork, Result, StoreError,
};
use sqlx::{Postgres, Transaction};

use crate::repositories::{self, Database};

// ============================================================================
// DbPetStore - Pets and entity events in Postgres
// ============================================================================

/// Database-backed pet store
#[derive(Clone)]
pub struct DbPetStore {
    db: Database,
}

impl DbPetStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PetStore for DbPetStore {
    async fn find_all(&self) -> Result<Vec<Pet>> {
        let rows = self.db.list_pets().await?;

        Ok(rows.into_iter().map(Pet::from).collect())
    }

    async fn find_by_id(&self, pet_id: i32) -> Result<Option<Pet>> {
        let row = self.db.get_pet(pet_id).await?;

        Ok(row.map(Pet::from))
    }

    async fn find_events(
        &self,
        entity_type: EntityType,
        entity_id: i32,
    ) -> Result<Vec<EntityEvent>> {
        let rows = self
            .db
            .list_entity_events(entity_type.as_str(), entity_id)
            .await?;

        rows.into_iter().map(EntityEvent::try_from).collect()
    }

    async fn begin(&self) -> Result<Box<dyn PetUnitOfWork>> {
        let tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(|e| StoreError::database(e.to_string()))?;

        Ok(Box::new(DbPetUnitOfWork { tx: Some(tx) }))
    }
}

// ============================================================================
// DbPetUnitOfWork - One transaction
// ============================================================================

struct DbPetUnitOfWork {
    tx: Option<Transaction<'static, Postgres>>,
}

impl DbPetUnitOfWork {
    fn tx(&mut self) -> Result<&mut Transaction<'static, Postgres>> {
        self.tx
            .as_mut()
            .ok_or_else(|| StoreError::database("transaction already committed"))
    }
}

#[async_trait]
impl PetUnitOfWork for DbPetUnitOfWork {
    async fn insert_pet(&mut self, pet: &Pet) -> Result<Pet> {
        let tx = self.tx()?;
        let row = repositories::insert_pet(&mut **tx, &pet.name, &pet.image_url).await?;

        Ok(row.into())
    }

    async fn update_pet(&mut self, pet: &Pet) -> Result<Pet> {
        let tx = self.tx()?;
        let row =
            repositories::update_pet(&mut **tx, pet.pet_id, &pet.name, &pet.image_url).await?;

        row.map(Pet::from)
            .ok_or(StoreError::not_found(pet.pet_id))
    }

    async fn delete_pet(&mut self, pet_id: i32) -> Result<()> {
        let tx = self.tx()?;
        let deleted = repositories::delete_pet(&mut **tx, pet_id).await?;

        if deleted {
            Ok(())
        } else {
            Err(StoreError::not_found(pet_id))
        }
    }

    async fn append_event(&mut self, event: NewEntityEvent) -> Result<EntityEvent> {
        let tx = self.tx()?;
        let row = repositories::insert_entity_event(&mut **tx, &event).await?;

        EntityEvent::try_from(row)
    }

    async fn commit(&mut self) -> Result<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| StoreError::database("transaction already committed"))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::database(e.to_string()))
    }
}

// ============================================================================
// Factory functions
// ============================================================================

/// Create a database-backed pet store
pub fn create_db_pet_store(db: Database) -> DbPetStore {
    DbPetStore::new(db)
}

// ============================================================================
// Tests
// ============================================================================
