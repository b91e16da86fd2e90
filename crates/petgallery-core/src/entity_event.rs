// Entity event (audit log) types
//
// An EntityEvent records one mutation of an audited entity: who did it,
// what kind of mutation it was, and a snapshot of the entity afterwards.
// Events are append-only and never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StoreError};

/// Kind of mutation recorded by an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityEventKind {
    /// Entity had no id before the save
    Create,
    /// Entity already had an id before the save
    Update,
    Delete,
}

impl EntityEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityEventKind::Create => "CREATE",
            EntityEventKind::Update => "UPDATE",
            EntityEventKind::Delete => "DELETE",
        }
    }
}

impl fmt::Display for EntityEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityEventKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CREATE" => Ok(EntityEventKind::Create),
            "UPDATE" => Ok(EntityEventKind::Update),
            "DELETE" => Ok(EntityEventKind::Delete),
            other => Err(StoreError::serialization(format!(
                "unknown entity event kind: {other}"
            ))),
        }
    }
}

/// Tag naming the kind of entity an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Pet,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Pet => "Pet",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Pet" => Ok(EntityType::Pet),
            other => Err(StoreError::serialization(format!(
                "unknown entity type: {other}"
            ))),
        }
    }
}

/// A persisted audit event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityEvent {
    pub entity_event_id: i32,
    pub entity_id: i32,
    pub entity_type: EntityType,
    /// JSON snapshot of the entity after the mutation; None for deletes
    pub entity_body: Option<String>,
    pub event_kind: EntityEventKind,
    pub actor_id: i32,
    pub created_at: DateTime<Utc>,
}

/// An event about to be appended to the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntityEvent {
    pub entity_id: i32,
    pub entity_type: EntityType,
    pub entity_body: Option<String>,
    pub event_kind: EntityEventKind,
    pub actor_id: i32,
}

impl NewEntityEvent {
    /// Event for a create or update, carrying a snapshot of the saved entity
    pub fn for_save<E: Serialize>(
        entity_type: EntityType,
        entity_id: i32,
        entity: &E,
        event_kind: EntityEventKind,
        actor_id: i32,
    ) -> Result<Self> {
        let body = serde_json::to_string(entity)
            .map_err(|e| StoreError::serialization(e.to_string()))?;

        Ok(Self {
            entity_id,
            entity_type,
            entity_body: Some(body),
            event_kind,
            actor_id,
        })
    }

    /// Event for a delete; no snapshot is kept
    pub fn for_delete(entity_type: EntityType, entity_id: i32, actor_id: i32) -> Self {
        Self {
            entity_id,
            entity_type,
            entity_body: None,
            event_kind: EntityEventKind::Delete,
            actor_id,
        }
    }

    /// Materialize the event with its assigned id and timestamp
    pub fn into_event(self, entity_event_id: i32, created_at: DateTime<Utc>) -> EntityEvent {
        EntityEvent {
            entity_event_id,
            entity_id: self.entity_id,
            entity_type: self.entity_type,
            entity_body: self.entity_body,
            event_kind: self.event_kind,
            actor_id: self.actor_id,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::Pet;

    #[test]
    fn test_event_kind_round_trips_through_column_text() {
        for kind in [
            EntityEventKind::Create,
            EntityEventKind::Update,
            EntityEventKind::Delete,
        ] {
            assert_eq!(kind.as_str().parse::<EntityEventKind>().unwrap(), kind);
        }
        assert!("SAVE".parse::<EntityEventKind>().is_err());
    }

    #[test]
    fn test_entity_type_tag() {
        assert_eq!(EntityType::Pet.to_string(), "Pet");
        assert_eq!("Pet".parse::<EntityType>().unwrap(), EntityType::Pet);
        assert!("learn.petgallery.models.Pet".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_save_event_snapshots_entity() {
        let pet = Pet::new(4, "Atilla", "https://example.com/image-4");
        let event =
            NewEntityEvent::for_save(EntityType::Pet, 4, &pet, EntityEventKind::Create, 12)
                .unwrap();

        assert_eq!(event.entity_id, 4);
        assert_eq!(event.actor_id, 12);
        let body: Pet = serde_json::from_str(event.entity_body.as_deref().unwrap()).unwrap();
        assert_eq!(body, pet);
    }

    #[test]
    fn test_delete_event_has_no_body() {
        let event = NewEntityEvent::for_delete(EntityType::Pet, 9, 1);

        assert_eq!(event.event_kind, EntityEventKind::Delete);
        assert_eq!(event.entity_body, None);
    }
}
