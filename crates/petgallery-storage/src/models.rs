// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, Utc};
use petgallery_core::{EntityEvent, Pet, StoreError};
use sqlx::FromRow;

// ============================================
// Pet models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct PetRow {
    pub pet_id: i32,
    pub name: String,
    pub image_url: String,
}

impl From<PetRow> for Pet {
    fn from(row: PetRow) -> Self {
        Pet {
            pet_id: row.pet_id,
            name: row.name,
            image_url: row.image_url,
        }
    }
}

// ============================================
// Entity event models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EntityEventRow {
    pub entity_event_id: i32,
    pub entity_id: i32,
    pub entity_type: String,
    pub entity_body: Option<String>,
    pub event_kind: String,
    pub actor_id: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<EntityEventRow> for EntityEvent {
    type Error = StoreError;

    fn try_from(row: EntityEventRow) -> Result<Self, Self::Error> {
        Ok(EntityEvent {
            entity_event_id: row.entity_event_id,
            entity_id: row.entity_id,
            entity_type: row.entity_type.parse()?,
            entity_body: row.entity_body,
            event_kind: row.event_kind.parse()?,
            actor_id: row.actor_id,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgallery_core::{EntityEventKind, EntityType};

    fn event_row(kind: &str) -> EntityEventRow {
        EntityEventRow {
            entity_event_id: 1,
            entity_id: 4,
            entity_type: "Pet".to_string(),
            entity_body: None,
            event_kind: kind.to_string(),
            actor_id: 2,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_event_row_conversion() {
        let event = EntityEvent::try_from(event_row("DELETE")).unwrap();

        assert_eq!(event.entity_type, EntityType::Pet);
        assert_eq!(event.event_kind, EntityEventKind::Delete);
        assert_eq!(event.actor_id, 2);
    }

    #[test]
    fn test_event_row_rejects_unknown_kind() {
        assert!(EntityEvent::try_from(event_row("SAVE")).is_err());
    }
}
