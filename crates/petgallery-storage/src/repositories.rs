// Repository layer for database operations
//
// Reads run against the pool. Writes take a connection so callers can run
// them inside a transaction together with the matching audit event.

use anyhow::Result;
use petgallery_core::NewEntityEvent;
use sqlx::{PgConnection, PgPool};

use crate::models::*;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Pets
    // ============================================

    pub async fn list_pets(&self) -> Result<Vec<PetRow>> {
        let rows = sqlx::query_as::<_, PetRow>(
            r#"
            SELECT pet_id, name, image_url
            FROM pets
            ORDER BY pet_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get_pet(&self, pet_id: i32) -> Result<Option<PetRow>> {
        let row = sqlx::query_as::<_, PetRow>(
            r#"
            SELECT pet_id, name, image_url
            FROM pets
            WHERE pet_id = $1
            "#,
        )
        .bind(pet_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Entity events (append-only audit log)
    // ============================================

    pub async fn list_entity_events(
        &self,
        entity_type: &str,
        entity_id: i32,
    ) -> Result<Vec<EntityEventRow>> {
        let rows = sqlx::query_as::<_, EntityEventRow>(
            r#"
            SELECT entity_event_id, entity_id, entity_type, entity_body, event_kind, actor_id, created_at
            FROM entity_events
            WHERE entity_type = $1 AND entity_id = $2
            ORDER BY entity_event_id ASC
            "#,
        )
        .bind(entity_type)
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// ============================================
// Writes (run on a transaction's connection)
// ============================================

pub async fn insert_pet(conn: &mut PgConnection, name: &str, image_url: &str) -> Result<PetRow> {
    let row = sqlx::query_as::<_, PetRow>(
        r#"
        INSERT INTO pets (name, image_url)
        VALUES ($1, $2)
        RETURNING pet_id, name, image_url
        "#,
    )
    .bind(name)
    .bind(image_url)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row)
}

/// Replace all fields of a pet. Returns None if the row does not exist.
pub async fn update_pet(
    conn: &mut PgConnection,
    pet_id: i32,
    name: &str,
    image_url: &str,
) -> Result<Option<PetRow>> {
    let row = sqlx::query_as::<_, PetRow>(
        r#"
        UPDATE pets
        SET name = $2, image_url = $3
        WHERE pet_id = $1
        RETURNING pet_id, name, image_url
        "#,
    )
    .bind(pet_id)
    .bind(name)
    .bind(image_url)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

/// Returns false if the row did not exist
pub async fn delete_pet(conn: &mut PgConnection, pet_id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM pets WHERE pet_id = $1")
        .bind(pet_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn insert_entity_event(
    conn: &mut PgConnection,
    event: &NewEntityEvent,
) -> Result<EntityEventRow> {
    let row = sqlx::query_as::<_, EntityEventRow>(
        r#"
        INSERT INTO entity_events (entity_id, entity_type, entity_body, event_kind, actor_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING entity_event_id, entity_id, entity_type, entity_body, event_kind, actor_id, created_at
        "#,
    )
    .bind(event.entity_id)
    .bind(event.entity_type.as_str())
    .bind(&event.entity_body)
    .bind(event.event_kind.as_str())
    .bind(event.actor_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row)
}
