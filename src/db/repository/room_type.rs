//! Room Type Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{RoomType, RoomTypeCreate, RoomTypeUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "room_type";

#[derive(Clone)]
pub struct RoomTypeRepository {
    base: BaseRepository,
}

impl RoomTypeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active room types
    pub async fn find_all(&self) -> RepoResult<Vec<RoomType>> {
        let types: Vec<RoomType> = self
            .base
            .db()
            .query("SELECT * FROM room_type WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(types)
    }

    /// Find room type by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<RoomType>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let room_type: Option<RoomType> = self.base.db().select(thing).await?;
        Ok(room_type)
    }

    /// Find room type by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<RoomType>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM room_type WHERE name = $name LIMIT 1")
            .bind(("name", name.to_string()))
            .await?;
        let types: Vec<RoomType> = result.take(0)?;
        Ok(types.into_iter().next())
    }

    /// Create a new room type
    pub async fn create(&self, data: RoomTypeCreate) -> RepoResult<RoomType> {
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Room type '{}' already exists",
                data.name
            )));
        }

        let room_type = RoomType {
            id: None,
            name: data.name,
            base_capacity: data.base_capacity.unwrap_or(2),
            pricing: data.pricing,
            penalty: data.penalty.unwrap_or(0.0),
            is_active: true,
        };

        let created: Option<RoomType> = self.base.db().create(TABLE).content(room_type).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create room type".to_string()))
    }

    /// Update a room type
    pub async fn update(&self, id: &str, data: RoomTypeUpdate) -> RepoResult<RoomType> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Room type {} not found", id)))?;

        if let Some(ref name) = data.name
            && let Some(found) = self.find_by_name(name).await?
            && found.id != existing.id
        {
            return Err(RepoError::Duplicate(format!(
                "Room type '{}' already exists",
                name
            )));
        }

        let name = data.name.unwrap_or(existing.name);
        let base_capacity = data.base_capacity.unwrap_or(existing.base_capacity);
        let pricing = data.pricing.unwrap_or(existing.pricing);
        let penalty = data.penalty.unwrap_or(existing.penalty);
        let is_active = data.is_active.unwrap_or(existing.is_active);

        self.base
            .db()
            .query("UPDATE $thing SET name = $name, base_capacity = $base_capacity, pricing = $pricing, penalty = $penalty, is_active = $is_active")
            .bind(("thing", thing.clone()))
            .bind(("name", name))
            .bind(("base_capacity", base_capacity))
            .bind(("pricing", pricing))
            .bind(("penalty", penalty))
            .bind(("is_active", is_active))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Room type {} not found", id)))
    }

    /// Soft delete a room type
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.base
            .db()
            .query("UPDATE $thing SET is_active = false")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
