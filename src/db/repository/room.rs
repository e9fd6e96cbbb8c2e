//! Room Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Room, RoomCreate, RoomStatus, RoomUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "room";

#[derive(Clone)]
pub struct RoomRepository {
    base: BaseRepository,
}

impl RoomRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active rooms, optionally filtered by status and floor
    pub async fn find_all(
        &self,
        status: Option<RoomStatus>,
        floor: Option<i32>,
    ) -> RepoResult<Vec<Room>> {
        let mut sql = String::from("SELECT * FROM room WHERE is_active = true");
        if status.is_some() {
            sql.push_str(" AND status = $status");
        }
        if floor.is_some() {
            sql.push_str(" AND floor = $floor");
        }
        sql.push_str(" ORDER BY room_number");

        let mut query = self.base.db().query(sql);
        if let Some(status) = status {
            query = query.bind(("status", status));
        }
        if let Some(floor) = floor {
            query = query.bind(("floor", floor));
        }

        let rooms: Vec<Room> = query.await?.take(0)?;
        Ok(rooms)
    }

    /// Find room by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Room>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let room: Option<Room> = self.base.db().select(thing).await?;
        Ok(room)
    }

    /// Find room by its unique room number
    pub async fn find_by_number(&self, room_number: &str) -> RepoResult<Option<Room>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM room WHERE room_number = $room_number LIMIT 1")
            .bind(("room_number", room_number.to_string()))
            .await?;
        let rooms: Vec<Room> = result.take(0)?;
        Ok(rooms.into_iter().next())
    }

    /// Create a new room
    pub async fn create(&self, data: RoomCreate) -> RepoResult<Room> {
        // Check duplicate room number
        if self.find_by_number(&data.room_number).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Room '{}' already exists",
                data.room_number
            )));
        }

        let room = Room {
            id: None,
            room_number: data.room_number,
            room_type: data.room_type,
            floor: data.floor.unwrap_or(0),
            status: RoomStatus::Available,
            is_active: true,
        };

        let created: Option<Room> = self.base.db().create(TABLE).content(room).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create room".to_string()))
    }

    /// Update a room
    pub async fn update(&self, id: &str, data: RoomUpdate) -> RepoResult<Room> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Room {} not found", id)))?;

        // Check duplicate room number if changing it
        if let Some(ref number) = data.room_number
            && let Some(found) = self.find_by_number(number).await?
            && found.id != existing.id
        {
            return Err(RepoError::Duplicate(format!(
                "Room '{}' already exists",
                number
            )));
        }

        // 手动构建 UPDATE 语句，避免 room_type 被序列化为字符串
        let room_number = data.room_number.unwrap_or(existing.room_number);
        let room_type = data.room_type.unwrap_or(existing.room_type);
        let floor = data.floor.unwrap_or(existing.floor);
        let is_active = data.is_active.unwrap_or(existing.is_active);

        self.base
            .db()
            .query("UPDATE $thing SET room_number = $room_number, room_type = $room_type, floor = $floor, is_active = $is_active")
            .bind(("thing", thing.clone()))
            .bind(("room_number", room_number))
            .bind(("room_type", room_type))
            .bind(("floor", floor))
            .bind(("is_active", is_active))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Room {} not found", id)))
    }

    /// Set room status directly
    pub async fn set_status(&self, id: &RecordId, status: RoomStatus) -> RepoResult<Room> {
        self.base
            .db()
            .query("UPDATE $thing SET status = $status")
            .bind(("thing", id.clone()))
            .bind(("status", status))
            .await?;

        let room: Option<Room> = self.base.db().select(id.clone()).await?;
        room.ok_or_else(|| RepoError::NotFound(format!("Room {} not found", id)))
    }

    /// Soft delete a room
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
