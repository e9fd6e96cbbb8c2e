//! Guest Repository
//!
//! 查重策略: (first_name, last_name, id_number) 先查后插，
//! 无唯一约束，并发下可能产生重复档案（可接受）。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Guest, GuestUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "guest";

#[derive(Clone)]
pub struct GuestRepository {
    base: BaseRepository,
}

impl GuestRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find guests, optionally filtered by a case-insensitive name/id search
    pub async fn find_all(
        &self,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Guest>> {
        let mut sql = String::from("SELECT * FROM guest");
        if search.is_some() {
            sql.push_str(
                " WHERE string::contains(string::lowercase(first_name), $q) \
                 OR string::contains(string::lowercase(last_name), $q) \
                 OR string::contains(string::lowercase(id_number), $q)",
            );
        }
        sql.push_str(" ORDER BY created_at DESC LIMIT $limit START $offset");

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("limit", limit))
            .bind(("offset", offset));
        if let Some(q) = search {
            query = query.bind(("q", q.to_lowercase()));
        }

        let guests: Vec<Guest> = query.await?.take(0)?;
        Ok(guests)
    }

    /// Find guest by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Guest>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let guest: Option<Guest> = self.base.db().select(thing).await?;
        Ok(guest)
    }

    /// Look up a guest by the dedup identity key
    pub async fn find_by_identity(
        &self,
        first_name: &str,
        last_name: &str,
        id_number: &str,
    ) -> RepoResult<Option<Guest>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM guest WHERE first_name = $first_name \
                 AND last_name = $last_name AND id_number = $id_number LIMIT 1",
            )
            .bind(("first_name", first_name.to_string()))
            .bind(("last_name", last_name.to_string()))
            .bind(("id_number", id_number.to_string()))
            .await?;
        let guests: Vec<Guest> = result.take(0)?;
        Ok(guests.into_iter().next())
    }

    /// Insert a new guest record
    pub async fn create(&self, guest: Guest) -> RepoResult<Guest> {
        let created: Option<Guest> = self.base.db().create(TABLE).content(guest).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create guest".to_string()))
    }

    /// Append a line to the guest's incident log
    pub async fn append_note(&self, id: &RecordId, note: &str) -> RepoResult<Guest> {
        let existing: Option<Guest> = self.base.db().select(id.clone()).await?;
        let existing =
            existing.ok_or_else(|| RepoError::NotFound(format!("Guest {} not found", id)))?;

        let notes = match existing.notes {
            Some(prior) => format!("{}\n{}", prior, note),
            None => note.to_string(),
        };

        self.base
            .db()
            .query("UPDATE $thing SET notes = $notes")
            .bind(("thing", id.clone()))
            .bind(("notes", notes))
            .await?;

        let guest: Option<Guest> = self.base.db().select(id.clone()).await?;
        guest.ok_or_else(|| RepoError::NotFound(format!("Guest {} not found", id)))
    }

    /// Update contact fields and optionally append a note
    pub async fn update(&self, id: &str, data: GuestUpdate) -> RepoResult<Guest> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Guest {} not found", id)))?;

        let phone = data.phone.unwrap_or(existing.phone);
        let notes = match (existing.notes, data.note) {
            (Some(prior), Some(note)) => Some(format!("{}\n{}", prior, note)),
            (None, Some(note)) => Some(note),
            (prior, None) => prior,
        };

        self.base
            .db()
            .query("UPDATE $thing SET phone = $phone, notes = $notes")
            .bind(("thing", thing.clone()))
            .bind(("phone", phone))
            .bind(("notes", notes))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Guest {} not found", id)))
    }
}
