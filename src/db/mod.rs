//! Database Module
//!
//! Embedded SurrealDB storage: connection bootstrap and index definitions.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "frontdesk";
const DATABASE: &str = "frontdesk";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk database (RocksDB engine) and apply index definitions
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::prepare(db).await
    }

    /// Open an in-memory database (tests and ephemeral runs)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::prepare(db).await
    }

    async fn prepare(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_indexes(&db).await?;
        tracing::info!("Database connection established (SurrealDB embedded)");

        Ok(Self { db })
    }
}

/// Index definitions, idempotent on restart
///
/// The guest identity index is deliberately NOT unique: dedup is a
/// lookup-before-insert heuristic, duplicate rows are tolerated.
async fn define_indexes(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        "
        DEFINE INDEX IF NOT EXISTS idx_room_number ON TABLE room COLUMNS room_number UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_room_type_name ON TABLE room_type COLUMNS name UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_booking_room ON TABLE booking COLUMNS room, booking_status;
        DEFINE INDEX IF NOT EXISTS idx_guest_identity ON TABLE guest COLUMNS first_name, last_name, id_number;
        ",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define indexes: {e}")))?;
    Ok(())
}
