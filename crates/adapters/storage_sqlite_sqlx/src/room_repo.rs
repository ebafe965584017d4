//! `SQLite` implementation of [`RoomRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use homesim_app::ports::RoomRepository;
use homesim_domain::error::HomeSimError;
use homesim_domain::id::RoomId;
use homesim_domain::room::{Room, RoomTemplate};

use crate::error::StorageError;
use crate::gateway::{self, SqliteGateway};

/// Wrapper for converting database rows into domain [`Room`].
struct Wrapper(Room);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Room {
            id: RoomId::new(row.try_get("room_id")?),
            number: row.try_get("room_number")?,
            description: row.try_get("description")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO rooms (room_number, description) VALUES (?, ?)";
const SELECT_ALL: &str = "SELECT room_id, room_number, description FROM rooms ORDER BY room_id";

impl RoomRepository for SqliteGateway {
    fn list_rooms(&self) -> impl Future<Output = Result<Vec<Room>, HomeSimError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(|err| {
                    gateway::log_failure(SELECT_ALL, &[], &err);
                    StorageError::from(err)
                })?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn create_room(
        &self,
        room: RoomTemplate,
    ) -> impl Future<Output = Result<Room, HomeSimError>> + Send {
        let pool = self.pool.clone();
        async move {
            room.validate()?;

            let done = gateway::write(
                &pool,
                sqlx::query(INSERT)
                    .bind(&room.number)
                    .bind(&room.description),
                &[&room.number, &room.description],
            )
            .await?;

            Ok(room.into_room(RoomId::new(done.last_insert_rowid())))
        }
    }
}
