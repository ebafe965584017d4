//! `SQLite` implementation of [`DeviceRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use homesim_app::ports::DeviceRepository;
use homesim_domain::device::{Device, DeviceTemplate, DeviceType};
use homesim_domain::error::HomeSimError;
use homesim_domain::id::{DeviceId, RoomId};

use crate::error::StorageError;
use crate::gateway::{self, SqliteGateway};

/// Wrapper for converting database rows into domain [`Device`].
struct Wrapper(Device);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let device_type: String = row.try_get("device_type")?;
        let device_type =
            DeviceType::from_str(&device_type).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Device {
            id: DeviceId::new(row.try_get("device_id")?),
            room_id: RoomId::new(row.try_get("room_id")?),
            device_type,
            name: row.try_get("device_name")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO devices (room_id, device_type, device_name) VALUES (?, ?, ?)";
const SELECT_BY_ROOM: &str = "SELECT device_id, room_id, device_type, device_name FROM devices WHERE room_id = ? ORDER BY device_id";

impl DeviceRepository for SqliteGateway {
    fn list_devices_in_room(
        &self,
        room_id: RoomId,
    ) -> impl Future<Output = Result<Vec<Device>, HomeSimError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_ROOM)
                .bind(room_id.get())
                .fetch_all(&pool)
                .await
                .map_err(|err| {
                    gateway::log_failure(SELECT_BY_ROOM, &[&room_id], &err);
                    StorageError::from(err)
                })?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn create_device(
        &self,
        room_id: RoomId,
        device: DeviceTemplate,
    ) -> impl Future<Output = Result<Device, HomeSimError>> + Send {
        let pool = self.pool.clone();
        async move {
            device.validate()?;

            let device_type = device.device_type.as_str();
            let done = gateway::write(
                &pool,
                sqlx::query(INSERT)
                    .bind(room_id.get())
                    .bind(device_type)
                    .bind(&device.name),
                &[&room_id, &device_type, &device.name],
            )
            .await?;

            Ok(device.into_device(DeviceId::new(done.last_insert_rowid()), room_id))
        }
    }
}
