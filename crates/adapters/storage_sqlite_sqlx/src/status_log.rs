//! `SQLite` implementation of [`DeviceStatusLog`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use homesim_app::ports::DeviceStatusLog;
use homesim_domain::error::HomeSimError;
use homesim_domain::id::DeviceId;
use homesim_domain::status::{DeviceStatus, StatusEvent};

use crate::error::StorageError;
use crate::gateway::{self, SqliteGateway};

fn decode_status(value: &str) -> Result<DeviceStatus, sqlx::Error> {
    DeviceStatus::from_str(value).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

/// Wrapper for converting database rows into domain [`StatusEvent`].
struct Wrapper(StatusEvent);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let timestamp: String = row.try_get("timestamp")?;

        Ok(Self(StatusEvent {
            device_id: DeviceId::new(row.try_get("device_id")?),
            status: decode_status(&status)?,
            timestamp: gateway::parse_timestamp(&timestamp)?,
        }))
    }
}

const INSERT: &str = "INSERT INTO device_status (device_id, status) VALUES (?, ?)";
// Several events can share a second; insertion order breaks the tie.
const SELECT_LATEST: &str = "SELECT status FROM device_status WHERE device_id = ? ORDER BY timestamp DESC, rowid DESC LIMIT 1";
const SELECT_HISTORY: &str = "SELECT device_id, status, timestamp FROM device_status WHERE device_id = ? ORDER BY timestamp DESC, rowid DESC LIMIT ?";

impl DeviceStatusLog for SqliteGateway {
    fn append_status(
        &self,
        device_id: DeviceId,
        status: DeviceStatus,
    ) -> impl Future<Output = Result<(), HomeSimError>> + Send {
        let pool = self.pool.clone();
        async move {
            let status = status.as_str();
            gateway::write(
                &pool,
                sqlx::query(INSERT).bind(device_id.get()).bind(status),
                &[&device_id, &status],
            )
            .await?;

            Ok(())
        }
    }

    fn latest_status(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Option<DeviceStatus>, HomeSimError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<(String,)> = sqlx::query_as(SELECT_LATEST)
                .bind(device_id.get())
                .fetch_optional(&pool)
                .await
                .map_err(|err| {
                    gateway::log_failure(SELECT_LATEST, &[&device_id], &err);
                    StorageError::from(err)
                })?;

            let status = row
                .map(|(value,)| decode_status(&value))
                .transpose()
                .map_err(StorageError::from)?;
            Ok(status)
        }
    }

    fn status_history(
        &self,
        device_id: DeviceId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<StatusEvent>, HomeSimError>> + Send {
        let pool = self.pool.clone();
        async move {
            let limit = i64::try_from(limit).unwrap_or(i64::MAX);
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_HISTORY)
                .bind(device_id.get())
                .bind(limit)
                .fetch_all(&pool)
                .await
                .map_err(|err| {
                    gateway::log_failure(SELECT_HISTORY, &[&device_id, &limit], &err);
                    StorageError::from(err)
                })?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }
}
