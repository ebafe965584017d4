//! `SQLite` implementation of [`EnergyUsageLog`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use homesim_app::ports::EnergyUsageLog;
use homesim_domain::device::DeviceType;
use homesim_domain::energy::{self, DeviceTypeEnergy, EnergySummary, EnergyUsage};
use homesim_domain::error::HomeSimError;
use homesim_domain::id::{DeviceId, EnergyUsageId, RoomId};
use homesim_domain::time::Timestamp;

use crate::error::StorageError;
use crate::gateway::{self, SqliteGateway};

/// Wrapper for converting database rows into domain [`EnergyUsage`].
struct Wrapper(EnergyUsage);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let timestamp: String = row.try_get("timestamp")?;

        Ok(Self(EnergyUsage {
            device_id: DeviceId::new(row.try_get("device_id")?),
            room_id: RoomId::new(row.try_get("room_id")?),
            energy_consumed: row.try_get("energy_consumed")?,
            timestamp: gateway::parse_timestamp(&timestamp)?,
        }))
    }
}

fn summary_from_row(row: &SqliteRow) -> Result<EnergySummary, sqlx::Error> {
    let readings: i64 = row.try_get("readings")?;
    let readings = u64::try_from(readings).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

    Ok(EnergySummary {
        readings,
        total: row.try_get("total")?,
        average: row.try_get("average")?,
        peak: row.try_get("peak")?,
    })
}

/// Wrapper for converting an aggregate row into [`EnergySummary`].
struct SummaryWrapper(EnergySummary);

impl<'r> FromRow<'r, SqliteRow> for SummaryWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        summary_from_row(row).map(Self)
    }
}

/// Wrapper for converting a grouped aggregate row into [`DeviceTypeEnergy`].
struct TypeSummaryWrapper(DeviceTypeEnergy);

impl<'r> FromRow<'r, SqliteRow> for TypeSummaryWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let device_type: String = row.try_get("device_type")?;
        let device_type =
            DeviceType::from_str(&device_type).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(DeviceTypeEnergy {
            device_type,
            summary: summary_from_row(row)?,
        }))
    }
}

const INSERT_NOW: &str =
    "INSERT INTO energy_usage (device_id, room_id, energy_consumed) VALUES (?, ?, ?)";
const INSERT_AT: &str = "INSERT INTO energy_usage (device_id, room_id, energy_consumed, timestamp) VALUES (?, ?, ?, ?)";
const SELECT_BY_ROOM: &str = "SELECT device_id, room_id, energy_consumed, timestamp FROM energy_usage WHERE room_id = ? ORDER BY timestamp, rowid";
const SUMMARY_ALL: &str = "SELECT COUNT(*) AS readings, COALESCE(SUM(energy_consumed), 0.0) AS total, COALESCE(AVG(energy_consumed), 0.0) AS average, COALESCE(MAX(energy_consumed), 0.0) AS peak FROM energy_usage";
const SUMMARY_BY_ROOM: &str = "SELECT COUNT(*) AS readings, COALESCE(SUM(energy_consumed), 0.0) AS total, COALESCE(AVG(energy_consumed), 0.0) AS average, COALESCE(MAX(energy_consumed), 0.0) AS peak FROM energy_usage WHERE room_id = ?";
const BY_TYPE_ALL: &str = "SELECT d.device_type AS device_type, COUNT(*) AS readings, SUM(e.energy_consumed) AS total, AVG(e.energy_consumed) AS average, MAX(e.energy_consumed) AS peak FROM energy_usage e JOIN devices d ON d.device_id = e.device_id GROUP BY d.device_type ORDER BY d.device_type";
const BY_TYPE_IN_ROOM: &str = "SELECT d.device_type AS device_type, COUNT(*) AS readings, SUM(e.energy_consumed) AS total, AVG(e.energy_consumed) AS average, MAX(e.energy_consumed) AS peak FROM energy_usage e JOIN devices d ON d.device_id = e.device_id WHERE e.room_id = ? GROUP BY d.device_type ORDER BY d.device_type";

impl EnergyUsageLog for SqliteGateway {
    fn append_energy(
        &self,
        device_id: DeviceId,
        room_id: RoomId,
        energy_consumed: f64,
        timestamp: Option<Timestamp>,
    ) -> impl Future<Output = Result<EnergyUsageId, HomeSimError>> + Send {
        let pool = self.pool.clone();
        async move {
            energy::validate_amount(energy_consumed)?;

            let done = match timestamp.map(gateway::format_timestamp) {
                Some(at) => {
                    gateway::write(
                        &pool,
                        sqlx::query(INSERT_AT)
                            .bind(device_id.get())
                            .bind(room_id.get())
                            .bind(energy_consumed)
                            .bind(&at),
                        &[&device_id, &room_id, &energy_consumed, &at],
                    )
                    .await?
                }
                None => {
                    gateway::write(
                        &pool,
                        sqlx::query(INSERT_NOW)
                            .bind(device_id.get())
                            .bind(room_id.get())
                            .bind(energy_consumed),
                        &[&device_id, &room_id, &energy_consumed],
                    )
                    .await?
                }
            };

            Ok(EnergyUsageId::new(done.last_insert_rowid()))
        }
    }

    fn energy_by_room(
        &self,
        room_id: RoomId,
    ) -> impl Future<Output = Result<Vec<EnergyUsage>, HomeSimError>> + Send {
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

    fn energy_summary(
        &self,
        room_id: Option<RoomId>,
    ) -> impl Future<Output = Result<EnergySummary, HomeSimError>> + Send {
        let pool = self.pool.clone();
        async move {
            let (query, row) = match room_id {
                Some(id) => (
                    SUMMARY_BY_ROOM,
                    sqlx::query_as::<_, SummaryWrapper>(SUMMARY_BY_ROOM)
                        .bind(id.get())
                        .fetch_one(&pool)
                        .await,
                ),
                None => (
                    SUMMARY_ALL,
                    sqlx::query_as::<_, SummaryWrapper>(SUMMARY_ALL)
                        .fetch_one(&pool)
                        .await,
                ),
            };

            let row = row.map_err(|err| {
                gateway::log_failure(query, &[&room_id], &err);
                StorageError::from(err)
            })?;
            Ok(row.0)
        }
    }

    fn energy_by_device_type(
        &self,
        room_id: Option<RoomId>,
    ) -> impl Future<Output = Result<Vec<DeviceTypeEnergy>, HomeSimError>> + Send {
        let pool = self.pool.clone();
        async move {
            let (query, rows) = match room_id {
                Some(id) => (
                    BY_TYPE_IN_ROOM,
                    sqlx::query_as::<_, TypeSummaryWrapper>(BY_TYPE_IN_ROOM)
                        .bind(id.get())
                        .fetch_all(&pool)
                        .await,
                ),
                None => (
                    BY_TYPE_ALL,
                    sqlx::query_as::<_, TypeSummaryWrapper>(BY_TYPE_ALL)
                        .fetch_all(&pool)
                        .await,
                ),
            };

            let rows = rows.map_err(|err| {
                gateway::log_failure(query, &[&room_id], &err);
                StorageError::from(err)
            })?;
            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }
}
