// Persistence for the device gate
// Trait seam so the policy can run against Postgres or an in-memory double

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::{AsyncConnection, RunQueryDsl};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::db::{DieselConnection, DieselPool};
use crate::models::{NewDeviceAccessLogEntry, NewUserDevice, UserDevice};
use crate::schema::{device_access_log, profiles, user_devices};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Database query failed: {0}")]
    Query(String),
}

impl From<diesel::result::Error> for StoreError {
    fn from(error: diesel::result::Error) -> Self {
        StoreError::Query(error.to_string())
    }
}

/// Result of an attempt to register a user's first device
#[derive(Debug, Clone, PartialEq)]
pub enum FirstDeviceOutcome {
    Registered(UserDevice),
    /// Another request registered a device for this user first
    Conflict,
}

#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// `None` when the profile is missing or has no quota set
    async fn max_devices_allowed(&self, user_id: Uuid) -> Result<Option<i32>, StoreError>;

    async fn find_device(
        &self,
        user_id: Uuid,
        fingerprint: &str,
    ) -> Result<Option<UserDevice>, StoreError>;

    /// Bump `login_count` and `last_seen_at` and append the success row in
    /// one transaction
    async fn record_login(
        &self,
        device_id: Uuid,
        entry: NewDeviceAccessLogEntry,
    ) -> Result<UserDevice, StoreError>;

    async fn count_active_devices(&self, user_id: Uuid) -> Result<i64, StoreError>;

    /// Insert `device` only while the user has no active device.
    ///
    /// Check and insert are atomic with respect to other registrations for
    /// the same user. On success `entry` is appended in the same transaction
    /// with its `device_id` set to the new row.
    async fn register_first_device(
        &self,
        device: NewUserDevice,
        entry: NewDeviceAccessLogEntry,
    ) -> Result<FirstDeviceOutcome, StoreError>;

    /// Standalone append, used for denied attempts
    async fn append_access_log(&self, entry: NewDeviceAccessLogEntry) -> Result<(), StoreError>;
}

pub struct PgDeviceStore {
    pool: DieselPool,
}

impl PgDeviceStore {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<DieselConnection<'_>, StoreError> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))
    }
}

#[async_trait]
impl DeviceStore for PgDeviceStore {
    async fn max_devices_allowed(&self, user_id: Uuid) -> Result<Option<i32>, StoreError> {
        let mut conn = self.conn().await?;

        let quota = profiles::table
            .find(user_id)
            .select(profiles::max_devices_allowed)
            .first::<Option<i32>>(&mut conn)
            .await
            .optional()?;

        Ok(quota.flatten())
    }

    async fn find_device(
        &self,
        user_id: Uuid,
        fingerprint: &str,
    ) -> Result<Option<UserDevice>, StoreError> {
        let mut conn = self.conn().await?;

        let device = user_devices::table
            .filter(user_devices::user_id.eq(user_id))
            .filter(user_devices::device_fingerprint.eq(fingerprint))
            .select(UserDevice::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(device)
    }

    async fn record_login(
        &self,
        device_id: Uuid,
        entry: NewDeviceAccessLogEntry,
    ) -> Result<UserDevice, StoreError> {
        let mut conn = self.conn().await?;
        let now = Utc::now();

        let device = conn
            .transaction::<_, diesel::result::Error, _>(|tx| {
                Box::pin(async move {
                    let device = diesel::update(user_devices::table.find(device_id))
                        .set((
                            user_devices::login_count.eq(user_devices::login_count + 1),
                            user_devices::last_seen_at.eq(now),
                            user_devices::updated_at.eq(now),
                        ))
                        .returning(UserDevice::as_returning())
                        .get_result(tx)
                        .await?;

                    diesel::insert_into(device_access_log::table)
                        .values(&entry)
                        .execute(tx)
                        .await?;

                    Ok(device)
                })
            })
            .await?;

        Ok(device)
    }

    async fn count_active_devices(&self, user_id: Uuid) -> Result<i64, StoreError> {
        let mut conn = self.conn().await?;

        let count = user_devices::table
            .filter(user_devices::user_id.eq(user_id))
            .filter(user_devices::is_active.eq(true))
            .count()
            .get_result::<i64>(&mut conn)
            .await?;

        Ok(count)
    }

    async fn register_first_device(
        &self,
        device: NewUserDevice,
        entry: NewDeviceAccessLogEntry,
    ) -> Result<FirstDeviceOutcome, StoreError> {
        let mut conn = self.conn().await?;

        let outcome = conn
            .transaction::<_, diesel::result::Error, _>(|tx| {
                Box::pin(async move {
                    // Serializes first-device registration per user until commit
                    diesel::sql_query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
                        .bind::<Text, _>(device.user_id.to_string())
                        .execute(tx)
                        .await?;

                    let active = user_devices::table
                        .filter(user_devices::user_id.eq(device.user_id))
                        .filter(user_devices::is_active.eq(true))
                        .count()
                        .get_result::<i64>(tx)
                        .await?;

                    if active > 0 {
                        debug!(
                            "User {} gained an active device concurrently ({} active)",
                            device.user_id, active
                        );
                        return Ok(FirstDeviceOutcome::Conflict);
                    }

                    let inserted = diesel::insert_into(user_devices::table)
                        .values(&device)
                        .on_conflict((user_devices::user_id, user_devices::device_fingerprint))
                        .do_nothing()
                        .returning(UserDevice::as_returning())
                        .get_result(tx)
                        .await
                        .optional()?;

                    let Some(row) = inserted else {
                        return Ok(FirstDeviceOutcome::Conflict);
                    };

                    let entry = NewDeviceAccessLogEntry {
                        device_id: Some(row.id),
                        ..entry
                    };
                    diesel::insert_into(device_access_log::table)
                        .values(&entry)
                        .execute(tx)
                        .await?;

                    Ok(FirstDeviceOutcome::Registered(row))
                })
            })
            .await?;

        Ok(outcome)
    }

    async fn append_access_log(&self, entry: NewDeviceAccessLogEntry) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;

        diesel::insert_into(device_access_log::table)
            .values(&entry)
            .execute(&mut conn)
            .await?;

        Ok(())
    }
}
