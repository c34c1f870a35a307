// Persistence for the login geofence: suspicious attempts and alert fan-out

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::{DieselConnection, DieselPool};
use crate::models::{NewNotification, NewSuspiciousLoginAttempt};
use crate::schema::{notifications, profiles, suspicious_login_attempts};
use crate::services::device_store::StoreError;

diesel::define_sql_function! {
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

#[async_trait]
pub trait LoginSecurityStore: Send + Sync {
    async fn find_user_id_by_email(&self, email: &str) -> Result<Option<Uuid>, StoreError>;

    async fn record_suspicious_attempt(
        &self,
        attempt: NewSuspiciousLoginAttempt,
    ) -> Result<(), StoreError>;

    /// Profiles whose role is one of `roles`
    async fn find_users_with_roles(&self, roles: &[String]) -> Result<Vec<Uuid>, StoreError>;

    async fn create_notifications(&self, alerts: Vec<NewNotification>)
        -> Result<usize, StoreError>;
}

pub struct PgLoginSecurityStore {
    pool: DieselPool,
}

impl PgLoginSecurityStore {
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
impl LoginSecurityStore for PgLoginSecurityStore {
    async fn find_user_id_by_email(&self, email: &str) -> Result<Option<Uuid>, StoreError> {
        let mut conn = self.conn().await?;

        let user_id = profiles::table
            .filter(lower(profiles::email).eq(email.trim().to_lowercase()))
            .select(profiles::id)
            .first::<Uuid>(&mut conn)
            .await
            .optional()?;

        Ok(user_id)
    }

    async fn record_suspicious_attempt(
        &self,
        attempt: NewSuspiciousLoginAttempt,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;

        diesel::insert_into(suspicious_login_attempts::table)
            .values(&attempt)
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    async fn find_users_with_roles(&self, roles: &[String]) -> Result<Vec<Uuid>, StoreError> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn().await?;

        let ids = profiles::table
            .filter(profiles::role.eq_any(roles))
            .select(profiles::id)
            .load::<Uuid>(&mut conn)
            .await?;

        Ok(ids)
    }

    async fn create_notifications(
        &self,
        alerts: Vec<NewNotification>,
    ) -> Result<usize, StoreError> {
        if alerts.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn().await?;

        let inserted = diesel::insert_into(notifications::table)
            .values(&alerts)
            .execute(&mut conn)
            .await?;

        Ok(inserted)
    }
}
