// PgDeviceStore against a live PostgreSQL
// Skipped unless DATABASE_URL points at a database the migrations can run on

mod common;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use common::fingerprint;
use device_access_core::{
    db::{create_diesel_pool, DieselDatabaseConfig, DieselPool},
    migrations::diesel::run_migrations,
    models::{AccessType, DeviceAccessLogEntry, NewDeviceAccessLogEntry, NewUserDevice},
    schema::{device_access_log, profiles, user_devices},
    services::{DeviceStore, FirstDeviceOutcome, PgDeviceStore},
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

/// Pool and store over `DATABASE_URL`, or `None` when no database is configured
async fn pg_store() -> Option<(Arc<PgDeviceStore>, DieselPool)> {
    dotenv::from_filename(".env.test").ok();
    let Ok(database_url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL store test");
        return None;
    };

    run_migrations(database_url.clone())
        .await
        .expect("Failed to run migrations");

    let pool = create_diesel_pool(DieselDatabaseConfig {
        url: database_url,
        max_connections: 10,
        min_connections: 1,
        connection_timeout: Duration::from_secs(5),
        idle_timeout: Duration::from_secs(600),
        max_lifetime: Duration::from_secs(1800),
        test_on_checkout: true,
    })
    .await
    .expect("Failed to create database pool");

    Some((Arc::new(PgDeviceStore::new(pool.clone())), pool))
}

async fn create_profile(pool: &DieselPool, quota: Option<i32>) -> Uuid {
    let id = Uuid::new_v4();
    let mut conn = pool.get().await.unwrap();

    diesel::insert_into(profiles::table)
        .values((
            profiles::id.eq(id),
            profiles::email.eq(format!("{}@police.test", id.simple())),
            profiles::max_devices_allowed.eq(quota),
        ))
        .execute(&mut conn)
        .await
        .unwrap();

    id
}

fn success_entry(user_id: Uuid, fp: &str, device_id: Option<Uuid>) -> NewDeviceAccessLogEntry {
    NewDeviceAccessLogEntry {
        user_id,
        device_id,
        device_fingerprint: fp.to_string(),
        access_type: AccessType::LoginSuccess.as_str().to_string(),
        was_allowed: true,
        reason: None,
        geolocation: None,
        ip_address: Some("81.22.16.4".to_string()),
        user_agent: None,
        created_at: Utc::now(),
    }
}

fn primary(user_id: Uuid, fp: &str) -> NewUserDevice {
    NewUserDevice::primary(
        user_id,
        fp.to_string(),
        Some("Firefox 121.0 on Linux Unknown (Desktop)".to_string()),
        serde_json::json!({}),
    )
}

async fn log_rows(pool: &DieselPool, user_id: Uuid) -> Vec<DeviceAccessLogEntry> {
    let mut conn = pool.get().await.unwrap();
    device_access_log::table
        .filter(device_access_log::user_id.eq(user_id))
        .select(DeviceAccessLogEntry::as_select())
        .load(&mut conn)
        .await
        .unwrap()
}

async fn device_count(pool: &DieselPool, user_id: Uuid) -> i64 {
    let mut conn = pool.get().await.unwrap();
    user_devices::table
        .filter(user_devices::user_id.eq(user_id))
        .count()
        .get_result(&mut conn)
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_registrations_keep_one_device() {
    let Some((store, pool)) = pg_store().await else {
        return;
    };
    let user_id = create_profile(&pool, None).await;

    let handles: Vec<_> = (1..=8u8)
        .map(|seed| {
            let store = store.clone();
            tokio::spawn(async move {
                let fp = fingerprint(seed);
                store
                    .register_first_device(primary(user_id, &fp), success_entry(user_id, &fp, None))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut registered = Vec::new();
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            FirstDeviceOutcome::Registered(device) => registered.push(device),
            FirstDeviceOutcome::Conflict => conflicts += 1,
        }
    }

    assert_eq!(registered.len(), 1);
    assert_eq!(conflicts, 7);
    assert_eq!(device_count(&pool, user_id).await, 1);

    let log = log_rows(&pool, user_id).await;
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].device_id, Some(registered[0].id));
    assert!(log[0].was_allowed);
}

#[tokio::test]
async fn test_duplicate_fingerprint_is_a_conflict() {
    let Some((store, pool)) = pg_store().await else {
        return;
    };
    let user_id = create_profile(&pool, None).await;
    let fp = fingerprint(3);

    let first = store
        .register_first_device(primary(user_id, &fp), success_entry(user_id, &fp, None))
        .await
        .unwrap();
    let FirstDeviceOutcome::Registered(device) = first else {
        panic!("first registration should succeed");
    };

    // Disabled devices do not count as active, so only the unique key stops this
    let mut conn = pool.get().await.unwrap();
    diesel::update(user_devices::table.find(device.id))
        .set(user_devices::is_active.eq(false))
        .execute(&mut conn)
        .await
        .unwrap();
    drop(conn);

    let second = store
        .register_first_device(primary(user_id, &fp), success_entry(user_id, &fp, None))
        .await
        .unwrap();

    assert_eq!(second, FirstDeviceOutcome::Conflict);
    assert_eq!(device_count(&pool, user_id).await, 1);
    assert_eq!(log_rows(&pool, user_id).await.len(), 1);
}

#[tokio::test]
async fn test_record_login_increments_count_and_logs() {
    let Some((store, pool)) = pg_store().await else {
        return;
    };
    let user_id = create_profile(&pool, Some(2)).await;
    let fp = fingerprint(5);

    let FirstDeviceOutcome::Registered(device) = store
        .register_first_device(primary(user_id, &fp), success_entry(user_id, &fp, None))
        .await
        .unwrap()
    else {
        panic!("first registration should succeed");
    };
    assert_eq!(device.login_count, 1);

    let after = store
        .record_login(device.id, success_entry(user_id, &fp, Some(device.id)))
        .await
        .unwrap();
    assert_eq!(after.login_count, 2);
    assert!(after.last_seen_at >= device.last_seen_at);

    let found = store.find_device(user_id, &fp).await.unwrap().unwrap();
    assert_eq!(found.login_count, 2);
    assert_eq!(store.count_active_devices(user_id).await.unwrap(), 1);
    assert_eq!(store.max_devices_allowed(user_id).await.unwrap(), Some(2));
    assert_eq!(log_rows(&pool, user_id).await.len(), 2);
}

#[tokio::test]
async fn test_record_login_rolls_back_without_device() {
    let Some((store, pool)) = pg_store().await else {
        return;
    };
    let user_id = create_profile(&pool, None).await;
    let fp = fingerprint(6);

    let result = store
        .record_login(Uuid::new_v4(), success_entry(user_id, &fp, None))
        .await;

    assert!(result.is_err());
    assert!(log_rows(&pool, user_id).await.is_empty());
    assert_eq!(store.max_devices_allowed(user_id).await.unwrap(), None);
}
