//! Round trip against a real PostgreSQL share store.
//!
//! Runs only when `LINKGATE_TEST_DATABASE_URL` points at a scratch database.

use std::sync::Arc;

use chrono::{Duration, Utc};
use futures::TryStreamExt;

use linkgate_core::config::{DatabaseConfig, PublicShareConfig};
use linkgate_core::error::ErrorKind;
use linkgate_database::migration::run_migrations;
use linkgate_database::store::{ListPredicate, ShareStore, Visibility};
use linkgate_database::{DatabasePool, ShareStoreManager};
use linkgate_entity::share::{Grant, ShareAuthentication, SharePermissions, ShareReference};
use linkgate_service::{ShareManager, StaticResourceResolver};

use crate::helpers::{ctx, home_file};

#[tokio::test]
async fn test_postgres_round_trip() {
    let Ok(url) = std::env::var("LINKGATE_TEST_DATABASE_URL") else {
        eprintln!("LINKGATE_TEST_DATABASE_URL not set, skipping");
        return;
    };

    let pool = DatabasePool::connect(&DatabaseConfig {
        url,
        ..Default::default()
    })
    .await
    .expect("Failed to connect to test database");
    run_migrations(pool.pool()).await.expect("Failed to run migrations");
    sqlx::query("DELETE FROM oc_share WHERE share_type = 3")
        .execute(pool.pool())
        .await
        .expect("Failed to clean oc_share");

    let config = PublicShareConfig {
        driver: "sql".to_string(),
        password_hash_cost: 4,
        enable_expired_shares_cleanup: true,
        list_batch_size: 2,
        ..Default::default()
    };
    let store = Arc::new(ShareStoreManager::new(&config, Some(&pool)).unwrap());
    let shares = ShareManager::from_config(
        &config,
        store.clone(),
        Arc::new(StaticResourceResolver::new()),
    )
    .unwrap();
    let einstein = ctx("einstein", &[]);
    let grant = Grant::new(SharePermissions::viewer());

    // Listing pages through more rows than one batch.
    let mut created = Vec::new();
    for i in 0..5 {
        let share = shares
            .create(&einstein, &home_file(&i.to_string(), "einstein"), &grant, "", false)
            .await
            .unwrap();
        created.push(share.id);
    }
    let listed: Vec<_> = shares
        .list(&einstein, &[], false)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(listed, created);

    let raw: Vec<_> = store
        .find_many(ListPredicate::new(Visibility::Unrestricted))
        .try_collect()
        .await
        .unwrap();
    assert_eq!(raw.len(), 5);

    // Password protection survives the round trip.
    let protected = shares
        .create(
            &einstein,
            &home_file("10", "einstein"),
            &grant.clone().with_password("p@ss"),
            "",
            false,
        )
        .await
        .unwrap();
    shares
        .authenticate_by_token(
            &protected.token,
            &ShareAuthentication::Password("p@ss".into()),
            false,
        )
        .await
        .unwrap();

    // Expired shares are orphaned on first sight.
    let expired = shares
        .create(
            &einstein,
            &home_file("11", "einstein"),
            &grant.clone().with_expiration(Utc::now() - Duration::seconds(1)),
            "",
            false,
        )
        .await
        .unwrap();
    let err = shares
        .get(&einstein, &ShareReference::token(expired.token.clone()), false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let orphan: Option<bool> = sqlx::query_scalar("SELECT orphan FROM oc_share WHERE id = $1")
        .bind(expired.id.into_inner())
        .fetch_one(pool.pool())
        .await
        .unwrap();
    assert_eq!(orphan, Some(true));

    // Revoke is scoped to owner or creator.
    let reference = ShareReference::id(created[0]);
    assert_eq!(
        shares
            .revoke(&ctx("richard", &[]), &reference)
            .await
            .unwrap_err()
            .kind,
        ErrorKind::NotFound
    );
    shares.revoke(&einstein, &reference).await.unwrap();

    pool.close().await;
}
