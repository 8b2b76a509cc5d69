//! Integration tests for the janitor running against the share manager.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;

use linkgate_entity::share::{Grant, SharePermissions};
use linkgate_service::Janitor;

use crate::helpers::{TestApp, ctx, home_file};

#[tokio::test(start_paused = true)]
async fn test_janitor_reclaims_in_background() {
    let app = TestApp::new();
    let einstein = ctx("einstein", &[]);
    let grant = Grant::new(SharePermissions::viewer())
        .with_expiration(Utc::now() - chrono::Duration::seconds(1));
    let expired = app
        .shares
        .create(&einstein, &home_file("1", "einstein"), &grant, "", false)
        .await
        .unwrap();
    let live = app
        .shares
        .create(
            &einstein,
            &home_file("2", "einstein"),
            &Grant::new(SharePermissions::viewer()),
            "",
            false,
        )
        .await
        .unwrap();

    let (tx, rx) = watch::channel(false);
    let handle = Janitor::start(app.shares.cleanup(), Duration::from_secs(3600), rx)
        .expect("cleanup enabled");

    tokio::time::sleep(Duration::from_secs(3601)).await;
    assert!(app.row(&expired.token).is_orphan());
    assert!(!app.row(&live.token).is_orphan());

    tx.send(true).unwrap();
    handle.await.unwrap();
}
