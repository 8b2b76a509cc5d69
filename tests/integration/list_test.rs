//! Integration tests for listing and project space visibility.

use chrono::{Duration, Utc};

use linkgate_entity::share::{Grant, ListFilter, SharePermissions};
use linkgate_entity::user::UserId;

use crate::helpers::{IDP, TestApp, ctx, home_file, project_folder};

const ADMINS: &str = "cernbox-project-cernbox-admins";

#[tokio::test]
async fn test_project_admin_sees_everyone_on_resource() {
    let app = TestApp::new();
    let folder = project_folder("77", "cernbox", "cboxsvc");
    app.resolver.insert(folder.clone());

    let marie = ctx("marie", &[ADMINS]);
    let richard = ctx("richard", &[]);
    let grant = Grant::new(SharePermissions::viewer());

    let by_richard = app.shares.create(&richard, &folder, &grant, "", false).await.unwrap();
    let by_marie = app.shares.create(&marie, &folder, &grant, "", false).await.unwrap();

    let filters = [ListFilter::ResourceId(folder.id.clone())];

    let mut seen: Vec<_> = app
        .shares
        .list(&marie, &filters, false)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    seen.sort();
    assert_eq!(seen, vec![by_richard.id, by_marie.id]);

    let seen: Vec<_> = app
        .shares
        .list(&richard, &filters, false)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(seen, vec![by_richard.id]);
}

#[tokio::test]
async fn test_admin_of_other_project_not_escalated() {
    let app = TestApp::new();
    let folder = project_folder("77", "cernbox", "cboxsvc");
    app.resolver.insert(folder.clone());
    let grant = Grant::new(SharePermissions::viewer());

    app.shares
        .create(&ctx("richard", &[]), &folder, &grant, "", false)
        .await
        .unwrap();

    let other_admin = ctx("marie", &["cernbox-project-atlas-admins"]);
    let seen = app
        .shares
        .list(&other_admin, &[ListFilter::ResourceId(folder.id.clone())], false)
        .await
        .unwrap();
    assert!(seen.is_empty());
}

#[tokio::test]
async fn test_internal_shares_not_listed() {
    let app = TestApp::new();
    let einstein = ctx("einstein", &[]);
    let grant = Grant::new(SharePermissions::viewer());
    app.shares
        .create(&einstein, &home_file("1", "einstein"), &grant, "", true)
        .await
        .unwrap();
    let public = app
        .shares
        .create(&einstein, &home_file("2", "einstein"), &grant, "", false)
        .await
        .unwrap();

    let listed = app.shares.list(&einstein, &[], false).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, public.id);
}

#[tokio::test]
async fn test_filters_or_within_and_across_kinds() {
    let app = TestApp::new();
    let einstein = ctx("einstein", &[]);
    let marie = ctx("marie", &[]);
    let grant = Grant::new(SharePermissions::viewer());

    let a = app
        .shares
        .create(&einstein, &home_file("1", "einstein"), &grant, "", false)
        .await
        .unwrap();
    let b = app
        .shares
        .create(&einstein, &home_file("2", "einstein"), &grant, "", false)
        .await
        .unwrap();
    // Created by marie on einstein's file, so einstein still sees it.
    let c = app
        .shares
        .create(&marie, &home_file("2", "einstein"), &grant, "", false)
        .await
        .unwrap();

    let filters = [
        ListFilter::ResourceId(a.resource_id.clone()),
        ListFilter::ResourceId(b.resource_id.clone()),
        ListFilter::Creator(UserId::new(IDP, "einstein")),
    ];
    let mut ids: Vec<_> = app
        .shares
        .list(&einstein, &filters, false)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    ids.sort();
    assert_eq!(ids, vec![a.id, b.id]);

    let by_marie = app
        .shares
        .list(&einstein, &[ListFilter::Creator(UserId::new(IDP, "marie"))], false)
        .await
        .unwrap();
    assert_eq!(by_marie.len(), 1);
    assert_eq!(by_marie[0].id, c.id);
}

#[tokio::test]
async fn test_malformed_rows_skipped() {
    let app = TestApp::new();
    let einstein = ctx("einstein", &[]);
    let good = app
        .shares
        .create(
            &einstein,
            &home_file("1", "einstein"),
            &Grant::new(SharePermissions::viewer()),
            "",
            false,
        )
        .await
        .unwrap();

    let mut broken = app.row(&good.token);
    broken.id = 1000;
    broken.token = "brokenrow000001".into();
    broken.item_type = "widget".into();
    app.memory.insert_raw(broken);

    let listed = app.shares.list(&einstein, &[], false).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, good.id);
}

#[tokio::test]
async fn test_list_signs_protected_shares_only() {
    let app = TestApp::new();
    let einstein = ctx("einstein", &[]);
    let open = app
        .shares
        .create(
            &einstein,
            &home_file("1", "einstein"),
            &Grant::new(SharePermissions::viewer()),
            "",
            false,
        )
        .await
        .unwrap();
    let locked = app
        .shares
        .create(
            &einstein,
            &home_file("2", "einstein"),
            &Grant::new(SharePermissions::viewer()).with_password("pw"),
            "",
            false,
        )
        .await
        .unwrap();

    let listed = app.shares.list(&einstein, &[], true).await.unwrap();
    for share in listed {
        if share.id == open.id {
            assert!(share.signature.is_none());
        } else {
            assert_eq!(share.id, locked.id);
            assert!(share.signature.is_some());
        }
    }
}

#[tokio::test]
async fn test_list_orphans_expired_rows() {
    let app = TestApp::new();
    let einstein = ctx("einstein", &[]);
    let expired = app
        .shares
        .create(
            &einstein,
            &home_file("1", "einstein"),
            &Grant::new(SharePermissions::viewer())
                .with_expiration(Utc::now() - Duration::seconds(1)),
            "",
            false,
        )
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

    let listed = app.shares.list(&einstein, &[], false).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, live.id);
    assert!(app.row(&expired.token).is_orphan());
    assert!(!app.row(&live.token).is_orphan());
}
