use std::sync::atomic::Ordering;

use anyhow::Result;
use keepsake_lib::{
    AddOutcome, CaptureFlow, CaptureOutcome, Permission, PickResult, PresetMedia, DIARY, EMERGENCY,
};

#[path = "util.rs"]
mod util;

use util::ScriptedMedia;

fn picked(uri: &str) -> PickResult {
    PickResult::Picked { uri: uri.into() }
}

#[tokio::test]
async fn chosen_image_lands_in_draft_and_saves() -> Result<()> {
    let (_store, sync) = util::flaky_synchronizer(DIARY).await;
    let flow = CaptureFlow::new(
        ScriptedMedia::new()
            .permission(Permission::Granted)
            .pick(picked("file://a.jpg")),
    );

    assert!(flow.begin(&sync).await);
    assert_eq!(
        flow.choose_image(&sync).await,
        CaptureOutcome::Selected("file://a.jpg".into())
    );
    sync.set_title("Hike").await;
    sync.set_description("Great trail").await;

    let outcome = sync.save().await?;
    let record = outcome.saved().expect("saved");
    assert_eq!(record.media_uri, "file://a.jpg");
    Ok(())
}

#[tokio::test]
async fn denied_access_does_not_open_form() -> Result<()> {
    let (_store, sync) = util::flaky_synchronizer(EMERGENCY).await;
    let flow = CaptureFlow::new(ScriptedMedia::new().permission(Permission::Denied));

    assert!(!flow.begin(&sync).await);
    assert!(sync.draft().await.is_empty());
    assert_eq!(flow.media().calls(), ["request_media_access"]);
    Ok(())
}

#[tokio::test]
async fn take_image_asks_again_and_stops_on_denial() -> Result<()> {
    let (_store, sync) = util::flaky_synchronizer(EMERGENCY).await;
    let flow = CaptureFlow::new(
        ScriptedMedia::new()
            .permission(Permission::Granted)
            .permission(Permission::Denied)
            .pick(picked("file://never.jpg")),
    );

    assert!(flow.begin(&sync).await);
    assert_eq!(flow.take_image(&sync).await, CaptureOutcome::Denied);
    assert_eq!(
        flow.media().calls(),
        ["request_media_access", "request_media_access"]
    );
    assert_eq!(sync.draft().await.media_uri, None);
    Ok(())
}

#[tokio::test]
async fn take_image_attaches_camera_result() -> Result<()> {
    let (_store, sync) = util::flaky_synchronizer(EMERGENCY).await;
    let flow = CaptureFlow::new(
        ScriptedMedia::new()
            .permission(Permission::Granted)
            .pick(picked("file://camera.jpg")),
    );

    let outcome = flow.take_image(&sync).await;
    assert!(outcome.is_selected());
    assert_eq!(flow.media().calls(), ["request_media_access", "capture_image"]);
    assert_eq!(
        sync.draft().await.media_uri.as_deref(),
        Some("file://camera.jpg")
    );
    Ok(())
}

#[tokio::test]
async fn cancelled_pick_composes_nothing() -> Result<()> {
    let (store, sync) = util::flaky_synchronizer(DIARY).await;
    let flow = CaptureFlow::new(PresetMedia::cancelling());

    assert!(flow.begin(&sync).await);
    assert_eq!(flow.choose_image(&sync).await, CaptureOutcome::Cancelled);
    sync.set_title("Hike").await;
    sync.set_description("Great trail").await;

    let outcome = sync.save().await?;
    assert!(matches!(outcome, AddOutcome::Incomplete { .. }));
    assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    assert!(sync.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn closing_the_form_discards_the_draft() -> Result<()> {
    let (store, sync) = util::flaky_synchronizer(DIARY).await;
    let flow = CaptureFlow::new(PresetMedia::new("file://a.jpg"));

    flow.choose_image(&sync).await;
    sync.set_title("Half done").await;
    sync.discard_draft().await;

    let outcome = sync.save().await?;
    assert!(matches!(outcome, AddOutcome::Incomplete { .. }));
    assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    Ok(())
}
