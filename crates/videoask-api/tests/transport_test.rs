//! Integration tests for the transport mirroring routes.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test(start_paused = true)]
async fn test_transport_mirrors_first_node() {
    let (app, _driver) = common::build_test_app();

    let (status, json) = common::get_json(&app, "/api/v1/transport").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "https://cdn.example.com/intro.mp4");
    assert_eq!(json["playing"], true);
    assert_eq!(json["playbackRate"], 1.0);
    assert!(json["revision"].as_u64().unwrap() >= 3);
}

#[tokio::test(start_paused = true)]
async fn test_reported_time_drives_progress() {
    // Arrange
    let (app, _driver) = common::build_test_app();
    common::post_json(&app, "/api/v1/transport/duration", &json!({ "seconds": 10.0 })).await;

    // Act
    let (status, _) =
        common::post_json(&app, "/api/v1/transport/time", &json!({ "seconds": 5.0 })).await;
    tokio::time::sleep(Duration::from_millis(120)).await;
    let (_, session) = common::get_json(&app, "/api/v1/session").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let progress = session["state"]["progress"].as_f64().unwrap();
    assert!((0.5..0.5001).contains(&progress), "progress was {progress}");
    assert_eq!(session["state"]["duration"], 10.0);
}

#[tokio::test(start_paused = true)]
async fn test_seek_survives_position_reported_before_browser_applied_it() {
    // Arrange
    let (app, _driver) = common::build_test_app();
    common::post_json(&app, "/api/v1/transport/duration", &json!({ "seconds": 100.0 })).await;
    common::post_json(&app, "/api/v1/transport/time", &json!({ "seconds": 10.0 })).await;
    tokio::time::sleep(Duration::from_millis(60)).await;

    // Act
    common::post_json(&app, "/api/v1/session/seek", &json!({ "seconds": 60.0 })).await;
    tokio::time::sleep(Duration::from_millis(60)).await;
    common::post_json(&app, "/api/v1/transport/time", &json!({ "seconds": 10.1 })).await;
    tokio::time::sleep(Duration::from_millis(120)).await;
    let (_, after_stale) = common::get_json(&app, "/api/v1/session").await;
    let (_, transport) = common::get_json(&app, "/api/v1/transport").await;
    common::post_json(&app, "/api/v1/transport/time", &json!({ "seconds": 60.05 })).await;
    tokio::time::sleep(Duration::from_millis(120)).await;
    let (_, arrived) = common::get_json(&app, "/api/v1/session").await;

    // Assert
    let held = after_stale["state"]["progress"].as_f64().unwrap();
    assert!(held >= 0.6, "progress fell back to {held}");
    assert_eq!(after_stale["state"]["seekTarget"], 60.0);
    assert_eq!(transport["seekTo"], 60.0);
    assert_eq!(transport["currentTime"], 10.0);
    assert!(arrived["state"]["progress"].as_f64().unwrap() >= 0.6);
    assert!(arrived["state"]["seekTarget"].is_null());
}

#[tokio::test(start_paused = true)]
async fn test_negative_time_is_rejected() {
    let (app, _driver) = common::build_test_app();

    let (status, json) =
        common::post_json(&app, "/api/v1/transport/time", &json!({ "seconds": -1.0 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test(start_paused = true)]
async fn test_overlay_holds_video_until_it_ends() {
    // Arrange
    let (app, _driver) = common::build_test_app();
    common::post_json(&app, "/api/v1/session/overlay", &json!({ "url": "hint.mp3" })).await;

    // Act
    let (_, during) = common::post_empty(&app, "/api/v1/transport/overlay-play").await;
    let (_, transport_during) = common::get_json(&app, "/api/v1/transport").await;
    let (_, after) = common::post_empty(&app, "/api/v1/transport/overlay-ended").await;
    let (_, transport_after) = common::get_json(&app, "/api/v1/transport").await;

    // Assert
    assert_eq!(during["snapshot"]["state"]["paused"], true);
    assert_eq!(during["snapshot"]["state"]["audioOverlayUrl"], "hint.mp3");
    assert_eq!(transport_during["playing"], false);
    assert_eq!(transport_during["overlay"]["source"], "hint.mp3");
    assert_eq!(after["snapshot"]["state"]["paused"], false);
    assert_eq!(transport_after["playing"], true);
}

#[tokio::test(start_paused = true)]
async fn test_video_play_stops_overlay_and_replay_resumes_it() {
    let (app, _driver) = common::build_test_app();
    common::post_json(&app, "/api/v1/session/overlay", &json!({ "url": "hint.mp3" })).await;
    common::post_empty(&app, "/api/v1/transport/overlay-play").await;

    common::post_empty(&app, "/api/v1/transport/video-play").await;
    let (_, stopped) = common::get_json(&app, "/api/v1/transport").await;
    common::post_empty(&app, "/api/v1/session/overlay/start").await;
    let (_, resumed) = common::get_json(&app, "/api/v1/transport").await;

    assert_eq!(stopped["overlay"]["playing"], false);
    assert_eq!(resumed["overlay"]["playing"], true);
    assert_eq!(resumed["overlay"]["resumeCount"], 1);
}

#[tokio::test(start_paused = true)]
async fn test_metadata_reports_portrait_once() {
    let (app, _driver) = common::build_test_app();

    let (_, first) = common::post_json(
        &app,
        "/api/v1/transport/metadata",
        &json!({ "width": 720, "height": 1280 }),
    )
    .await;
    let (_, second) = common::post_json(
        &app,
        "/api/v1/transport/metadata",
        &json!({ "width": 1280, "height": 720 }),
    )
    .await;

    assert_eq!(first["snapshot"]["state"]["isPortrait"], true);
    assert_eq!(second["snapshot"]["state"]["isPortrait"], true);
}

#[tokio::test(start_paused = true)]
async fn test_media_error_is_surfaced() {
    let (app, _driver) = common::build_test_app();

    let (status, json) = common::post_json(
        &app,
        "/api/v1/transport/error",
        &json!({ "reason": "MEDIA_ERR_SRC_NOT_SUPPORTED" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["snapshot"]["state"]["mediaError"],
        "MEDIA_ERR_SRC_NOT_SUPPORTED"
    );
}
