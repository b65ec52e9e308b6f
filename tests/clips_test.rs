//! Clip generation endpoints.

mod common;

use std::net::SocketAddr;

use common::TestHarness;
use serde_json::{json, Value};

async fn post(addr: SocketAddr, path: &str, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}{path}"))
        .json(&body)
        .send()
        .await
        .expect("request failed")
}

fn request(start: &str, end: &str) -> Value {
    json!({"season": 1, "episode": 1, "start_time": start, "end_time": end})
}

#[tokio::test]
async fn missing_audio_reports_failure_in_body() {
    let (_harness, addr) = TestHarness::with_server().await;
    let resp = post(addr, "/generate_audio", request("0:00:01.00", "0:00:02.50")).await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["audio_url"].is_null());
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn missing_video_reports_failure_in_body() {
    let (_harness, addr) = TestHarness::with_server().await;
    let resp = post(addr, "/generate_video", request("0:00:01.00", "0:00:02.50")).await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["video_url"].is_null());
}

#[tokio::test]
async fn malformed_timestamp_is_a_bad_request() {
    let (_harness, addr) = TestHarness::with_server().await;
    let resp = post(addr, "/generate_audio", request("1:2", "0:00:02.50")).await;
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "validation_error");
    assert!(body["error"].as_str().unwrap().contains("1:2"));
}

#[tokio::test]
async fn incomplete_body_is_rejected() {
    let (_harness, addr) = TestHarness::with_server().await;
    let resp = post(addr, "/generate_audio", json!({"season": 1})).await;
    assert!(resp.status().is_client_error());
}

#[cfg(unix)]
#[tokio::test]
async fn audio_clip_is_cut_and_served() {
    use std::os::unix::fs::PermissionsExt;

    let harness = TestHarness::new();
    let ffmpeg = harness.path("fake-ffmpeg");
    std::fs::write(&ffmpeg, "#!/bin/sh\nfor last; do :; done\necho clip > \"$last\"\n").unwrap();
    std::fs::set_permissions(&ffmpeg, std::fs::Permissions::from_mode(0o755)).unwrap();

    let media = harness.path("audio/音频-S01");
    std::fs::create_dir_all(&media).unwrap();
    std::fs::write(media.join("小谢尔顿-S01E01-音频.mp3"), b"ID3").unwrap();

    let mut config = TestHarness::config_for(harness.root.path());
    config.tools.ffmpeg_path = Some(ffmpeg);
    let ctx = subseek_server::context::AppContext::new(harness.db.clone(), config);
    let app = subseek_server::router::build_router(ctx);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    let resp = post(addr, "/generate_audio", request("0:00:01.00", "0:00:02.50")).await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true, "body: {body}");
    assert!(body["message"].is_null());

    let url = body["audio_url"].as_str().unwrap();
    assert!(url.starts_with("/temp_audio/s01e01_"));
    assert!(url.ends_with(".mp3"));

    let served = reqwest::get(format!("http://{addr}{url}")).await.unwrap();
    assert_eq!(served.status(), 200);
    assert_eq!(served.text().await.unwrap(), "clip\n");
}
