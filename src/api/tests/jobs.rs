use super::*;
use serde_json::json;

#[tokio::test]
async fn test_enqueue_returns_receipt() {
    let (downloader, _temp_dir) = create_test_downloader(MockEngine::new(vec![])).await;
    let app = router_for(&downloader);

    let response = app
        .clone()
        .oneshot(post_json(
            "/enqueue",
            json!({"url": "https://example.com/watch?v=1", "format": "mp3", "quality": "best"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["position"], 1);
    assert_eq!(json["message"], "Queued at position 1");
    let id = json["job_id"].as_str().unwrap().to_string();

    let response = app.oneshot(get(&format!("/status/{id}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let status = body_json(response).await;
    assert_eq!(status["status"], "queued");
    assert_eq!(status["kind"], "audio");
    assert_eq!(status["quality"], "best");
    assert_eq!(status["position"], 1);
    assert!(status["error"].is_null());
}

#[tokio::test]
async fn test_enqueue_defaults_to_video_and_accepts_kind_alias() {
    let (downloader, _temp_dir) = create_test_downloader(MockEngine::new(vec![])).await;
    let app = router_for(&downloader);

    let response = app
        .clone()
        .oneshot(post_json("/enqueue", json!({"url": "https://example.com/a"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json(
            "/enqueue",
            json!({"url": "https://example.com/b", "kind": "audio"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["position"], 2);

    let jobs = downloader.list_jobs();
    assert_eq!(jobs[0].kind, crate::types::OutputKind::Video);
    assert_eq!(jobs[0].quality, "720p");
    assert_eq!(jobs[1].kind, crate::types::OutputKind::Audio);
}

#[tokio::test]
async fn test_enqueue_rejects_missing_url() {
    let (downloader, _temp_dir) = create_test_downloader(MockEngine::new(vec![])).await;

    for body in [json!({}), json!({"url": "   "})] {
        let response = router_for(&downloader)
            .oneshot(post_json("/enqueue", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "invalid_input");
    }

    assert!(downloader.list_jobs().is_empty());
}

#[tokio::test]
async fn test_enqueue_rejects_unknown_format() {
    let (downloader, _temp_dir) = create_test_downloader(MockEngine::new(vec![])).await;

    let response = router_for(&downloader)
        .oneshot(post_json(
            "/enqueue",
            json!({"url": "https://example.com/a", "format": "flac"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(downloader.list_jobs().is_empty());
}

#[tokio::test]
async fn test_enqueue_after_shutdown_is_503() {
    let (downloader, _temp_dir) = create_test_downloader(MockEngine::new(vec![])).await;
    downloader.shutdown().await.unwrap();

    let response = router_for(&downloader)
        .oneshot(post_json("/enqueue", json!({"url": "https://example.com/a"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["error"]["code"], "shutting_down");
}

#[tokio::test]
async fn test_status_unknown_job_is_404() {
    let (downloader, _temp_dir) = create_test_downloader(MockEngine::new(vec![])).await;
    let app = router_for(&downloader);

    let unknown = crate::types::JobId::new();
    for uri in [format!("/status/{unknown}"), "/status/not-a-uuid".to_string()] {
        let response = app.clone().oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body_json(response).await["error"]["code"], "not_found");
    }
}

#[tokio::test]
async fn test_download_lifecycle() {
    let engine = MockEngine::new(vec![Script::ok("Live: At / The Venue", "mp4")]);
    let (downloader, _temp_dir) = create_test_downloader(engine).await;
    let app = router_for(&downloader);

    let receipt = downloader
        .enqueue("https://example.com/live", crate::types::OutputKind::Video, None)
        .unwrap();
    let id = receipt.job_id;

    // Not finished yet
    let response = app
        .clone()
        .oneshot(get(&format!("/download/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"]["code"], "not_ready");

    let handle = downloader.start_worker();
    let info = wait_for_terminal(&downloader, id).await;
    assert_eq!(info.status, crate::types::Status::Done);

    let response = app
        .clone()
        .oneshot(get(&format!("/download/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "video/mp4"
    );
    let disposition = response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment;"), "{disposition}");
    assert!(disposition.contains(".mp4"), "{disposition}");
    assert!(!disposition.contains('/'), "{disposition}");
    assert_eq!(body_bytes(response).await, b"media bytes");

    // File removed behind our back
    let path = downloader.result(id).await.unwrap().path;
    std::fs::remove_file(&path).unwrap();
    let response = app
        .oneshot(get(&format!("/download/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"]["code"], "result_missing");

    downloader.shutdown().await.unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_failed_job_reports_error_and_refuses_download() {
    let engine = MockEngine::new(vec![Script::Fail(
        "ERROR: [youtube] abc: Private video. Sign in if you've been granted access".into(),
    )]);
    let (downloader, _temp_dir) = create_test_downloader(engine).await;
    let app = router_for(&downloader);

    let id = downloader
        .enqueue("https://example.com/private", crate::types::OutputKind::Video, None)
        .unwrap()
        .job_id;
    let handle = downloader.start_worker();
    wait_for_terminal(&downloader, id).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/status/{id}")))
        .await
        .unwrap();
    let status = body_json(response).await;
    assert_eq!(status["status"], "error");
    assert_eq!(status["position"], 0);
    assert!(status["error"].as_str().unwrap().contains("Private video"));

    let response = app.oneshot(get(&format!("/download/{id}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    downloader.shutdown().await.unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_list_jobs_and_stats() {
    let (downloader, _temp_dir) = create_test_downloader(MockEngine::new(vec![])).await;
    let app = router_for(&downloader);

    for n in 0..3 {
        downloader
            .enqueue(
                &format!("https://example.com/{n}"),
                crate::types::OutputKind::Video,
                None,
            )
            .unwrap();
    }

    let response = app.clone().oneshot(get("/jobs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let jobs = body_json(response).await;
    let urls: Vec<&str> = jobs
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["url"].as_str().unwrap())
        .collect();
    assert_eq!(
        urls,
        vec!["https://example.com/0", "https://example.com/1", "https://example.com/2"]
    );

    let response = app.oneshot(get("/queue/stats")).await.unwrap();
    let stats = body_json(response).await;
    assert_eq!(stats["queued"], 3);
    assert_eq!(stats["downloading"], 0);
    assert_eq!(stats["done"], 0);
    assert_eq!(stats["failed"], 0);
}
