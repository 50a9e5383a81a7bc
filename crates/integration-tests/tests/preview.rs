mod harness;

use harness::config::ConfigBuilder;
use harness::server::TestServer;
use reqwest::StatusCode;

#[tokio::test]
async fn preview_splits_paragraphs() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/api/preview"))
        .json(&serde_json::json!({"content": "Para one.\n\nPara two."}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    let boxes = body["textBoxes"].as_array().unwrap();
    assert_eq!(boxes.len(), 2);
    for text_box in boxes {
        assert_eq!(text_box["formatting"]["alignment"], "left");
        assert_eq!(text_box["formatting"]["isBold"], false);
        assert_eq!(text_box["formatting"]["isItalic"], false);
        assert_eq!(text_box["formatting"]["isHeader"], false);
    }
    assert_eq!(body["tables"], serde_json::json!([]));
}

#[tokio::test]
async fn preview_rejects_non_json() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/api/preview"))
        .body("Para one.")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
