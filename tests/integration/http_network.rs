//! reqwest-backed network used by the offline cache

use ai_voice_proxy::offline::{FetchRequest, HttpNetwork, Network, ResponseType};
use mockito::Server;
use std::time::Duration;
use url::Url;

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_same_origin_response_is_basic() {
    let mut server = Server::new_async().await;
    let _asset = server
        .mock("GET", "/styles.css")
        .with_status(200)
        .with_header("content-type", "text/css")
        .with_body("body{}")
        .create_async()
        .await;

    let origin = Url::parse(&server.url()).unwrap();
    let network = HttpNetwork::new(origin.clone(), TIMEOUT).unwrap();
    let resp = network
        .fetch(&FetchRequest::get(origin.join("/styles.css").unwrap()))
        .await
        .unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(resp.response_type, ResponseType::Basic);
    assert!(!resp.redirected);
    assert_eq!(resp.header("content-type"), Some("text/css"));
    assert_eq!(&resp.body[..], b"body{}");
    assert!(resp.is_direct_ok());
}

#[tokio::test]
async fn test_followed_redirect_is_flagged() {
    let mut server = Server::new_async().await;
    let _old = server
        .mock("GET", "/old.js")
        .with_status(302)
        .with_header("location", "/app.js")
        .create_async()
        .await;
    let _new = server
        .mock("GET", "/app.js")
        .with_status(200)
        .with_body("console.log(1)")
        .create_async()
        .await;

    let origin = Url::parse(&server.url()).unwrap();
    let network = HttpNetwork::new(origin.clone(), TIMEOUT).unwrap();
    let resp = network
        .fetch(&FetchRequest::get(origin.join("/old.js").unwrap()))
        .await
        .unwrap();

    assert_eq!(resp.status, 200);
    assert!(resp.redirected);
    assert!(!resp.is_direct_ok());
}

#[tokio::test]
async fn test_cross_origin_response_is_cors() {
    let mut server = Server::new_async().await;
    let _font = server
        .mock("GET", "/font.woff2")
        .with_status(200)
        .with_body("woff")
        .create_async()
        .await;

    let network = HttpNetwork::new(Url::parse("https://app.example").unwrap(), TIMEOUT).unwrap();
    let target = Url::parse(&server.url()).unwrap().join("/font.woff2").unwrap();
    let resp = network.fetch(&FetchRequest::get(target)).await.unwrap();

    assert_eq!(resp.response_type, ResponseType::Cors);
    assert!(!resp.is_direct_ok());
}

#[tokio::test]
async fn test_error_status_is_an_ordinary_response() {
    let mut server = Server::new_async().await;
    let _missing = server
        .mock("GET", "/missing.png")
        .with_status(404)
        .create_async()
        .await;

    let origin = Url::parse(&server.url()).unwrap();
    let network = HttpNetwork::new(origin.clone(), TIMEOUT).unwrap();
    let resp = network
        .fetch(&FetchRequest::get(origin.join("/missing.png").unwrap()))
        .await
        .unwrap();

    assert_eq!(resp.status, 404);
    assert!(!resp.is_ok());
}

#[tokio::test]
async fn test_unreachable_host_is_an_error() {
    let origin = Url::parse("http://127.0.0.1:9").unwrap();
    let network = HttpNetwork::new(origin.clone(), TIMEOUT).unwrap();
    let result = network
        .fetch(&FetchRequest::get(origin.join("/index.html").unwrap()))
        .await;
    assert!(result.is_err());
}
