use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_base_path, Endpoint, SearchOption};
use serde_json::Value;
use tower::ServiceExt;

const WEB_01: &str = r#"{"asset_name":"web-01","endpoint_hostname":"web-01.lan","endpoint_platform":"Linux","endpoint_ips":["10.0.0.1"]}"#;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_endpoints_empty() {
    let resp = app().oneshot(empty_request("GET", "/api/endpoints")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let endpoints: Vec<Endpoint> = body_json(resp).await;
    assert!(endpoints.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_endpoint_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/api/endpoints", WEB_01))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let endpoint: Endpoint = body_json(resp).await;
    assert_eq!(endpoint.asset_name, "web-01");
    assert_eq!(endpoint.endpoint_ips, vec!["10.0.0.1".to_string()]);
}

#[tokio::test]
async fn create_endpoint_invalid_returns_validation_body() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/endpoints",
            r#"{"endpoint_hostname":"h","endpoint_platform":"Linux"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "Validation Failed");
    assert_eq!(body["errors"]["children"]["asset_name"]["errors"][0], "must not be blank");
    assert!(body["errors"]["children"].get("endpoint_hostname").is_none());
}

#[tokio::test]
async fn create_endpoint_malformed_json_is_rejected() {
    let resp = app()
        .oneshot(json_request("POST", "/api/endpoints", r#"{"asset_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get ---

#[tokio::test]
async fn get_endpoint_not_found() {
    let resp = app()
        .oneshot(empty_request(
            "GET",
            "/api/endpoints/00000000-0000-0000-0000-000000000000",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn get_endpoint_bad_uuid_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/endpoints/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delete ---

#[tokio::test]
async fn delete_endpoint_not_found() {
    let resp = app()
        .oneshot(empty_request(
            "DELETE",
            "/api/endpoints/00000000-0000-0000-0000-000000000000",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- options ---

#[tokio::test]
async fn tag_options_filter_by_search_text() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/tags/options?searchText=TEAM"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let options: Vec<SearchOption> = body_json(resp).await;
    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["red team", "blue team"]);
}

#[tokio::test]
async fn tag_options_without_search_text_lists_all() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/tags/options"))
        .await
        .unwrap();

    let options: Vec<SearchOption> = body_json(resp).await;
    assert_eq!(options.len(), 3);
}

// --- base path ---

#[tokio::test]
async fn base_path_prefixes_every_route() {
    let resp = app_with_base_path("/app/")
        .oneshot(empty_request("GET", "/app/api/endpoints"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app_with_base_path("/app")
        .oneshot(empty_request("GET", "/api/endpoints"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/endpoints", WEB_01))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Endpoint = body_json(resp).await;
    let id = created.asset_id;

    // create again with the same name: conflict
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/endpoints", WEB_01))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], 409);

    // list: should contain the one endpoint
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/endpoints"))
        .await
        .unwrap();
    let endpoints: Vec<Endpoint> = body_json(resp).await;
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].asset_id, id);

    // update: renaming to its own name is not a conflict
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/endpoints/{id}"),
            r#"{"asset_name":"web-01","asset_description":"front","endpoint_hostname":"web-01.lan","endpoint_platform":"Windows"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Endpoint = body_json(resp).await;
    assert_eq!(updated.endpoint_platform, "Windows");
    assert_eq!(updated.asset_description.as_deref(), Some("front"));

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/api/endpoints/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Endpoint = body_json(resp).await;
    assert_eq!(fetched, updated);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/api/endpoints/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/api/endpoints/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
