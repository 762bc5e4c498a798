use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Endpoint {
    pub asset_id: Uuid,
    pub asset_name: String,
    pub asset_description: Option<String>,
    pub asset_tags: Vec<String>,
    pub endpoint_hostname: String,
    pub endpoint_ips: Vec<String>,
    pub endpoint_platform: String,
}

#[derive(Debug, Deserialize)]
pub struct EndpointInput {
    #[serde(default)]
    pub asset_name: String,
    pub asset_description: Option<String>,
    #[serde(default)]
    pub asset_tags: Vec<String>,
    #[serde(default)]
    pub endpoint_hostname: String,
    #[serde(default)]
    pub endpoint_ips: Vec<String>,
    #[serde(default)]
    pub endpoint_platform: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchOption {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "searchText", default)]
    pub search_text: String,
}

pub const PLATFORMS: [&str; 3] = ["Linux", "Windows", "MacOS"];

pub struct AppState {
    endpoints: RwLock<HashMap<Uuid, Endpoint>>,
    tags: Vec<SearchOption>,
}

pub type Db = Arc<AppState>;

/// Error reply in the backend's validation format.
type Failure = (StatusCode, Json<Value>);

pub fn app() -> Router {
    app_with_base_path("")
}

/// Serve the API under `base_path` (`""` serves it at the root).
pub fn app_with_base_path(base_path: &str) -> Router {
    let db: Db = Arc::new(AppState {
        endpoints: RwLock::new(HashMap::new()),
        tags: seed_tags(),
    });
    let api = Router::new()
        .route("/api/endpoints", get(list_endpoints).post(create_endpoint))
        .route(
            "/api/endpoints/{id}",
            get(get_endpoint).put(update_endpoint).delete(delete_endpoint),
        )
        .route("/api/tags/options", get(search_tags))
        .with_state(db);

    let base_path = base_path.trim_end_matches('/');
    if base_path.is_empty() {
        api
    } else {
        Router::new().nest(base_path, api)
    }
}

pub async fn run(listener: TcpListener, base_path: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_base_path(base_path)).await
}

fn seed_tags() -> Vec<SearchOption> {
    [("t-red", "red team"), ("t-blue", "blue team"), ("t-phishing", "phishing")]
        .into_iter()
        .map(|(id, label)| SearchOption {
            id: id.to_string(),
            label: label.to_string(),
        })
        .collect()
}

fn failure(status: StatusCode, message: &str) -> Failure {
    (status, Json(json!({"status": status.as_u16(), "message": message})))
}

fn not_found() -> Failure {
    failure(StatusCode::NOT_FOUND, "Element not found")
}

/// Field checks, reported per field the way the real backend does.
fn validate(input: &EndpointInput) -> Result<(), Failure> {
    let mut children = serde_json::Map::new();
    if input.asset_name.trim().is_empty() {
        children.insert("asset_name".into(), json!({"errors": ["must not be blank"]}));
    }
    if input.endpoint_hostname.trim().is_empty() {
        children.insert("endpoint_hostname".into(), json!({"errors": ["must not be blank"]}));
    }
    if !PLATFORMS.contains(&input.endpoint_platform.as_str()) {
        children.insert(
            "endpoint_platform".into(),
            json!({"errors": [format!("must be one of {}", PLATFORMS.join(", "))]}),
        );
    }
    if children.is_empty() {
        return Ok(());
    }
    Err((
        StatusCode::BAD_REQUEST,
        Json(json!({
            "status": 400,
            "message": "Validation Failed",
            "errors": {"children": children},
        })),
    ))
}

fn ensure_unique(endpoints: &HashMap<Uuid, Endpoint>, name: &str, except: Option<Uuid>) -> Result<(), Failure> {
    let taken = endpoints
        .values()
        .any(|e| e.asset_name == name && Some(e.asset_id) != except);
    if taken {
        tracing::debug!(asset_name = name, "rejecting duplicate endpoint");
        return Err(failure(StatusCode::CONFLICT, "Endpoint already exists"));
    }
    Ok(())
}

async fn list_endpoints(State(db): State<Db>) -> Json<Vec<Endpoint>> {
    let endpoints = db.endpoints.read().await;
    let mut all: Vec<Endpoint> = endpoints.values().cloned().collect();
    all.sort_by(|a, b| a.asset_name.cmp(&b.asset_name));
    Json(all)
}

async fn create_endpoint(
    State(db): State<Db>,
    Json(input): Json<EndpointInput>,
) -> Result<(StatusCode, Json<Endpoint>), Failure> {
    validate(&input)?;
    let mut endpoints = db.endpoints.write().await;
    ensure_unique(&endpoints, &input.asset_name, None)?;
    let endpoint = Endpoint {
        asset_id: Uuid::new_v4(),
        asset_name: input.asset_name,
        asset_description: input.asset_description,
        asset_tags: input.asset_tags,
        endpoint_hostname: input.endpoint_hostname,
        endpoint_ips: input.endpoint_ips,
        endpoint_platform: input.endpoint_platform,
    };
    endpoints.insert(endpoint.asset_id, endpoint.clone());
    tracing::info!(asset_id = %endpoint.asset_id, "endpoint created");
    Ok((StatusCode::CREATED, Json(endpoint)))
}

async fn get_endpoint(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<Json<Endpoint>, Failure> {
    let endpoints = db.endpoints.read().await;
    endpoints.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_endpoint(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<EndpointInput>,
) -> Result<Json<Endpoint>, Failure> {
    validate(&input)?;
    let mut endpoints = db.endpoints.write().await;
    if !endpoints.contains_key(&id) {
        return Err(not_found());
    }
    ensure_unique(&endpoints, &input.asset_name, Some(id))?;
    let endpoint = endpoints.get_mut(&id).ok_or_else(not_found)?;
    endpoint.asset_name = input.asset_name;
    endpoint.asset_description = input.asset_description;
    endpoint.asset_tags = input.asset_tags;
    endpoint.endpoint_hostname = input.endpoint_hostname;
    endpoint.endpoint_ips = input.endpoint_ips;
    endpoint.endpoint_platform = input.endpoint_platform;
    Ok(Json(endpoint.clone()))
}

async fn delete_endpoint(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<StatusCode, Failure> {
    let mut endpoints = db.endpoints.write().await;
    endpoints
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(not_found)
}

async fn search_tags(State(db): State<Db>, Query(query): Query<SearchQuery>) -> Json<Vec<SearchOption>> {
    let needle = query.search_text.to_lowercase();
    Json(
        db.tags
            .iter()
            .filter(|tag| tag.label.to_lowercase().contains(&needle))
            .cloned()
            .collect(),
    )
}
