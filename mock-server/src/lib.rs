use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Count {
    pub id: i64,
    pub value: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CountInput {
    pub value: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Default)]
pub struct Store {
    next_id: i64,
    counts: BTreeMap<i64, Count>,
}

impl Store {
    fn insert(&mut self, value: i64) -> Count {
        self.next_id += 1;
        let count = Count {
            id: self.next_id,
            value,
            updated_at: Utc::now(),
        };
        self.counts.insert(count.id, count.clone());
        count
    }

    fn modify(&mut self, id: i64, f: impl FnOnce(i64) -> i64) -> Option<Count> {
        let count = self.counts.get_mut(&id)?;
        count.value = f(count.value);
        count.updated_at = Utc::now();
        Some(count.clone())
    }
}

pub type Db = Arc<RwLock<Store>>;

type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let counts = Router::new()
        .route("/counts", get(list_counts).post(create_count))
        .route(
            "/counts/{id}",
            get(get_count).put(update_count).delete(delete_count),
        )
        .route("/counts/{id}/increment", patch(increment_count))
        .route("/counts/{id}/decrement", patch(decrement_count))
        .with_state(db);
    Router::new().nest("/api", counts)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "count server ready");
    }
    axum::serve(listener, app()).await
}

fn ok<T>(status: StatusCode, data: T) -> Reply<T> {
    let body = ApiResponse {
        success: true,
        data: Some(data),
        error: None,
    };
    (status, Json(body))
}

fn not_found<T>(id: i64) -> Reply<T> {
    let body = ApiResponse {
        success: false,
        data: None,
        error: Some(format!("Count with id {id} not found")),
    };
    (StatusCode::NOT_FOUND, Json(body))
}

fn found(id: i64, count: Option<Count>) -> Reply<Count> {
    match count {
        Some(count) => ok(StatusCode::OK, count),
        None => not_found(id),
    }
}

async fn list_counts(State(db): State<Db>) -> Reply<Vec<Count>> {
    let store = db.read().await;
    ok(StatusCode::OK, store.counts.values().cloned().collect())
}

async fn create_count(State(db): State<Db>, Json(input): Json<CountInput>) -> Reply<Count> {
    let count = db.write().await.insert(input.value);
    info!(id = count.id, value = count.value, "created count");
    ok(StatusCode::CREATED, count)
}

async fn get_count(State(db): State<Db>, Path(id): Path<i64>) -> Reply<Count> {
    let store = db.read().await;
    found(id, store.counts.get(&id).cloned())
}

async fn update_count(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<CountInput>,
) -> Reply<Count> {
    let updated = db.write().await.modify(id, |_| input.value);
    found(id, updated)
}

async fn delete_count(State(db): State<Db>, Path(id): Path<i64>) -> Reply<Count> {
    let removed = db.write().await.counts.remove(&id);
    if removed.is_some() {
        info!(id, "deleted count");
    }
    found(id, removed)
}

async fn increment_count(State(db): State<Db>, Path(id): Path<i64>) -> Reply<Count> {
    let updated = db.write().await.modify(id, |v| v.saturating_add(1));
    found(id, updated)
}

async fn decrement_count(State(db): State<Db>, Path(id): Path<i64>) -> Reply<Count> {
    let updated = db.write().await.modify(id, |v| v.saturating_sub(1));
    found(id, updated)
}
