use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequestParts, Path, State,
    },
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ItemName {
    pub name: String,
}

#[derive(Default)]
pub struct Store {
    users: HashMap<String, String>,
    sessions: HashMap<String, String>,
    items: BTreeMap<i64, (String, Item)>,
    next_id: i64,
}

pub type Db = Arc<RwLock<Store>>;

/// Non-2xx reply rendered as `{"error": "..."}`.
#[derive(Debug, Clone, Copy)]
pub struct Failure(StatusCode, &'static str);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

const NOT_FOUND: Failure = Failure(StatusCode::NOT_FOUND, "item not found");

/// Unwrap a JSON body, keeping axum's status but replying with an error body.
fn body<T>(input: Result<Json<T>, JsonRejection>) -> Result<T, Failure> {
    input
        .map(|Json(value)| value)
        .map_err(|rejection| Failure(rejection.status(), "invalid request body"))
}

fn item_id(input: Result<Path<i64>, PathRejection>) -> Result<i64, Failure> {
    input
        .map(|Path(id)| id)
        .map_err(|rejection| Failure(rejection.status(), "invalid item id"))
}

/// Username resolved from a `Bearer` token.
pub struct AuthUser(String);

impl FromRequestParts<Db> for AuthUser {
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, db: &Db) -> Result<Self, Self::Rejection> {
        let unauthorized = Failure(StatusCode::UNAUTHORIZED, "missing or invalid token");
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(unauthorized)?;
        let store = db.read().await;
        store
            .sessions
            .get(token)
            .cloned()
            .map(AuthUser)
            .ok_or(unauthorized)
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store {
        next_id: 1,
        ..Store::default()
    }));
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item).put(update_item).delete(delete_item))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn register(
    State(db): State<Db>,
    input: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), Failure> {
    let input = body(input)?;
    let mut store = db.write().await;
    if store.users.contains_key(&input.username) {
        return Err(Failure(StatusCode::CONFLICT, "username already taken"));
    }
    info!(username = %input.username, "registered user");
    store.users.insert(input.username, input.password);
    Ok((StatusCode::CREATED, Json(json!({ "message": "user registered" }))))
}

async fn login(
    State(db): State<Db>,
    input: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<serde_json::Value>, Failure> {
    let input = body(input)?;
    let mut store = db.write().await;
    if store.users.get(&input.username) != Some(&input.password) {
        return Err(Failure(StatusCode::UNAUTHORIZED, "invalid credentials"));
    }
    let token = Uuid::new_v4().to_string();
    store.sessions.insert(token.clone(), input.username);
    Ok(Json(json!({ "token": token })))
}

async fn list_items(AuthUser(user): AuthUser, State(db): State<Db>) -> Json<Vec<Item>> {
    let store = db.read().await;
    Json(
        store
            .items
            .values()
            .filter(|(owner, _)| *owner == user)
            .map(|(_, item)| item.clone())
            .collect(),
    )
}

async fn create_item(
    AuthUser(user): AuthUser,
    State(db): State<Db>,
    input: Result<Json<ItemName>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), Failure> {
    let input = body(input)?;
    let mut store = db.write().await;
    let item = Item {
        id: store.next_id,
        name: input.name,
    };
    store.next_id += 1;
    store.items.insert(item.id, (user, item.clone()));
    Ok((StatusCode::CREATED, Json(item)))
}

async fn get_item(
    AuthUser(user): AuthUser,
    State(db): State<Db>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Item>, Failure> {
    let id = item_id(id)?;
    let store = db.read().await;
    match store.items.get(&id) {
        Some((owner, item)) if *owner == user => Ok(Json(item.clone())),
        _ => Err(NOT_FOUND),
    }
}

async fn update_item(
    AuthUser(user): AuthUser,
    State(db): State<Db>,
    id: Result<Path<i64>, PathRejection>,
    input: Result<Json<ItemName>, JsonRejection>,
) -> Result<Json<Item>, Failure> {
    let id = item_id(id)?;
    let input = body(input)?;
    let mut store = db.write().await;
    match store.items.get_mut(&id) {
        Some((owner, item)) if *owner == user => {
            item.name = input.name;
            Ok(Json(item.clone()))
        }
        _ => Err(NOT_FOUND),
    }
}

async fn delete_item(
    AuthUser(user): AuthUser,
    State(db): State<Db>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, Failure> {
    let id = item_id(id)?;
    let mut store = db.write().await;
    if !matches!(store.items.get(&id), Some((owner, _)) if *owner == user) {
        return Err(NOT_FOUND);
    }
    store.items.remove(&id);
    Ok(Json(json!({ "message": "item deleted" })))
}
