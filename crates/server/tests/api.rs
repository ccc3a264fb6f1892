use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{Currency, DepositMethod, Engine, NewDepositRule};
use migration::MigratorTrait;
use server::{ServerState, router};

async fn app() -> (Router, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();

    engine.open_wallet("alice", Currency::Usd).await.unwrap();
    engine
        .create_deposit_rule(NewDepositRule {
            method: DepositMethod::UsdtTrc20,
            min_amount_minor: 10_000_000,
            max_amount_minor: 10_000_000_000,
            fee_ppm: 10_000,
            eta_minutes: 30,
            required_confirmations: None,
            active: true,
        })
        .await
        .unwrap();

    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE wallets SET available = ? WHERE user_id = ?",
        vec![500i64.into(), "alice".into()],
    ))
    .await
    .unwrap();

    let state = ServerState {
        engine: Arc::new(engine),
    };
    (router(state), db)
}

fn post(uri: &str, user: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("x-user-id", user)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, user: &str) -> Request<Body> {
    Request::get(uri)
        .header("x-user-id", user)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let (app, _db) = app().await;

    let res = app
        .oneshot(
            Request::get("/wallets/USD")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn authorize_places_hold() {
    let (app, _db) = app().await;

    let res = app
        .clone()
        .oneshot(post(
            "/cards/card-1/authorize",
            "alice",
            json!({"amount_minor": 200, "currency": "USD", "mcc": "5411"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = json_body(res).await;
    let tx_id = body["transaction_id"].as_str().unwrap().to_string();

    let res = app.clone().oneshot(get("/wallets/usd", "alice")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let wallet = json_body(res).await;
    assert_eq!(wallet["available_minor"], 300);
    assert_eq!(wallet["frozen_minor"], 200);

    let res = app
        .clone()
        .oneshot(get(&format!("/transactions/{tx_id}"), "alice"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let tx = json_body(res).await;
    assert_eq!(tx["status"], "authorized");
    assert_eq!(tx["card_id"], "card-1");

    let res = app
        .oneshot(get(&format!("/transactions/{tx_id}"), "bob"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn authorize_rejections_are_422() {
    let (app, _db) = app().await;

    let res = app
        .clone()
        .oneshot(post(
            "/cards/card-1/authorize",
            "alice",
            json!({"amount_minor": 600, "currency": "USD"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("Insufficient funds"));

    let res = app
        .oneshot(post(
            "/cards/card-1/authorize",
            "alice",
            json!({"amount_minor": 100, "currency": "EUR"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn deposit_request_round_trip() {
    let (app, _db) = app().await;

    let res = app
        .clone()
        .oneshot(post(
            "/deposits",
            "alice",
            json!({"method": "usdt_trc20", "amount_minor": 100_000_000}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = json_body(res).await;
    assert_eq!(created["fee_minor"], 1_000_000);
    assert_eq!(created["net_minor"], 99_000_000);
    assert_eq!(created["required_confirmations"], 20);
    let id = created["request_id"].as_str().unwrap().to_string();

    let res = app
        .oneshot(get(&format!("/deposits/{id}"), "alice"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let view = json_body(res).await;
    assert_eq!(view["status"], "pending");
    assert_eq!(view["currency"], "USDT");
    assert_eq!(view["address"], created["address"]);
}

#[tokio::test]
async fn deposit_rejections_map_statuses() {
    let (app, _db) = app().await;

    let res = app
        .clone()
        .oneshot(post(
            "/deposits",
            "alice",
            json!({"method": "usdt_trc20", "amount_minor": 1_000_000}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let res = app
        .oneshot(post(
            "/deposits",
            "alice",
            json!({"method": "usdt_erc20", "amount_minor": 100_000_000}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_wallet_currency_is_422() {
    let (app, _db) = app().await;

    let res = app.oneshot(get("/wallets/gbp", "alice")).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
