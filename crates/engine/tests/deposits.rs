use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    AddressIssuer, CallerContext, DepositMethod, DepositRequestCmd, DepositStatus, Engine,
    EngineError, IssuedAddress, NewDepositRule, PlaceholderAddressIssuer, ResultEngine,
};
use migration::MigratorTrait;

const USDT: i64 = 1_000_000;

struct FixedIssuer {
    address: &'static str,
    confirmations: i32,
}

#[async_trait]
impl AddressIssuer for FixedIssuer {
    async fn issue_address(
        &self,
        _method: DepositMethod,
        _deposit_request_id: Uuid,
    ) -> ResultEngine<IssuedAddress> {
        Ok(IssuedAddress {
            address: self.address.to_string(),
            required_confirmations: self.confirmations,
        })
    }
}

struct DownIssuer;

#[async_trait]
impl AddressIssuer for DownIssuer {
    async fn issue_address(
        &self,
        _method: DepositMethod,
        _deposit_request_id: Uuid,
    ) -> ResultEngine<IssuedAddress> {
        Err(EngineError::Custody("custody unavailable".to_string()))
    }
}

async fn migrated_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db
}

async fn engine_with_issuer(issuer: Arc<dyn AddressIssuer>) -> (Engine, DatabaseConnection) {
    let db = migrated_db().await;
    let engine = Engine::builder()
        .database(db.clone())
        .address_issuer(issuer)
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    engine_with_issuer(Arc::new(PlaceholderAddressIssuer)).await
}

async fn count(db: &DatabaseConnection, table: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*) AS n FROM {table}"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

fn trc20_rule() -> NewDepositRule {
    NewDepositRule {
        method: DepositMethod::UsdtTrc20,
        min_amount_minor: 10 * USDT,
        max_amount_minor: 10_000 * USDT,
        fee_ppm: 10_000,
        eta_minutes: 30,
        required_confirmations: None,
        active: true,
    }
}

fn alice() -> CallerContext {
    CallerContext::new("alice").unwrap()
}

#[tokio::test]
async fn deposit_request_takes_rule_fee() {
    let (engine, db) = engine_with_db().await;
    engine.create_deposit_rule(trc20_rule()).await.unwrap();

    let created = engine
        .create_deposit_request(DepositRequestCmd::new(
            alice(),
            DepositMethod::UsdtTrc20,
            100 * USDT,
        ))
        .await
        .unwrap();

    assert_eq!(created.fee_minor, USDT);
    assert_eq!(created.net_minor, 99 * USDT);
    assert_eq!(created.eta_minutes, 30);
    assert_eq!(created.required_confirmations, 20);
    assert!(created.address.starts_with('T'));

    let (request, address) = engine
        .deposit_request(&alice(), created.request_id)
        .await
        .unwrap();
    assert_eq!(request.status, DepositStatus::Pending);
    assert_eq!(request.amount_minor, 100 * USDT);
    assert_eq!(request.fee_minor + request.net_minor, request.amount_minor);
    assert_eq!(address.address, created.address);

    // Opening a deposit moves no money.
    assert_eq!(count(&db, "journals").await, 0);
    assert_eq!(count(&db, "ledger_entries").await, 0);
}

#[tokio::test]
async fn amount_outside_limits_creates_nothing() {
    let (engine, db) = engine_with_db().await;
    engine.create_deposit_rule(trc20_rule()).await.unwrap();

    for amount in [5 * USDT, 10_001 * USDT] {
        let err = engine
            .create_deposit_request(DepositRequestCmd::new(
                alice(),
                DepositMethod::UsdtTrc20,
                amount,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::OutOfLimits(_)));
    }
    assert_eq!(count(&db, "deposit_requests").await, 0);
    assert_eq!(count(&db, "deposit_addresses").await, 0);
}

#[tokio::test]
async fn bounds_are_inclusive() {
    let (engine, _db) = engine_with_db().await;
    engine.create_deposit_rule(trc20_rule()).await.unwrap();

    for amount in [10 * USDT, 10_000 * USDT] {
        engine
            .create_deposit_request(DepositRequestCmd::new(
                alice(),
                DepositMethod::UsdtTrc20,
                amount,
            ))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn method_without_active_rule_is_disabled() {
    let (engine, db) = engine_with_db().await;
    engine.create_deposit_rule(trc20_rule()).await.unwrap();

    let err = engine
        .create_deposit_request(DepositRequestCmd::new(
            alice(),
            DepositMethod::UsdtErc20,
            100 * USDT,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::DepositDisabled(_)));

    let rule = engine.active_deposit_rule(DepositMethod::UsdtTrc20).await.unwrap().unwrap();
    engine.set_deposit_rule_active(rule.id, false).await.unwrap();

    let err = engine
        .create_deposit_request(DepositRequestCmd::new(
            alice(),
            DepositMethod::UsdtTrc20,
            100 * USDT,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::DepositDisabled(_)));
    assert_eq!(count(&db, "deposit_requests").await, 0);
}

#[tokio::test]
async fn newest_active_rule_wins() {
    let (engine, _db) = engine_with_db().await;
    engine.create_deposit_rule(trc20_rule()).await.unwrap();
    let newer = engine
        .create_deposit_rule(NewDepositRule {
            fee_ppm: 20_000,
            eta_minutes: 10,
            ..trc20_rule()
        })
        .await
        .unwrap();
    engine
        .create_deposit_rule(NewDepositRule {
            fee_ppm: 50_000,
            active: false,
            ..trc20_rule()
        })
        .await
        .unwrap();

    let active = engine
        .active_deposit_rule(DepositMethod::UsdtTrc20)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.id, newer.id);

    let created = engine
        .create_deposit_request(DepositRequestCmd::new(
            alice(),
            DepositMethod::UsdtTrc20,
            100 * USDT,
        ))
        .await
        .unwrap();
    assert_eq!(created.fee_minor, 2 * USDT);
    assert_eq!(created.eta_minutes, 10);
    assert_eq!(engine.deposit_rules().await.unwrap().len(), 3);
}

#[tokio::test]
async fn rule_confirmations_override_issuer() {
    let (engine, _db) = engine_with_issuer(Arc::new(FixedIssuer {
        address: "TXYZfixed",
        confirmations: 19,
    }))
    .await;

    let created = engine
        .create_deposit_request(DepositRequestCmd::new(alice(), DepositMethod::UsdtTrc20, 100 * USDT))
        .await;
    assert!(matches!(created, Err(EngineError::DepositDisabled(_))));

    engine.create_deposit_rule(trc20_rule()).await.unwrap();
    let from_issuer = engine
        .create_deposit_request(DepositRequestCmd::new(alice(), DepositMethod::UsdtTrc20, 100 * USDT))
        .await
        .unwrap();
    assert_eq!(from_issuer.address, "TXYZfixed");
    assert_eq!(from_issuer.required_confirmations, 19);

    engine
        .create_deposit_rule(NewDepositRule {
            required_confirmations: Some(40),
            ..trc20_rule()
        })
        .await
        .unwrap();
    let from_rule = engine
        .create_deposit_request(DepositRequestCmd::new(alice(), DepositMethod::UsdtTrc20, 100 * USDT))
        .await
        .unwrap();
    assert_eq!(from_rule.required_confirmations, 40);
}

#[tokio::test]
async fn custody_failure_rolls_back() {
    let (engine, db) = engine_with_issuer(Arc::new(DownIssuer)).await;
    engine.create_deposit_rule(trc20_rule()).await.unwrap();

    let err = engine
        .create_deposit_request(DepositRequestCmd::new(alice(), DepositMethod::UsdtTrc20, 100 * USDT))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Custody(_)));
    assert_eq!(count(&db, "deposit_requests").await, 0);
}

#[tokio::test]
async fn deposit_requests_are_scoped_to_their_owner() {
    let (engine, _db) = engine_with_db().await;
    engine.create_deposit_rule(trc20_rule()).await.unwrap();
    let created = engine
        .create_deposit_request(DepositRequestCmd::new(alice(), DepositMethod::UsdtTrc20, 100 * USDT))
        .await
        .unwrap();

    let err = engine
        .deposit_request(&CallerContext::new("bob").unwrap(), created.request_id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn unknown_rule_cannot_be_toggled() {
    let (engine, _db) = engine_with_db().await;
    let err = engine.set_deposit_rule_active(42, true).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("deposit rule 42".to_string()));
}

#[tokio::test]
async fn invalid_rule_is_refused() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .create_deposit_rule(NewDepositRule {
            min_amount_minor: 100 * USDT,
            max_amount_minor: 10 * USDT,
            ..trc20_rule()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn production_refuses_placeholder_addresses() {
    let db = migrated_db().await;

    let err = Engine::builder()
        .database(db.clone())
        .production(true)
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));

    let err = Engine::builder()
        .database(db.clone())
        .address_issuer(Arc::new(PlaceholderAddressIssuer))
        .production(true)
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));

    Engine::builder()
        .database(db)
        .address_issuer(Arc::new(FixedIssuer {
            address: "TXYZfixed",
            confirmations: 19,
        }))
        .production(true)
        .build()
        .await
        .unwrap();
}
