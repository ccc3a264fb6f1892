use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener};

mod cards;
mod convert;
mod deposits;
mod server;
mod transactions;
mod wallets;

pub mod types {
    pub mod wallet {
        pub use api_types::wallet::WalletView;
    }

    pub mod card {
        pub use api_types::card::{
            AuthorizeRequest, AuthorizeResponse, CardTransactionStatus, CardTransactionView,
        };
    }

    pub mod deposit {
        pub use api_types::deposit::{
            DepositMethod, DepositRequestCreated, DepositRequestNew, DepositRequestView,
            DepositStatus,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) | EngineError::DepositDisabled(_) => StatusCode::CONFLICT,
        EngineError::Custody(_) => StatusCode::BAD_GATEWAY,
        EngineError::Database(_)
        | EngineError::Unbalanced(_)
        | EngineError::BalanceInvariant(_)
        | EngineError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InsufficientFunds(_)
        | EngineError::OutOfLimits(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidId(_)
        | EngineError::CurrencyMismatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        err @ (EngineError::Unbalanced(_)
        | EngineError::BalanceInvariant(_)
        | EngineError::Config(_)) => {
            tracing::error!("{err}");
            "internal server error".to_string()
        }
        EngineError::Custody(reason) => {
            tracing::error!("custody error: {reason}");
            "custody unavailable".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let ServerError::Engine(err) = self;
        let (status, error) = (status_for_engine_error(&err), message_for_engine_error(err));

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(err: EngineError) -> StatusCode {
        ServerError::from(err).into_response().status()
    }

    #[test]
    fn business_rejections_map_to_422() {
        for err in [
            EngineError::InsufficientFunds("x".to_string()),
            EngineError::OutOfLimits("x".to_string()),
            EngineError::InvalidAmount("x".to_string()),
            EngineError::CurrencyMismatch("x".to_string()),
        ] {
            assert_eq!(status(err), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        assert_eq!(
            status(EngineError::KeyNotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn conflicts_map_to_409() {
        assert_eq!(
            status(EngineError::ExistingKey("x".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(EngineError::DepositDisabled("x".to_string())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn custody_maps_to_502() {
        assert_eq!(
            status(EngineError::Custody("down".to_string())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn internal_failures_map_to_500() {
        assert_eq!(
            status(EngineError::BalanceInvariant("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(EngineError::Unbalanced("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
