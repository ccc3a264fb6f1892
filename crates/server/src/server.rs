use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};

use std::sync::Arc;

use crate::{cards, deposits, transactions, wallets};
use engine::{CallerContext, Engine};

static USER_ID_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("x-user-id");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// `TypedHeader` for the caller identity.
///
/// The session gateway in front of this service authenticates the user and
/// forwards the id in "x-user-id".
#[derive(Debug)]
struct UserIdHeader(String);

impl Header for UserIdHeader {
    fn name() -> &'static axum::http::HeaderName {
        &USER_ID_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };

        Ok(UserIdHeader(value.to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-user-id header"),
        }
    }
}

async fn identify(
    user_header: Option<TypedHeader<UserIdHeader>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(UserIdHeader(user_id))) = user_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    let caller = CallerContext::new(user_id).map_err(|_| StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/cards/{card_id}/authorize", post(cards::authorize))
        .route("/transactions/{id}", get(transactions::get))
        .route("/deposits", post(deposits::deposit_new))
        .route("/deposits/{id}", get(deposits::get))
        .route("/wallets/{currency}", get(wallets::get))
        .route_layer(middleware::from_fn(identify))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}
