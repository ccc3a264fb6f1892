//! Card authorization endpoint.

use api_types::card::{AuthorizeRequest, AuthorizeResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{AuthorizeCmd, CallerContext};

use crate::{ServerError, convert::currency_from_api, server::ServerState};

pub async fn authorize(
    Extension(caller): Extension<CallerContext>,
    State(state): State<ServerState>,
    Path(card_id): Path<String>,
    Json(payload): Json<AuthorizeRequest>,
) -> Result<(StatusCode, Json<AuthorizeResponse>), ServerError> {
    let mut cmd = AuthorizeCmd::new(
        caller,
        card_id,
        payload.amount_minor,
        currency_from_api(payload.currency),
    );
    if let Some(mcc) = payload.mcc {
        cmd = cmd.mcc(mcc);
    }
    if let Some(key) = payload.idempotency_key {
        cmd = cmd.idempotency_key(key);
    }

    let transaction_id = state.engine.authorize(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthorizeResponse { transaction_id }),
    ))
}
