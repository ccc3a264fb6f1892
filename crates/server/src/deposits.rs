//! Deposit request endpoints.

use api_types::deposit::{DepositRequestCreated, DepositRequestNew, DepositRequestView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{CallerContext, DepositRequestCmd};
use uuid::Uuid;

use crate::{
    ServerError,
    convert::{currency_to_api, deposit_status_to_api, method_from_api, method_to_api},
    server::ServerState,
};

pub async fn deposit_new(
    Extension(caller): Extension<CallerContext>,
    State(state): State<ServerState>,
    Json(payload): Json<DepositRequestNew>,
) -> Result<(StatusCode, Json<DepositRequestCreated>), ServerError> {
    let created = state
        .engine
        .create_deposit_request(DepositRequestCmd::new(
            caller,
            method_from_api(payload.method),
            payload.amount_minor,
        ))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DepositRequestCreated {
            request_id: created.request_id,
            address: created.address,
            eta_minutes: created.eta_minutes,
            required_confirmations: created.required_confirmations,
            fee_minor: created.fee_minor,
            net_minor: created.net_minor,
        }),
    ))
}

pub async fn get(
    Extension(caller): Extension<CallerContext>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DepositRequestView>, ServerError> {
    let (request, address) = state.engine.deposit_request(&caller, id).await?;

    Ok(Json(DepositRequestView {
        id: request.id,
        method: method_to_api(request.method),
        currency: currency_to_api(request.currency),
        amount_minor: request.amount_minor,
        fee_minor: request.fee_minor,
        net_minor: request.net_minor,
        status: deposit_status_to_api(request.status),
        address: address.address,
        required_confirmations: address.required_confirmations,
        created_at: request.created_at,
    }))
}
