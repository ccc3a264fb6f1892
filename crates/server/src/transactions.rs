//! Card transaction lookup.

use api_types::card::CardTransactionView;
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::CallerContext;
use uuid::Uuid;

use crate::{
    ServerError,
    convert::{card_status_to_api, currency_to_api},
    server::ServerState,
};

pub async fn get(
    Extension(caller): Extension<CallerContext>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CardTransactionView>, ServerError> {
    let tx = state.engine.card_transaction(&caller, id).await?;

    Ok(Json(CardTransactionView {
        id: tx.id,
        card_id: tx.card_id,
        wallet_id: tx.wallet_id,
        mcc: tx.mcc,
        amount_minor: tx.amount_minor,
        currency: currency_to_api(tx.currency),
        status: card_status_to_api(tx.status),
        authorized_at: tx.authorized_at,
    }))
}
