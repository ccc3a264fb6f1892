//! Wallets API endpoints.

use api_types::wallet::WalletView;
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::{CallerContext, Currency};

use crate::{ServerError, convert::currency_to_api, server::ServerState};

pub async fn get(
    Extension(caller): Extension<CallerContext>,
    State(state): State<ServerState>,
    Path(currency): Path<String>,
) -> Result<Json<WalletView>, ServerError> {
    let currency = Currency::try_from(currency.as_str())?;
    let wallet = state.engine.wallet(&caller, currency).await?;

    Ok(Json(WalletView {
        id: wallet.id,
        currency: currency_to_api(wallet.currency),
        available_minor: wallet.available,
        frozen_minor: wallet.frozen,
    }))
}
