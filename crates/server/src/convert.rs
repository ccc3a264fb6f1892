//! Mapping between engine values and their wire representation.

use api_types::{
    Currency,
    card::CardTransactionStatus,
    deposit::{DepositMethod, DepositStatus},
};

pub(crate) fn currency_to_api(currency: engine::Currency) -> Currency {
    match currency {
        engine::Currency::Usd => Currency::Usd,
        engine::Currency::Eur => Currency::Eur,
        engine::Currency::Usdt => Currency::Usdt,
    }
}

pub(crate) fn currency_from_api(currency: Currency) -> engine::Currency {
    match currency {
        Currency::Usd => engine::Currency::Usd,
        Currency::Eur => engine::Currency::Eur,
        Currency::Usdt => engine::Currency::Usdt,
    }
}

pub(crate) fn method_to_api(method: engine::DepositMethod) -> DepositMethod {
    match method {
        engine::DepositMethod::UsdtTrc20 => DepositMethod::UsdtTrc20,
        engine::DepositMethod::UsdtErc20 => DepositMethod::UsdtErc20,
    }
}

pub(crate) fn method_from_api(method: DepositMethod) -> engine::DepositMethod {
    match method {
        DepositMethod::UsdtTrc20 => engine::DepositMethod::UsdtTrc20,
        DepositMethod::UsdtErc20 => engine::DepositMethod::UsdtErc20,
    }
}

pub(crate) fn deposit_status_to_api(status: engine::DepositStatus) -> DepositStatus {
    match status {
        engine::DepositStatus::Pending => DepositStatus::Pending,
        engine::DepositStatus::Confirmed => DepositStatus::Confirmed,
        engine::DepositStatus::Credited => DepositStatus::Credited,
        engine::DepositStatus::Expired => DepositStatus::Expired,
    }
}

pub(crate) fn card_status_to_api(status: engine::CardTransactionStatus) -> CardTransactionStatus {
    match status {
        engine::CardTransactionStatus::Authorized => CardTransactionStatus::Authorized,
        engine::CardTransactionStatus::Captured => CardTransactionStatus::Captured,
        engine::CardTransactionStatus::Voided => CardTransactionStatus::Voided,
        engine::CardTransactionStatus::Declined => CardTransactionStatus::Declined,
    }
}
