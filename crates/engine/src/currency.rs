use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO-like currency code of a wallet and of every amount that touches it.
///
/// ## Minor units
///
/// The engine stores monetary values as an `i64` number of **minor units** (see `Money`).
/// `minor_units()` returns how many decimal digits are used when converting between:
/// - major units (human input/output, e.g. `10.50 USD`)
/// - minor units (stored integers, e.g. `1050`)
///
/// Example: USD has 2 minor units, so `10.50 USD` ⇄ `1050`; USDT has 6, so
/// `1 USDT` ⇄ `1_000_000`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Usdt,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Usdt => "USDT",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Usd | Currency::Eur => 2,
            Currency::Usdt => 6,
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "USDT" => Ok(Currency::Usdt),
            other => Err(EngineError::CurrencyMismatch(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}
