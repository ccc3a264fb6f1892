use std::fmt;

use crate::{Currency, EngineError, ResultEngine};

/// Parts-per-million denominator used by fee rates.
pub const PPM: i64 = 1_000_000;

/// Money amount represented as **integer minor units** of its currency.
///
/// Use this type whenever an amount crosses a human boundary (CLI input, log
/// lines). Storage and arithmetic stay on raw `i64` minor units.
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let amount = Money::new(12_34, Currency::Usd);
/// assert_eq!(amount.to_string(), "12.34 USD");
///
/// let usdt = Money::parse("99.5", Currency::Usdt).unwrap();
/// assert_eq!(usdt.amount_minor(), 99_500_000);
/// assert!(Money::parse("12.345", Currency::Usd).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Money {
    amount_minor: i64,
    currency: Currency,
}

impl Money {
    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    #[must_use]
    pub const fn amount_minor(self) -> i64 {
        self.amount_minor
    }

    #[must_use]
    pub const fn currency(self) -> Currency {
        self.currency
    }

    /// Parses a decimal string in major units.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// Rejects more fractional digits than the currency has minor units.
    pub fn parse(s: &str, currency: Currency) -> ResultEngine<Self> {
        let amount_minor = parse_scaled(s, currency.minor_units())?;
        Ok(Self::new(amount_minor, currency))
    }

    /// Fee owed on this amount at `fee_ppm` parts per million, rounded half up
    /// to the nearest minor unit.
    pub fn fee_at_ppm(self, fee_ppm: i64) -> ResultEngine<Money> {
        if !(0..PPM).contains(&fee_ppm) {
            return Err(EngineError::InvalidAmount(format!(
                "fee rate out of range: {fee_ppm} ppm"
            )));
        }
        if self.amount_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "fee base must not be negative".to_string(),
            ));
        }
        let scaled = i128::from(self.amount_minor) * i128::from(fee_ppm);
        let ppm = i128::from(PPM);
        let fee = (scaled + ppm / 2) / ppm;
        let fee = i64::try_from(fee)
            .map_err(|_| EngineError::InvalidAmount("fee too large".to_string()))?;
        Ok(Money::new(fee, self.currency))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount_minor < 0 { "-" } else { "" };
        let abs = self.amount_minor.unsigned_abs();
        let digits = u32::from(self.currency.minor_units());
        let scale = 10u64.pow(digits);
        let major = abs / scale;
        let minor = abs % scale;
        let width = digits as usize;
        write!(f, "{sign}{major}.{minor:0width$} {}", self.currency)
    }
}

/// Parses a decimal string into an integer scaled by `10^digits`.
///
/// `parse_scaled("0.01", 6)` is `10_000`, which is how fee fractions become
/// parts per million.
pub fn parse_scaled(s: &str, digits: u8) -> ResultEngine<i64> {
    let empty = || EngineError::InvalidAmount("empty amount".to_string());
    let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
    let overflow = || EngineError::InvalidAmount("amount too large".to_string());

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(empty());
    }

    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, trimmed)
    };

    let rest = rest.trim();
    if rest.is_empty() {
        return Err(empty());
    }

    let rest = rest.replace(',', ".");
    let mut parts = rest.split('.');
    let whole_str = parts.next().ok_or_else(invalid)?;
    let frac_str = parts.next().unwrap_or("");
    if parts.next().is_some() {
        return Err(invalid());
    }

    if whole_str.is_empty() || !whole_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if !frac_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac_str.len() > usize::from(digits) {
        return Err(EngineError::InvalidAmount("too many decimals".to_string()));
    }

    let scale = 10i64.pow(u32::from(digits));
    let whole: i64 = whole_str.parse().map_err(|_| overflow())?;
    let frac: i64 = if frac_str.is_empty() {
        0
    } else {
        let padded = format!("{frac_str:0<width$}", width = usize::from(digits));
        padded.parse().map_err(|_| invalid())?
    };

    let total = whole
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(overflow)?;

    if negative {
        total.checked_neg().ok_or_else(overflow)
    } else {
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_currency_minor_units() {
        assert_eq!(Money::new(0, Currency::Usd).to_string(), "0.00 USD");
        assert_eq!(Money::new(1050, Currency::Eur).to_string(), "10.50 EUR");
        assert_eq!(Money::new(-1, Currency::Usd).to_string(), "-0.01 USD");
        assert_eq!(
            Money::new(99_000_000, Currency::Usdt).to_string(),
            "99.000000 USDT"
        );
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!(Money::parse("10", Currency::Usd).unwrap().amount_minor(), 1000);
        assert_eq!(Money::parse("10,5", Currency::Usd).unwrap().amount_minor(), 1050);
        assert_eq!(Money::parse(" 2.30 ", Currency::Usd).unwrap().amount_minor(), 230);
        assert_eq!(Money::parse("-0.01", Currency::Usd).unwrap().amount_minor(), -1);
        assert_eq!(
            Money::parse("0.000001", Currency::Usdt).unwrap().amount_minor(),
            1
        );
    }

    #[test]
    fn parse_rejects_extra_decimals_and_garbage() {
        assert!(Money::parse("12.345", Currency::Usd).is_err());
        assert!(Money::parse("1.0000001", Currency::Usdt).is_err());
        assert!(Money::parse("", Currency::Usd).is_err());
        assert!(Money::parse("1.2.3", Currency::Usd).is_err());
        assert!(Money::parse("abc", Currency::Usd).is_err());
    }

    #[test]
    fn fee_fraction_parses_to_ppm() {
        assert_eq!(parse_scaled("0.01", 6).unwrap(), 10_000);
        assert_eq!(parse_scaled("0.0025", 6).unwrap(), 2_500);
    }

    #[test]
    fn one_percent_of_hundred_usdt() {
        let amount = Money::parse("100", Currency::Usdt).unwrap();
        let fee = amount.fee_at_ppm(10_000).unwrap();
        assert_eq!(fee.amount_minor(), 1_000_000);
        assert_eq!(amount.amount_minor() - fee.amount_minor(), 99_000_000);
    }

    #[test]
    fn fee_rounds_half_up() {
        // 1.5% of 0.01 USD = 0.015 cents -> 0 cents; 1.5% of 1.00 USD = 1.5 -> 2.
        assert_eq!(Money::new(1, Currency::Usd).fee_at_ppm(15_000).unwrap().amount_minor(), 0);
        assert_eq!(Money::new(100, Currency::Usd).fee_at_ppm(15_000).unwrap().amount_minor(), 2);
    }

    #[test]
    fn fee_rejects_rates_of_one_hundred_percent_or_more() {
        assert!(Money::new(100, Currency::Usd).fee_at_ppm(PPM).is_err());
        assert!(Money::new(100, Currency::Usd).fee_at_ppm(-1).is_err());
    }
}
