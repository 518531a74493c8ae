//! Money value object: a non-negative decimal amount in one currency.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::Currency;
use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A monetary amount with its currency.
///
/// - The amount is never negative.
/// - Arithmetic between two values requires the same currency.
/// - Amounts are exact decimals, so repeated additions never drift.
///
/// Equality is numeric: `21.0 EUR == 21.00 EUR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMoney")]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

/// Unvalidated wire shape, so deserialization goes through [`Money::new`].
#[derive(Deserialize)]
struct RawMoney {
    amount: Decimal,
    currency: Currency,
}

impl TryFrom<RawMoney> for Money {
    type Error = DomainError;

    fn try_from(raw: RawMoney) -> Result<Self, Self::Error> {
        Money::new(raw.amount, raw.currency)
    }
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> DomainResult<Self> {
        if amount < Decimal::ZERO {
            return Err(DomainError::invalid_argument(format!(
                "amount cannot be negative: {amount}"
            )));
        }
        Ok(Self { amount, currency })
    }

    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Parse a decimal amount and a currency code (`"10.50"`, `"eur"`).
    pub fn parse(amount: &str, currency: &str) -> DomainResult<Self> {
        let currency = Currency::from_code(currency)?;
        let amount = Decimal::from_str(amount.trim())
            .map_err(|e| DomainError::invalid_argument(format!("invalid amount {amount:?}: {e}")))?;
        Self::new(amount, currency)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Sum of two amounts in the same currency.
    pub fn add(&self, other: &Money) -> DomainResult<Money> {
        if self.currency != other.currency {
            return Err(DomainError::invalid_argument(format!(
                "cannot add amounts in different currencies (current: {}, other: {})",
                self.currency, other.currency
            )));
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| DomainError::invalid_argument("amount overflow"))?;
        Ok(Self {
            amount,
            currency: self.currency,
        })
    }

    /// Scale the amount by `factor`, keeping the currency.
    ///
    /// A negative factor would produce a negative amount and is rejected.
    pub fn multiply(&self, factor: Decimal) -> DomainResult<Money> {
        let amount = self
            .amount
            .checked_mul(factor)
            .ok_or_else(|| DomainError::invalid_argument("amount overflow"))?;
        Self::new(amount, self.currency)
    }
}

impl ValueObject for Money {}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use proptest::prelude::*;

    fn eur(s: &str) -> Money {
        Money::parse(s, "EUR").unwrap()
    }

    #[test]
    fn creates_money_with_valid_amount_and_currency() {
        let m = eur("100.50");
        assert_eq!(m.amount(), Decimal::new(10050, 2));
        assert_eq!(m.currency(), Currency::EUR);
    }

    #[test]
    fn negative_amount_is_rejected() {
        let err = Money::new(Decimal::new(-10000, 2), Currency::EUR).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn zero_is_allowed_and_is_the_identity_for_add() {
        let zero = Money::zero(Currency::EUR);
        assert!(zero.is_zero());
        assert_eq!(zero.add(&eur("100.00")).unwrap(), eur("100.00"));
    }

    #[test]
    fn add_with_same_currency() {
        let total = eur("100.00").add(&eur("50.00")).unwrap();
        assert_eq!(total, eur("150.00"));
        assert_eq!(total.currency(), Currency::EUR);
    }

    #[test]
    fn add_with_different_currency_fails() {
        let usd = Money::parse("100.00", "USD").unwrap();
        let err = eur("100.00").add(&usd).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("different currencies"));
    }

    #[test]
    fn multiply_by_factor() {
        let result = eur("100.00").multiply(Decimal::new(25, 1)).unwrap();
        assert_eq!(result, eur("250.00"));
        assert_eq!(result.currency(), Currency::EUR);
    }

    #[test]
    fn multiply_by_negative_factor_fails() {
        let err = eur("1.00").multiply(Decimal::NEGATIVE_ONE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn add_keeps_full_precision() {
        let total = eur("100.123").add(&eur("200.456")).unwrap();
        assert_eq!(total.amount(), Decimal::new(300579, 3));
    }

    #[test]
    fn overflow_is_reported_not_wrapped() {
        let max = Money::new(Decimal::MAX, Currency::EUR).unwrap();
        assert_eq!(max.add(&eur("1")).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            max.multiply(Decimal::TWO).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Money::parse("ten", "EUR").is_err());
        assert!(Money::parse("10", "XYZ").is_err());
        assert!(Money::parse("-1", "EUR").is_err());
    }

    #[test]
    fn display_shows_amount_and_code() {
        assert_eq!(eur("21.00").to_string(), "21.00 EUR");
    }

    #[test]
    fn deserialization_validates() {
        let ok: Money = serde_json::from_str(r#"{"amount":"10.50","currency":"eur"}"#).unwrap();
        assert_eq!(ok, eur("10.50"));

        let negative = serde_json::from_str::<Money>(r#"{"amount":"-1","currency":"EUR"}"#);
        assert!(negative.is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: summing cent amounts one by one is exact (no drift).
        #[test]
        fn repeated_addition_is_exact(cents in prop::collection::vec(0i64..1_000_000i64, 1..50)) {
            let mut total = Money::zero(Currency::EUR);
            for c in &cents {
                total = total.add(&Money::new(Decimal::new(*c, 2), Currency::EUR).unwrap()).unwrap();
            }
            let expected: i64 = cents.iter().sum();
            prop_assert_eq!(total.amount(), Decimal::new(expected, 2));
        }
    }
}
