use serde::{Deserialize, Serialize};

use orderdesk_core::{DomainError, DomainResult, ValueObject};

/// Shipping address. Every field is required and non-blank.
///
/// Immutable: an order replaces its address wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAddress")]
pub struct Address {
    street: String,
    city: String,
    postal_code: String,
    country: String,
}

#[derive(Deserialize)]
struct RawAddress {
    street: String,
    city: String,
    postal_code: String,
    country: String,
}

impl TryFrom<RawAddress> for Address {
    type Error = DomainError;

    fn try_from(raw: RawAddress) -> Result<Self, Self::Error> {
        Address::new(raw.street, raw.city, raw.postal_code, raw.country)
    }
}

fn non_blank(value: String, field: &str) -> DomainResult<String> {
    if value.trim().is_empty() {
        return Err(DomainError::invalid_argument(format!("{field} cannot be blank")));
    }
    Ok(value)
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> DomainResult<Self> {
        Ok(Self {
            street: non_blank(street.into(), "street")?,
            city: non_blank(city.into(), "city")?,
            postal_code: non_blank(postal_code.into(), "postal_code")?,
            country: non_blank(country.into(), "country")?,
        })
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

impl ValueObject for Address {}

#[cfg(test)]
mod tests {
    use super::*;
    use orderdesk_core::ErrorKind;

    #[test]
    fn builds_with_all_fields() {
        let a = Address::new("Calle Falsa 123", "Springfield", "12345", "España").unwrap();
        assert_eq!(a.street(), "Calle Falsa 123");
        assert_eq!(a.city(), "Springfield");
        assert_eq!(a.postal_code(), "12345");
        assert_eq!(a.country(), "España");
    }

    #[test]
    fn each_blank_field_is_rejected_by_name() {
        let cases = [
            (Address::new(" ", "c", "p", "x"), "street"),
            (Address::new("s", "", "p", "x"), "city"),
            (Address::new("s", "c", "\t", "x"), "postal_code"),
            (Address::new("s", "c", "p", "   "), "country"),
        ];
        for (result, field) in cases {
            let err = result.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
            assert!(err.to_string().contains(field), "{err}");
        }
    }

    #[test]
    fn deserialization_validates() {
        let json = r#"{"street":"s","city":"","postal_code":"p","country":"x"}"#;
        assert!(serde_json::from_str::<Address>(json).is_err());
    }
}
