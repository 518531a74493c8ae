use rust_decimal::Decimal;

use orderdesk_core::{DomainError, DomainResult, Entity, Money, ProductRef};

/// Order line: product, quantity, unit price.
///
/// Identified by its product within the owning order. The unit price is the
/// price at time of purchase and never changes; only the quantity can be
/// adjusted, and only by the owning [`crate::Order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    product: ProductRef,
    quantity: u32,
    unit_price: Money,
}

fn positive(quantity: u32) -> DomainResult<u32> {
    if quantity == 0 {
        return Err(DomainError::invalid_argument("quantity must be positive"));
    }
    Ok(quantity)
}

impl OrderLine {
    pub(crate) fn new(product: ProductRef, quantity: u32, unit_price: Money) -> DomainResult<Self> {
        Ok(Self {
            product,
            quantity: positive(quantity)?,
            unit_price,
        })
    }

    pub fn product(&self) -> ProductRef {
        self.product
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> &Money {
        &self.unit_price
    }

    /// `unit_price × quantity`, in the unit price's currency.
    pub fn subtotal(&self) -> DomainResult<Money> {
        self.unit_price.multiply(Decimal::from(self.quantity))
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) -> DomainResult<()> {
        self.quantity = positive(quantity)?;
        Ok(())
    }

    pub(crate) fn increase_quantity(&mut self, by: u32) -> DomainResult<()> {
        let quantity = self
            .quantity
            .checked_add(by)
            .ok_or_else(|| DomainError::invalid_argument("quantity overflow"))?;
        self.set_quantity(quantity)
    }
}

impl Entity for OrderLine {
    type Id = ProductRef;

    fn id(&self) -> &Self::Id {
        &self.product
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderdesk_core::ErrorKind;

    fn price(s: &str) -> Money {
        Money::parse(s, "EUR").unwrap()
    }

    #[test]
    fn subtotal_is_price_times_quantity() {
        let line = OrderLine::new(ProductRef::new(), 3, price("10.50")).unwrap();
        assert_eq!(line.subtotal().unwrap(), price("31.50"));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let err = OrderLine::new(ProductRef::new(), 0, price("1")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let mut line = OrderLine::new(ProductRef::new(), 1, price("1")).unwrap();
        assert!(line.set_quantity(0).is_err());
        assert_eq!(line.quantity(), 1);
    }

    #[test]
    fn increase_quantity_detects_overflow() {
        let mut line = OrderLine::new(ProductRef::new(), u32::MAX, price("1")).unwrap();
        assert!(line.increase_quantity(1).is_err());
        assert_eq!(line.quantity(), u32::MAX);
    }

    #[test]
    fn identity_is_the_product() {
        let product = ProductRef::new();
        let line = OrderLine::new(product, 1, price("1")).unwrap();
        assert_eq!(*line.id(), product);
    }
}
