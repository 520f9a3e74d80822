//! Sale records and the factory that keeps their derived fields consistent.

use serde::{Deserialize, Serialize};

use crate::{Error, segment::PriceSegment};

/// Identifier assigned to a sale by the record store.
///
/// Zero means the sale has not been stored yet.
pub type SaleId = i64;

/// The most units a single sale may record.
pub const MAX_QUANTITY: i64 = i32::MAX as i64;

/// The fields a user enters for a sale.
///
/// Turned into a [SaleRecord] with [SaleRecord::create], which computes the
/// derived total value and price segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    /// When the sale happened, milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// The brand as entered, e.g. "Samsung" or "Nokia".
    pub brand: String,
    /// The device model, e.g. "Galaxy S24".
    pub model: String,
    /// The device variant, e.g. "8/256".
    pub variant: String,
    /// Price of a single unit.
    pub unit_price: f64,
    /// Number of units sold.
    pub quantity: i64,
}

impl NewSale {
    /// Create the raw fields for a sale.
    pub fn new(
        timestamp: i64,
        brand: &str,
        model: &str,
        variant: &str,
        unit_price: f64,
        quantity: i64,
    ) -> Self {
        Self {
            timestamp,
            brand: brand.to_owned(),
            model: model.to_owned(),
            variant: variant.to_owned(),
            unit_price,
            quantity,
        }
    }
}

/// A sale of one or more units of a device.
///
/// The fields are private so that `total_value` and `segment` can only be set
/// by [SaleRecord::create] or [SaleRecord::update].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleRecord {
    id: SaleId,
    timestamp: i64,
    brand: String,
    model: String,
    variant: String,
    unit_price: f64,
    quantity: i64,
    total_value: f64,
    segment: PriceSegment,
}

impl SaleRecord {
    /// Build a record that has not been stored yet.
    ///
    /// # Errors
    /// Returns [Error::NegativePrice] if the unit price is negative,
    /// [Error::InvalidPrice] if the unit price or total value is not finite,
    /// or [Error::InvalidQuantity] if the quantity is less than one or more
    /// than [MAX_QUANTITY].
    pub fn create(sale: NewSale) -> Result<Self, Error> {
        Self::with_id(0, sale)
    }

    /// Build a record with the ID assigned by the record store.
    ///
    /// # Errors
    /// See [SaleRecord::create].
    pub fn with_id(id: SaleId, sale: NewSale) -> Result<Self, Error> {
        if !(1..=MAX_QUANTITY).contains(&sale.quantity) {
            return Err(Error::InvalidQuantity(sale.quantity));
        }

        let segment = PriceSegment::classify(sale.unit_price)?;
        let total_value = sale.unit_price * sale.quantity as f64;

        if !total_value.is_finite() {
            return Err(Error::InvalidPrice(sale.unit_price));
        }

        Ok(Self {
            id,
            timestamp: sale.timestamp,
            brand: sale.brand,
            model: sale.model,
            variant: sale.variant,
            unit_price: sale.unit_price,
            quantity: sale.quantity,
            total_value,
            segment,
        })
    }

    /// Replace the entered fields of this sale, keeping its ID.
    ///
    /// # Errors
    /// See [SaleRecord::create].
    pub fn update(&self, sale: NewSale) -> Result<Self, Error> {
        Self::with_id(self.id, sale)
    }

    /// The entered fields of this sale.
    pub fn to_new_sale(&self) -> NewSale {
        NewSale {
            timestamp: self.timestamp,
            brand: self.brand.clone(),
            model: self.model.clone(),
            variant: self.variant.clone(),
            unit_price: self.unit_price,
            quantity: self.quantity,
        }
    }

    pub fn id(&self) -> SaleId {
        self.id
    }

    /// When the sale happened, milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Always `unit_price * quantity`.
    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    /// Always the segment of `unit_price`.
    pub fn segment(&self) -> PriceSegment {
        self.segment
    }

    /// The unit price recomputed from the total value.
    ///
    /// Returns `None` for records without units, which are left out of every
    /// rollup.
    pub fn effective_unit_price(&self) -> Option<f64> {
        (self.quantity > 0).then(|| self.total_value / self.quantity as f64)
    }

    /// Whether the sale counts towards totals.
    pub(crate) fn has_units(&self) -> bool {
        self.quantity > 0
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        sale::{MAX_QUANTITY, NewSale, SaleRecord},
        segment::PriceSegment,
    };

    #[test]
    fn create_computes_total_and_segment() {
        let record =
            SaleRecord::create(NewSale::new(0, "Samsung", "A15", "4/128", 12_500.0, 3)).unwrap();

        assert_eq!(record.id(), 0);
        assert_eq!(record.total_value(), 37_500.0);
        assert_eq!(record.segment(), PriceSegment::From10KTo15K);
    }

    #[test]
    fn derived_fields_hold_for_many_inputs() {
        for price in [0.0, 9_999.5, 10_000.0, 45_000.0, 250_000.0] {
            for quantity in [1, 2, 7] {
                let record =
                    SaleRecord::create(NewSale::new(0, "Vivo", "Y", "", price, quantity)).unwrap();

                assert_eq!(record.total_value(), price * quantity as f64);
                assert_eq!(record.segment(), PriceSegment::classify(price).unwrap());
            }
        }
    }

    #[test]
    fn create_rejects_negative_price() {
        let result = SaleRecord::create(NewSale::new(0, "Apple", "15", "", -1.0, 1));

        assert_eq!(result, Err(Error::NegativePrice(-1.0)));
    }

    #[test]
    fn create_rejects_zero_quantity() {
        let result = SaleRecord::create(NewSale::new(0, "Apple", "15", "", 1.0, 0));

        assert_eq!(result, Err(Error::InvalidQuantity(0)));
    }

    #[test]
    fn create_rejects_quantity_above_limit() {
        let result = SaleRecord::create(NewSale::new(0, "Apple", "15", "", 1.0, i64::MAX));

        assert_eq!(result, Err(Error::InvalidQuantity(i64::MAX)));
        assert!(SaleRecord::create(NewSale::new(0, "Apple", "15", "", 1.0, MAX_QUANTITY)).is_ok());
    }

    #[test]
    fn create_rejects_infinite_price_and_total() {
        let infinite = SaleRecord::create(NewSale::new(0, "Apple", "15", "", f64::INFINITY, 1));
        let overflowing = SaleRecord::create(NewSale::new(0, "Apple", "15", "", f64::MAX, 2));

        assert_eq!(infinite, Err(Error::InvalidPrice(f64::INFINITY)));
        assert_eq!(overflowing, Err(Error::InvalidPrice(f64::MAX)));
    }

    #[test]
    fn update_preserves_id_and_recomputes_segment() {
        let record =
            SaleRecord::with_id(42, NewSale::new(0, "Oppo", "A78", "", 9_000.0, 1)).unwrap();
        let mut changed = record.to_new_sale();
        changed.unit_price = 21_000.0;
        changed.quantity = 2;

        let updated = record.update(changed).unwrap();

        assert_eq!(updated.id(), 42);
        assert_eq!(updated.total_value(), 42_000.0);
        assert_eq!(updated.segment(), PriceSegment::From20KTo30K);
    }

    #[test]
    fn effective_unit_price_divides_total_by_quantity() {
        let record =
            SaleRecord::create(NewSale::new(0, "Realme", "12", "", 15_000.0, 4)).unwrap();

        assert_eq!(record.effective_unit_price(), Some(15_000.0));
    }
}
