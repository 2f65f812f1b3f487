use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A single inventory record. The persisted collection is a JSON array of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Opaque unique identifier, assigned at creation and immutable afterwards
    #[schema(example = "3d9f2c7a-5b1e-4f60-9c2d-8a4b7e1f0c53")]
    pub id: String,
    #[schema(example = "Widget")]
    pub product_name: String,
    #[schema(example = 5)]
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 2.5)]
    pub price: Decimal,
    /// Creation instant, never touched by updates
    pub datetime: DateTime<Utc>,
    /// Derived quantity × price, recomputed on every create and update
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 12.5)]
    pub total_value: Decimal,
}

/// Validated input for creating or updating a record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub product_name: String,
    pub quantity: i64,
    pub price: Decimal,
}

/// Quantity times price does not fit in a `Decimal`
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("total_value exceeds the supported numeric range")]
pub struct TotalOverflow;

impl ProductInput {
    /// Derived stock value; `None` when the multiplication overflows
    pub fn total_value(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.price)
    }
}

impl Product {
    /// Builds a fresh record from validated input, assigning id and creation time
    pub fn create(input: ProductInput) -> Result<Self, TotalOverflow> {
        let total_value = input.total_value().ok_or(TotalOverflow)?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            product_name: input.product_name,
            quantity: input.quantity,
            price: input.price,
            datetime: Utc::now(),
            total_value,
        })
    }

    /// Applies validated input in place; `id` and `datetime` are preserved.
    /// Nothing is touched when the new total overflows.
    pub fn apply(&mut self, input: ProductInput) -> Result<(), TotalOverflow> {
        let total_value = input.total_value().ok_or(TotalOverflow)?;
        self.product_name = input.product_name;
        self.quantity = input.quantity;
        self.price = input.price;
        self.total_value = total_value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn widget_input() -> ProductInput {
        ProductInput {
            product_name: "Widget".into(),
            quantity: 5,
            price: dec!(2.50),
        }
    }

    // Large enough that multiplying by any quantity above one overflows
    fn oversized_input() -> ProductInput {
        ProductInput {
            product_name: "Bulk".into(),
            quantity: i64::MAX,
            price: dec!(10_000_000_000),
        }
    }

    #[test]
    fn total_value_is_quantity_times_price() {
        assert_eq!(widget_input().total_value(), Some(dec!(12.50)));

        let zero = ProductInput {
            quantity: 0,
            ..widget_input()
        };
        assert_eq!(zero.total_value(), Some(dec!(0)));
    }

    #[test]
    fn create_assigns_id_timestamp_and_total() {
        let before = Utc::now();
        let product = Product::create(widget_input()).unwrap();

        assert!(!product.id.is_empty());
        assert_eq!(product.total_value, dec!(12.50));
        assert!(product.datetime >= before);
        assert!(product.datetime <= Utc::now());
    }

    #[test]
    fn created_ids_are_unique() {
        let a = Product::create(widget_input()).unwrap();
        let b = Product::create(widget_input()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn overflowing_totals_are_rejected_not_computed() {
        assert_eq!(oversized_input().total_value(), None);
        assert_eq!(Product::create(oversized_input()), Err(TotalOverflow));
    }

    #[test]
    fn apply_preserves_id_and_datetime() {
        let mut product = Product::create(widget_input()).unwrap();
        let id = product.id.clone();
        let datetime = product.datetime;

        product
            .apply(ProductInput {
                product_name: "Widget Pro".into(),
                quantity: 10,
                price: dec!(2.50),
            })
            .unwrap();

        assert_eq!(product.id, id);
        assert_eq!(product.datetime, datetime);
        assert_eq!(product.product_name, "Widget Pro");
        assert_eq!(product.quantity, 10);
        assert_eq!(product.total_value, dec!(25.00));
    }

    #[test]
    fn failed_apply_leaves_the_record_alone() {
        let mut product = Product::create(widget_input()).unwrap();
        let original = product.clone();

        assert_eq!(product.apply(oversized_input()), Err(TotalOverflow));
        assert_eq!(product, original);
    }

    #[test]
    fn wire_shape_uses_plain_numbers() {
        let product = Product::create(widget_input()).unwrap();
        let value = serde_json::to_value(&product).unwrap();

        assert!(value["price"].is_number());
        assert!(value["total_value"].is_number());
        assert_eq!(value["total_value"], serde_json::json!(12.5));
        assert!(value["quantity"].is_i64());

        let datetime = value["datetime"].as_str().unwrap();
        chrono::DateTime::parse_from_rfc3339(datetime).unwrap();
    }

    #[test]
    fn records_round_trip_through_json() {
        let product = Product::create(widget_input()).unwrap();
        let json = serde_json::to_string(&product).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, product);
    }
}
