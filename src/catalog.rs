//! Catalog
//!
//! An immutable snapshot of what the bar can sell, built from the product records the backend
//! returns. Each record is checked at this boundary and every variation gains its tax-inclusive
//! price, which the backend does not send.

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::{PriceError, money, tax_inclusive};

/// Product identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Variation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariationId(pub u32);

impl Display for VariationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Errors raised while building a catalog from backend records.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// A variation is nested under a product it does not belong to.
    #[error("variation {variation} belongs to product {found}, but is listed under {expected}")]
    ForeignVariation {
        /// Offending variation
        variation: VariationId,

        /// Product the variation was listed under
        expected: ProductId,

        /// Product the variation claims to belong to
        found: ProductId,
    },

    /// The same variation appears twice in the snapshot.
    #[error("variation {0} is listed more than once")]
    DuplicateVariation(VariationId),

    /// A tax-inclusive price could not be derived.
    #[error(transparent)]
    Price(#[from] PriceError),
}

/// Product as sent by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Stock shared by all variations of the product
    pub stock_quantity: i64,

    /// Orderable variations
    #[serde(default)]
    pub variations: Vec<VariationRecord>,
}

/// Variation as sent by the backend, without its tax-inclusive price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationRecord {
    /// Variation identifier
    pub id: VariationId,

    /// Display name, may be empty
    #[serde(default)]
    pub name: String,

    /// Owning product
    pub product_id: ProductId,

    /// Pre-tax price in minor units
    pub price_ht: i64,

    /// Tax rate, e.g. `0.2`
    #[serde(with = "rust_decimal::serde::float")]
    pub tva: Decimal,

    /// Stock units consumed per unit ordered
    #[serde(with = "rust_decimal::serde::float")]
    pub volume: Decimal,

    /// Whether the variation can currently be ordered
    pub available_to_order: bool,
}

/// A purchasable variation of a product.
#[derive(Debug, Clone, PartialEq)]
pub struct Variation {
    id: VariationId,
    product_id: ProductId,
    name: String,
    price_ht: i64,
    price_ttc: i64,
    tva: Decimal,
    volume: Decimal,
    available_to_order: bool,
}

impl Variation {
    /// Builds a variation from its record, deriving the tax-inclusive price.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if the tax-inclusive price is out of range.
    pub fn try_from_record(record: VariationRecord) -> Result<Self, PriceError> {
        let price_ttc = tax_inclusive(record.price_ht, record.tva)?;

        Ok(Self {
            id: record.id,
            product_id: record.product_id,
            name: record.name,
            price_ht: record.price_ht,
            price_ttc,
            tva: record.tva,
            volume: record.volume,
            available_to_order: record.available_to_order,
        })
    }

    /// Variation identifier
    pub fn id(&self) -> VariationId {
        self.id
    }

    /// Owning product
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pre-tax price
    pub fn price_ht(&self) -> Money<'static, Currency> {
        money(self.price_ht)
    }

    /// Tax-inclusive price
    pub fn price_ttc(&self) -> Money<'static, Currency> {
        money(self.price_ttc)
    }

    /// Tax-inclusive price in minor units
    pub fn price_ttc_minor(&self) -> i64 {
        self.price_ttc
    }

    /// Tax rate
    pub fn tva(&self) -> Decimal {
        self.tva
    }

    /// Stock units consumed per unit ordered
    pub fn volume(&self) -> Decimal {
        self.volume
    }

    /// Whether the variation can currently be ordered
    pub fn available_to_order(&self) -> bool {
        self.available_to_order
    }
}

/// A product and its variations.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    stock_quantity: i64,
    variations: Vec<Variation>,
}

impl Product {
    /// Builds a product from its record.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a variation does not belong to this product or its price
    /// cannot be derived.
    pub fn try_from_record(record: ProductRecord) -> Result<Self, CatalogError> {
        let variations = record
            .variations
            .into_iter()
            .map(|variation| {
                if variation.product_id != record.id {
                    return Err(CatalogError::ForeignVariation {
                        variation: variation.id,
                        expected: record.id,
                        found: variation.product_id,
                    });
                }

                Ok(Variation::try_from_record(variation)?)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: record.id,
            name: record.name,
            description: record.description,
            stock_quantity: record.stock_quantity,
            variations,
        })
    }

    /// Product identifier
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Stock ceiling shared by every variation
    pub fn stock_quantity(&self) -> i64 {
        self.stock_quantity
    }

    /// Variations, in snapshot order
    pub fn variations(&self) -> &[Variation] {
        &self.variations
    }

    /// Name shown on order lines for one of this product's variations.
    pub fn item_name(&self, variation: &Variation) -> String {
        line_item_name(&self.name, variation.name())
    }
}

/// `"<product> (<variation>)"`, or the product name alone for an unnamed variation.
pub(crate) fn line_item_name(product: &str, variation: &str) -> String {
    if variation.is_empty() {
        product.to_string()
    } else {
        format!("{product} ({variation})")
    }
}

/// Catalog snapshot
///
/// An empty catalog means nothing can be ordered right now; it is also what callers fall back to
/// when the catalog could not be read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a snapshot from backend records, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a variation is misplaced or duplicated, or a price cannot be
    /// derived.
    pub fn try_from_records(
        records: impl IntoIterator<Item = ProductRecord>,
    ) -> Result<Self, CatalogError> {
        let products = records
            .into_iter()
            .map(Product::try_from_record)
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = FxHashSet::default();

        for variation in products.iter().flat_map(Product::variations) {
            if !seen.insert(variation.id()) {
                return Err(CatalogError::DuplicateVariation(variation.id()));
            }
        }

        Ok(Self { products })
    }

    /// Products in snapshot order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Every orderable variation with its product, in snapshot order.
    pub fn orderable(&self) -> impl Iterator<Item = (&Product, &Variation)> {
        self.products.iter().flat_map(|product| {
            product
                .variations()
                .iter()
                .filter(|variation| variation.available_to_order())
                .map(move |variation| (product, variation))
        })
    }

    /// Looks up a variation and its product.
    pub fn variation(&self, id: VariationId) -> Option<(&Product, &Variation)> {
        self.products.iter().find_map(|product| {
            product
                .variations()
                .iter()
                .find(|variation| variation.id() == id)
                .map(|variation| (product, variation))
        })
    }

    /// Whether nothing in the snapshot can be ordered.
    pub fn is_empty(&self) -> bool {
        self.orderable().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn variation(id: u32, product: u32, name: &str, price_ht: i64) -> VariationRecord {
        VariationRecord {
            id: VariationId(id),
            name: name.to_string(),
            product_id: ProductId(product),
            price_ht,
            tva: Decimal::new(2, 1),
            volume: Decimal::ONE,
            available_to_order: true,
        }
    }

    fn product(id: u32, name: &str, variations: Vec<VariationRecord>) -> ProductRecord {
        ProductRecord {
            id: ProductId(id),
            name: name.to_string(),
            description: String::new(),
            stock_quantity: 10,
            variations,
        }
    }

    #[test]
    fn records_gain_tax_inclusive_price() -> TestResult {
        let catalog = Catalog::try_from_records([product(1, "IPA", vec![
            variation(10, 1, "pint", 500),
        ])])?;

        let (_, pint) = catalog.variation(VariationId(10)).ok_or("missing variation")?;

        assert_eq!(pint.price_ttc_minor(), 600);
        assert_eq!(pint.price_ht(), money(500));

        Ok(())
    }

    #[test]
    fn foreign_variation_is_rejected() {
        let result = Catalog::try_from_records([product(1, "IPA", vec![variation(
            10, 2, "pint", 500,
        )])]);

        assert_eq!(
            result,
            Err(CatalogError::ForeignVariation {
                variation: VariationId(10),
                expected: ProductId(1),
                found: ProductId(2),
            })
        );
    }

    #[test]
    fn duplicate_variation_is_rejected() {
        let result = Catalog::try_from_records([
            product(1, "IPA", vec![variation(10, 1, "pint", 500)]),
            product(2, "Stout", vec![variation(10, 2, "pint", 500)]),
        ]);

        assert_eq!(result, Err(CatalogError::DuplicateVariation(VariationId(10))));
    }

    #[test]
    fn orderable_skips_unavailable_variations_and_keeps_order() -> TestResult {
        let mut half = variation(11, 1, "half", 300);
        half.available_to_order = false;

        let catalog = Catalog::try_from_records([
            product(1, "IPA", vec![variation(10, 1, "pint", 500), half]),
            product(2, "Stout", vec![variation(20, 2, "", 550)]),
        ])?;

        let ids: Vec<VariationId> = catalog
            .orderable()
            .map(|(_, variation)| variation.id())
            .collect();

        assert_eq!(ids, vec![VariationId(10), VariationId(20)]);

        Ok(())
    }

    #[test]
    fn catalog_without_orderable_variations_is_empty() -> TestResult {
        let mut pint = variation(10, 1, "pint", 500);
        pint.available_to_order = false;

        let catalog = Catalog::try_from_records([product(1, "IPA", vec![pint])])?;

        assert!(catalog.is_empty());
        assert!(Catalog::default().is_empty());

        Ok(())
    }

    #[test]
    fn item_name_omits_empty_variation_name() -> TestResult {
        let catalog = Catalog::try_from_records([product(1, "Stout", vec![
            variation(20, 1, "", 550),
            variation(21, 1, "half", 300),
        ])])?;

        let stout = catalog.products().first().ok_or("missing product")?;
        let names: Vec<String> = stout
            .variations()
            .iter()
            .map(|variation| stout.item_name(variation))
            .collect();

        assert_eq!(names, vec!["Stout".to_string(), "Stout (half)".to_string()]);

        Ok(())
    }

    #[test]
    fn records_parse_from_backend_json() -> TestResult {
        let json = r#"[{
            "id": 1,
            "name": "IPA",
            "description": "hoppy",
            "stock_quantity": 40,
            "variations": [{
                "id": 10,
                "name": "pint",
                "product_id": 1,
                "price_ht": 500,
                "tva": 0.2,
                "volume": 0.5,
                "available_to_order": true
            }]
        }]"#;

        let records: Vec<ProductRecord> = serde_json::from_str(json)?;
        let catalog = Catalog::try_from_records(records)?;

        let (ipa, pint) = catalog.variation(VariationId(10)).ok_or("missing variation")?;

        assert_eq!(ipa.description(), "hoppy");
        assert_eq!(pint.volume(), Decimal::new(5, 1));
        assert_eq!(pint.price_ttc_minor(), 600);

        Ok(())
    }
}
