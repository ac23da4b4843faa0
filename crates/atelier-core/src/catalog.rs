//! In-memory catalog transforms: filtering and sorting.
//!
//! Everything here is pure and copy-producing. Screens own the fetched
//! product list for their lifetime, so these functions never mutate or
//! reorder the caller's data behind its back.

use crate::models::Product;

/// Conjunctive filter over a product list
///
/// `brand: None` means "All"; empty `text` matches everything.
#[derive(Debug, Clone)]
pub struct FilterSpec {
    pub brand: Option<String>,
    pub text: String,
    pub on_sale_only: bool,
    pub min_price: f64,
    pub max_price: f64,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            brand: None,
            text: String::new(),
            on_sale_only: false,
            min_price: 0.0,
            max_price: f64::INFINITY,
        }
    }
}

impl FilterSpec {
    fn matches(&self, product: &Product) -> bool {
        if let Some(ref brand) = self.brand {
            if &product.brand != brand {
                return false;
            }
        }

        if !self.text.is_empty() {
            let needle = self.text.to_lowercase();
            let in_name = product.art_name.to_lowercase().contains(&needle);
            let in_brand = product.brand.to_lowercase().contains(&needle);
            if !in_name && !in_brand {
                return false;
            }
        }

        if self.on_sale_only && !product.is_on_sale() {
            return false;
        }

        product.price >= self.min_price && product.price <= self.max_price
    }
}

/// Narrow a product list to the subsequence matching `spec`.
///
/// Stable: survivors keep their input order.
pub fn filter(products: &[Product], spec: &FilterSpec) -> Vec<Product> {
    products
        .iter()
        .filter(|p| spec.matches(p))
        .cloned()
        .collect()
}

/// Sort order for a (usually already filtered) product list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Leave the input order alone
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    /// Most-reviewed first
    Reviews,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "default" => Some(Self::Default),
            "price-asc" => Some(Self::PriceAsc),
            "price-desc" => Some(Self::PriceDesc),
            "reviews" => Some(Self::Reviews),
            _ => None,
        }
    }
}

/// Order a product list by `key`, ties broken by input order.
///
/// Always returns a fresh Vec; the input slice is never reordered.
pub fn sort(products: &[Product], key: SortKey) -> Vec<Product> {
    let mut sorted: Vec<Product> = products.to_vec();
    match key {
        SortKey::Default => {}
        SortKey::PriceAsc => {
            // sort_by is stable, so equal prices keep input order
            sorted.sort_by(|a, b| {
                a.price
                    .partial_cmp(&b.price)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        SortKey::PriceDesc => {
            sorted.sort_by(|a, b| {
                b.price
                    .partial_cmp(&a.price)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        SortKey::Reviews => {
            sorted.sort_by(|a, b| b.review_count().cmp(&a.review_count()));
        }
    }
    sorted
}
