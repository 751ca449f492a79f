use serde::{Deserialize, Serialize};

/// One product card from a listing page. Field order matches the CSV header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub rating: u32,
    pub num_of_reviews: u32,
}

/// CSV header row; must stay in sync with the field order on `Product`.
pub const PRODUCT_FIELDS: [&str; 5] = ["title", "description", "price", "rating", "num_of_reviews"];
