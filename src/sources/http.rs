use crate::domain::{FilterState, ProductRecord};
use crate::error::{DashboardError, Result};
use crate::sources::ProductSource;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Catalog source backed by the HTTP query API.
pub struct HttpProductSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProductSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn query_params(filters: &FilterState) -> [(&'static str, String); 4] {
        [
            ("min_price", filters.min_price.to_string()),
            ("max_price", filters.max_price.to_string()),
            ("min_rating", filters.min_rating.to_string()),
            ("min_reviews", filters.min_reviews.to_string()),
        ]
    }
}

/// Map one wire object to a record. Missing or wrong-typed numeric fields
/// contribute 0 so a single malformed record cannot poison the page.
pub fn record_from_wire(raw: &Value) -> ProductRecord {
    ProductRecord {
        id: raw["id"].as_u64().unwrap_or_default(),
        name: raw["name"].as_str().unwrap_or_default().to_string(),
        price: raw["price"].as_f64().unwrap_or_default(),
        discounted_price: raw["discounted_price"].as_f64().unwrap_or_default(),
        rating: raw["rating"].as_f64().unwrap_or_default(),
        reviews_count: raw["reviews_count"].as_u64().unwrap_or_default() as u32,
    }
}

#[async_trait::async_trait]
impl ProductSource for HttpProductSource {
    fn source_name(&self) -> &'static str {
        "catalog_http"
    }

    #[instrument(skip(self, filters))]
    async fn fetch_products(&self, filters: &FilterState) -> Result<Vec<ProductRecord>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&Self::query_params(filters))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Api {
                message: format!("catalog responded with status {}", status.as_u16()),
            });
        }

        // A null or absent body is an empty catalog page, not an error.
        let body = response.text().await?;
        if body.trim().is_empty() {
            warn!("Catalog returned an empty body, treating as empty collection");
            return Ok(Vec::new());
        }
        let wire: Option<Vec<Value>> = serde_json::from_str(&body)?;
        let products: Vec<ProductRecord> = wire
            .unwrap_or_default()
            .iter()
            .map(record_from_wire)
            .collect();

        debug!("Fetched {} products from catalog", products.len());
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_defaults_cover_missing_and_mistyped_fields() {
        let raw = json!({"id": 7, "name": "Bare", "price": "not-a-number"});
        let record = record_from_wire(&raw);
        assert_eq!(record.id, 7);
        assert_eq!(record.name, "Bare");
        assert_eq!(record.price, 0.0);
        assert_eq!(record.discounted_price, 0.0);
        assert_eq!(record.rating, 0.0);
        assert_eq!(record.reviews_count, 0);
    }

    #[test]
    fn wire_mapping_reads_snake_case_names() {
        let raw = json!({
            "id": 1,
            "name": "Widget",
            "price": 1200.0,
            "discounted_price": 1000.0,
            "rating": 4.5,
            "reviews_count": 80
        });
        let record = record_from_wire(&raw);
        assert_eq!(record.discounted_price, 1000.0);
        assert_eq!(record.reviews_count, 80);
        assert_eq!(record.discount(), 200.0);
    }

    #[test]
    fn query_params_use_wire_names() {
        let filters = FilterState {
            min_price: 100.0,
            max_price: 5000.0,
            min_rating: 3.5,
            min_reviews: 20,
        };
        let params = HttpProductSource::query_params(&filters);
        assert_eq!(params[0], ("min_price", "100".to_string()));
        assert_eq!(params[1], ("max_price", "5000".to_string()));
        assert_eq!(params[2], ("min_rating", "3.5".to_string()));
        assert_eq!(params[3], ("min_reviews", "20".to_string()));
    }
}
