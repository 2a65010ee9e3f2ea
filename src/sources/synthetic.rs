use crate::domain::{FilterState, ProductRecord};
use crate::error::Result;
use crate::sources::ProductSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

const SAMPLE_NAMES: [&str; 12] = [
    "Wireless Earbuds Pro",
    "Ceramic Mug",
    "Trail Running Shoes",
    "Mechanical Keyboard",
    "Desk Lamp",
    "Insulated Water Bottle",
    "Yoga Mat",
    "Phone Stand",
    "Noise Cancelling Headphones",
    "Leather Wallet",
    "Portable Charger",
    "Standing Desk Converter",
];

/// In-process catalog that generates a plausible product page for any
/// filter combination. Used by the offline demo and by tests that need a
/// backend with controllable latency.
pub struct SyntheticProductSource {
    rng: Mutex<StdRng>,
    catalog_size: usize,
    fetches: AtomicUsize,
    /// Artificial latency per fetch, to make overlapping requests visible.
    pub latency: Duration,
}

impl SyntheticProductSource {
    pub fn new(seed: u64, catalog_size: usize) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            catalog_size,
            fetches: AtomicUsize::new(0),
            latency: Duration::from_millis(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn generate_catalog(&self) -> Vec<ProductRecord> {
        let mut rng = self.rng.lock().unwrap();
        (0..self.catalog_size)
            .map(|i| {
                let price = rng.gen_range(100.0..20_000.0_f64).round();
                let discount_pct = rng.gen_range(0.0..0.4_f64);
                ProductRecord {
                    id: i as u64 + 1,
                    name: format!(
                        "{} #{}",
                        SAMPLE_NAMES[i % SAMPLE_NAMES.len()],
                        i / SAMPLE_NAMES.len() + 1
                    ),
                    price,
                    discounted_price: (price * (1.0 - discount_pct)).round(),
                    rating: (rng.gen_range(1.0..5.0_f64) * 10.0).round() / 10.0,
                    reviews_count: rng.gen_range(0..1200),
                }
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl ProductSource for SyntheticProductSource {
    fn source_name(&self) -> &'static str {
        "synthetic"
    }

    async fn fetch_products(&self, filters: &FilterState) -> Result<Vec<ProductRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        // Apply the same range semantics the real catalog server does.
        let products: Vec<ProductRecord> = self
            .generate_catalog()
            .into_iter()
            .filter(|p| {
                p.price >= filters.min_price
                    && p.price <= filters.max_price
                    && p.rating >= filters.min_rating
                    && p.reviews_count >= filters.min_reviews
            })
            .collect();

        debug!("Synthetic catalog produced {} products", products.len());
        Ok(products)
    }
}
