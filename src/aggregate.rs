//! Pure derivations over the committed product collection: rollup stats,
//! the price-distribution histogram, and the discount line series.
//!
//! Everything here is a free function of its input with no I/O, so the same
//! collection always produces bit-identical output and results can be
//! memoized by the generation counter the coordinator stamps on each commit.

use crate::domain::{AggregateStats, ChartSeries, ProductRecord};

/// Upper edges of the price buckets; the last bucket is open-ended.
const PRICE_BUCKET_EDGES: [f64; 5] = [0.0, 1000.0, 3000.0, 5000.0, 10_000.0];
const PRICE_BUCKET_LABELS: [&str; 5] = ["0-1k", "1k-3k", "3k-5k", "5k-10k", "10k+"];

/// How many leading products feed the discount series.
const DISCOUNT_SAMPLE_LEN: usize = 15;
/// Label truncation width, in characters.
const LABEL_WIDTH: usize = 15;

/// Rollup statistics. With an empty collection every average is defined as
/// exactly 0 (the denominator is floored to 1), never NaN.
pub fn summary_stats(products: &[ProductRecord]) -> AggregateStats {
    let denominator = products.len().max(1) as f64;
    AggregateStats {
        total: products.len(),
        avg_price: products.iter().map(|p| p.price).sum::<f64>() / denominator,
        avg_discount: products.iter().map(|p| p.discount()).sum::<f64>() / denominator,
        avg_rating: products.iter().map(|p| p.rating).sum::<f64>() / denominator,
    }
}

/// Price-distribution histogram over fixed buckets
/// `(0, 1k], (1k, 3k], (3k, 5k], (5k, 10k], (10k, inf)`.
///
/// A product lands in the first bucket whose range holds
/// `edge[i] < price <= edge[i + 1]`, so boundary prices fall into the lower
/// bucket and a price of exactly 0 is counted nowhere.
pub fn price_histogram(products: &[ProductRecord]) -> ChartSeries {
    let mut counts = [0u64; PRICE_BUCKET_LABELS.len()];

    for product in products {
        for (i, count) in counts.iter_mut().enumerate() {
            let upper = PRICE_BUCKET_EDGES
                .get(i + 1)
                .copied()
                .unwrap_or(f64::INFINITY);
            if product.price > PRICE_BUCKET_EDGES[i] && product.price <= upper {
                *count += 1;
                break;
            }
        }
    }

    ChartSeries {
        labels: PRICE_BUCKET_LABELS.iter().map(|s| s.to_string()).collect(),
        values: counts.iter().map(|&c| c as f64).collect(),
    }
}

/// Discount series over the first 15 products in collection order.
///
/// Not a top-N selection: the sample is whatever leads the collection as
/// received. Labels are names truncated to 15 characters with an ellipsis
/// marker when truncation occurred.
pub fn discount_series(products: &[ProductRecord]) -> ChartSeries {
    let sample = &products[..products.len().min(DISCOUNT_SAMPLE_LEN)];

    ChartSeries {
        labels: sample.iter().map(|p| truncate_label(&p.name)).collect(),
        values: sample.iter().map(|p| p.discount().round()).collect(),
    }
}

fn truncate_label(name: &str) -> String {
    let mut chars = name.chars();
    let truncated: String = chars.by_ref().take(LABEL_WIDTH).collect();
    if chars.next().is_some() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}

/// All three derivations bundled for one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedViews {
    pub stats: AggregateStats,
    pub price_histogram: ChartSeries,
    pub discount_series: ChartSeries,
}

pub fn derive_views(products: &[ProductRecord]) -> DerivedViews {
    DerivedViews {
        stats: summary_stats(products),
        price_histogram: price_histogram(products),
        discount_series: discount_series(products),
    }
}

/// Memo over [`derive_views`] keyed by the coordinator's commit generation.
/// Recomputation happens only when the generation changes; repeated reads
/// for the same generation return the cached derivations untouched.
#[derive(Debug, Default)]
pub struct AggregateCache {
    cached: Option<(u64, DerivedViews)>,
}

impl AggregateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(&mut self, generation: u64, products: &[ProductRecord]) -> &DerivedViews {
        let stale = match &self.cached {
            Some((cached_generation, _)) => *cached_generation != generation,
            None => true,
        };
        if stale {
            self.cached = Some((generation, derive_views(products)));
        }
        // The option was just populated on the stale path.
        &self.cached.as_ref().unwrap().1
    }
}
