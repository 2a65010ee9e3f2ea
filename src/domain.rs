use serde::{Deserialize, Serialize};

/// One catalog entry as the pipeline sees it. Immutable once received;
/// derived values are always computed into new structures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub discounted_price: f64,
    pub rating: f64,
    pub reviews_count: u32,
}

impl ProductRecord {
    /// Absolute discount for this product. May come out negative when the
    /// catalog reports a discounted price above the list price; callers
    /// carry the value through rather than clamping it.
    pub fn discount(&self) -> f64 {
        self.price - self.discounted_price
    }
}

/// The four numeric range constraints applied to the catalog query.
///
/// `min_price <= max_price` is expected from the caller (a range slider in
/// the original UI) but never assumed: an inverted range flows through as an
/// ordinary query that yields an empty collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub min_price: f64,
    pub max_price: f64,
    pub min_rating: f64,
    pub min_reviews: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            min_price: 0.0,
            max_price: 100_000.0,
            min_rating: 0.0,
            min_reviews: 0,
        }
    }
}

/// Sortable columns of the table view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Name,
    Price,
    DiscountedPrice,
    Rating,
    ReviewsCount,
}

/// Sort direction. `None` leaves the collection in its received order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascend,
    Descend,
    None,
}

/// Current table ordering. Replaced wholesale on every sort request,
/// never merged field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub order: SortOrder,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortColumn::Name,
            order: SortOrder::Ascend,
        }
    }
}

/// Rollup statistics over the current product collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total: usize,
    pub avg_price: f64,
    pub avg_discount: f64,
    pub avg_rating: f64,
}

/// Chart-ready series. `labels[i]` describes `values[i]`; the pairing is
/// positional and must be preserved by every producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
