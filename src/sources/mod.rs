pub mod http;
pub mod synthetic;

pub use http::HttpProductSource;
pub use synthetic::SyntheticProductSource;

use crate::domain::{FilterState, ProductRecord};
use crate::error::Result;

/// Seam between the fetch coordinator and a catalog backend.
///
/// Implementations must return the complete collection matching the given
/// filters; the coordinator owns sequencing, timeouts-as-errors handling,
/// and stale-result discard on top of this.
#[async_trait::async_trait]
pub trait ProductSource: Send + Sync {
    /// Unique identifier for this source, used in logs and metrics labels.
    fn source_name(&self) -> &'static str;

    /// Fetch all products matching the filter ranges.
    async fn fetch_products(&self, filters: &FilterState) -> Result<Vec<ProductRecord>>;
}
