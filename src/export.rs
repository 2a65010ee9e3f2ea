use crate::aggregate::DerivedViews;
use crate::domain::{AggregateStats, ChartSeries, FilterState, ProductRecord, SortState};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything one dashboard render needs, frozen at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub captured_at: DateTime<Utc>,
    pub filters: FilterState,
    pub sort: SortState,
    pub stats: AggregateStats,
    pub price_histogram: ChartSeries,
    pub discount_series: ChartSeries,
    pub rows: Vec<ProductRecord>,
}

impl DashboardSnapshot {
    pub fn new(
        filters: FilterState,
        sort: SortState,
        views: &DerivedViews,
        rows: Vec<ProductRecord>,
    ) -> Self {
        Self {
            captured_at: Utc::now(),
            filters,
            sort,
            stats: views.stats.clone(),
            price_histogram: views.price_histogram.clone(),
            discount_series: views.discount_series.clone(),
            rows,
        }
    }
}

/// Persist a snapshot as pretty JSON under `output_dir`, returning the path
/// of the written file.
pub fn write_snapshot(snapshot: &DashboardSnapshot, output_dir: &str) -> Result<String> {
    fs::create_dir_all(output_dir)?;

    let timestamp = snapshot.captured_at.format("%Y%m%d_%H%M%S");
    let filename = format!("pulse_{timestamp}.json");
    let filepath = Path::new(output_dir).join(&filename);

    let json_content = serde_json::to_string_pretty(snapshot)?;
    fs::write(&filepath, json_content)?;

    Ok(filepath.to_string_lossy().to_string())
}
