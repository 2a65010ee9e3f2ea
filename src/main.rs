use clap::{Args, Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use catalog_pulse::aggregate::{derive_views, AggregateCache, DerivedViews};
use catalog_pulse::config::Config;
use catalog_pulse::coordinator::FetchCoordinator;
use catalog_pulse::domain::{FilterState, ProductRecord, SortColumn, SortOrder, SortState};
use catalog_pulse::export::{write_snapshot, DashboardSnapshot};
use catalog_pulse::logging;
use catalog_pulse::sources::{HttpProductSource, SyntheticProductSource};
use catalog_pulse::table::sorted_view;

#[derive(Parser)]
#[command(name = "catalog_pulse")]
#[command(about = "Marketplace catalog analytics dashboard")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch once with the given filters and print the dashboard
    Snapshot {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        sort: SortArgs,
        /// Maximum table rows to print
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Fetch once and write the dashboard snapshot as JSON
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        sort: SortArgs,
        /// Directory for the snapshot file
        #[arg(long, default_value = "output")]
        output_dir: String,
    },
    /// Run the pipeline offline against a synthetic catalog, simulating a
    /// burst of slider updates to show debounce coalescing
    Demo {
        /// Synthetic catalog size
        #[arg(long, default_value_t = 400)]
        catalog_size: usize,
        /// Seed for the synthetic catalog
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Args, Clone)]
struct FilterArgs {
    /// Minimum original price
    #[arg(long, default_value_t = 0.0)]
    min_price: f64,
    /// Maximum original price
    #[arg(long, default_value_t = 100_000.0)]
    max_price: f64,
    /// Minimum rating, 0-5
    #[arg(long, default_value_t = 0.0)]
    min_rating: f64,
    /// Minimum review count
    #[arg(long, default_value_t = 0)]
    min_reviews: u32,
}

impl From<&FilterArgs> for FilterState {
    fn from(args: &FilterArgs) -> Self {
        Self {
            min_price: args.min_price,
            max_price: args.max_price,
            min_rating: args.min_rating,
            min_reviews: args.min_reviews,
        }
    }
}

#[derive(ValueEnum, Clone, Copy)]
enum SortByArg {
    Name,
    Price,
    DiscountedPrice,
    Rating,
    Reviews,
}

#[derive(Args, Clone)]
struct SortArgs {
    /// Column to sort the table by
    #[arg(long, value_enum, default_value = "name")]
    sort_by: SortByArg,
    /// Sort descending instead of ascending
    #[arg(long)]
    descending: bool,
}

impl From<&SortArgs> for SortState {
    fn from(args: &SortArgs) -> Self {
        let column = match args.sort_by {
            SortByArg::Name => SortColumn::Name,
            SortByArg::Price => SortColumn::Price,
            SortByArg::DiscountedPrice => SortColumn::DiscountedPrice,
            SortByArg::Rating => SortColumn::Rating,
            SortByArg::Reviews => SortColumn::ReviewsCount,
        };
        let order = if args.descending {
            SortOrder::Descend
        } else {
            SortOrder::Ascend
        };
        SortState { column, order }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load_or_default();

    match cli.command {
        Commands::Snapshot { filters, sort, limit } => {
            let filter_state = FilterState::from(&filters);
            let sort_state = SortState::from(&sort);
            if let Some(products) = fetch_once(&config, filter_state).await? {
                let views = derive_views(&products);
                let rows = sorted_view(&products, &sort_state);
                render_dashboard(&views, &rows, limit);
            }
        }
        Commands::Export { filters, sort, output_dir } => {
            let filter_state = FilterState::from(&filters);
            let sort_state = SortState::from(&sort);
            if let Some(products) = fetch_once(&config, filter_state.clone()).await? {
                let views = derive_views(&products);
                let rows = sorted_view(&products, &sort_state);
                let snapshot = DashboardSnapshot::new(filter_state, sort_state, &views, rows);
                let path = write_snapshot(&snapshot, &output_dir)?;
                info!("Snapshot written to {}", path);
                println!("💾 Snapshot written to {}", path);
            }
        }
        Commands::Demo { catalog_size, seed } => {
            run_demo(&config, catalog_size, seed).await;
        }
    }
    Ok(())
}

/// One-shot fetch through the coordinator. Returns `None` when the fetch
/// failed (the coordinator swallows fetch errors by design, so failure shows
/// up as "nothing ever committed").
async fn fetch_once(
    config: &Config,
    filters: FilterState,
) -> Result<Option<Arc<Vec<ProductRecord>>>, Box<dyn std::error::Error>> {
    let source = Arc::new(HttpProductSource::new(
        &config.catalog.base_url,
        Duration::from_millis(config.catalog.timeout_ms),
    )?);
    let coordinator = FetchCoordinator::new(source, Duration::from_millis(config.catalog.debounce_ms));

    println!("📡 Fetching products from {}...", config.catalog.base_url);
    coordinator.refresh(filters).await;

    let (products, generation) = coordinator.snapshot();
    coordinator.shutdown();

    if generation == 0 {
        println!("❌ Fetch failed; nothing to display (see logs)");
        return Ok(None);
    }
    println!("✅ Fetched {} products", products.len());
    Ok(Some(products))
}

async fn run_demo(config: &Config, catalog_size: usize, seed: u64) {
    println!("🧪 Offline demo against a synthetic catalog ({} products)", catalog_size);

    let source = Arc::new(
        SyntheticProductSource::new(seed, catalog_size).with_latency(Duration::from_millis(150)),
    );
    let debounce = Duration::from_millis(config.catalog.debounce_ms);
    let coordinator = FetchCoordinator::new(source.clone(), debounce);
    let mut cache = AggregateCache::new();

    // Initial mount: one immediate fetch.
    coordinator.refresh(FilterState::default()).await;
    let (products, generation) = coordinator.snapshot();
    println!("✅ Initial load: {} products", products.len());
    render_dashboard(cache.views(generation, &products), &products, 5);

    // Simulate a slider drag: a burst of filter updates inside the debounce
    // window that must collapse into a single fetch.
    println!("\n🎚️  Dragging the max-price slider (8 updates in quick succession)...");
    for step in 0..8u32 {
        let filters = FilterState {
            max_price: 20_000.0 - f64::from(step) * 2_000.0,
            ..FilterState::default()
        };
        coordinator.update_filters(filters);
        tokio::time::sleep(Duration::from_millis(40)).await;
    }
    // Let the window elapse and the resulting fetch settle.
    tokio::time::sleep(debounce + Duration::from_millis(400)).await;

    let (products, generation) = coordinator.snapshot();
    println!(
        "✅ Drag settled: 8 updates coalesced into {} catalog fetch(es), {} products in view",
        source.fetch_count() - 1,
        products.len()
    );
    let sort = SortState {
        column: SortColumn::Price,
        order: SortOrder::Descend,
    };
    let rows = sorted_view(&products, &sort);
    render_dashboard(cache.views(generation, &products), &rows, 5);

    coordinator.shutdown();
}

fn render_dashboard(views: &DerivedViews, rows: &[ProductRecord], limit: usize) {
    let stats = &views.stats;
    println!("\n📊 Catalog Pulse");
    println!("   Products:       {}", stats.total);
    println!("   Average price:  {:.0}", stats.avg_price);
    println!("   Average discount: {:.0}", stats.avg_discount);
    println!("   Average rating: {:.1}", stats.avg_rating);

    println!("\n   Price distribution:");
    let max_count = views
        .price_histogram
        .values
        .iter()
        .cloned()
        .fold(0.0_f64, f64::max)
        .max(1.0);
    for (label, value) in views
        .price_histogram
        .labels
        .iter()
        .zip(&views.price_histogram.values)
    {
        let bar_len = ((value / max_count) * 30.0).round() as usize;
        println!("   {:>7} | {:<30} {}", label, "#".repeat(bar_len), value);
    }

    if !views.discount_series.is_empty() {
        println!("\n   Discounts (first {} products in view):", views.discount_series.len());
        for (label, value) in views
            .discount_series
            .labels
            .iter()
            .zip(&views.discount_series.values)
        {
            println!("   {:<18} {:>8}", label, value);
        }
    }

    if !rows.is_empty() {
        println!("\n   {:<30} {:>9} {:>9} {:>7} {:>8}", "Name", "Price", "Sale", "Rating", "Reviews");
        for row in rows.iter().take(limit) {
            println!(
                "   {:<30} {:>9.0} {:>9.0} {:>7.1} {:>8}",
                truncate(&row.name, 30),
                row.price,
                row.discounted_price,
                row.rating,
                row.reviews_count
            );
        }
        if rows.len() > limit {
            println!("   ... and {} more rows", rows.len() - limit);
        }
    }
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        name.chars().take(width.saturating_sub(3)).collect::<String>() + "..."
    }
}
