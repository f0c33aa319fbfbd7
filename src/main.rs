use analytics::{CorrelationMatrixBuilder, ListingOrder, Projector, TrendRule};
use api_client::{Endpoint, GlobalOverview, MarketChart, MarketCoin, MarketDataClient, Protocol};
use chrono::{TimeZone, Utc};
use clap::Parser;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use core_types::{Asset, CorrelationCell, EntryState};
use data_sync::{CacheSnapshot, Subscription, SyncService};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// A terminal dashboard over public cryptocurrency market data.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Coin id for the historical chart and forecast (e.g. "bitcoin").
    #[arg(long, default_value = "bitcoin")]
    coin: String,

    /// Days of price history to load for the selected coin.
    #[arg(long, default_value_t = 7)]
    days: u32,

    /// Forecast horizon in days; defaults to the configured value.
    #[arg(long)]
    horizon: Option<usize>,

    /// Render a single snapshot once data has arrived, then exit.
    #[arg(long)]
    once: bool,
}

/// How many render ticks `--once` waits for a first payload before giving up
/// and rendering whatever is cached, so permanently failing feeds cannot keep
/// the single-shot mode running forever.
const ONCE_MAX_WAIT_TICKS: u32 = 6;

/// Whether the `--once` snapshot should render now: either some feed has
/// produced data, or the wait budget is spent.
fn once_should_render(has_data: bool, elapsed_ticks: u32) -> bool {
    has_data || elapsed_ticks >= ONCE_MAX_WAIT_TICKS
}

/// The four live feeds the dashboard composes. Each holds its own cache key
/// and refresh cadence; the selected coin and range are baked into the
/// historical feed's key, so a different selection is a different key.
struct Feeds {
    markets: Subscription,
    global: Subscription,
    historical: Subscription,
    protocols: Subscription,
}

impl Feeds {
    fn subscribe(
        service: &SyncService,
        client: &MarketDataClient,
        cli: &Cli,
        config: &configuration::Config,
    ) -> Self {
        let chart = Endpoint::MarketChart {
            coin_id: cli.coin.clone(),
            days: cli.days,
        };
        Self {
            markets: service.subscribe(
                Endpoint::Markets.cache_key(),
                client.fetcher(Endpoint::Markets),
                config.refresh.market(),
            ),
            global: service.subscribe(
                Endpoint::Global.cache_key(),
                client.fetcher(Endpoint::Global),
                config.refresh.global(),
            ),
            historical: service.subscribe(
                chart.cache_key(),
                client.fetcher(chart.clone()),
                config.refresh.historical(),
            ),
            protocols: service.subscribe(
                Endpoint::Protocols.cache_key(),
                client.fetcher(Endpoint::Protocols),
                config.refresh.protocols(),
            ),
        }
    }

    fn has_any_data(&self) -> bool {
        !self.markets.snapshot().is_empty() || !self.global.snapshot().is_empty()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = configuration::load_config()?;
    let horizon = cli.horizon.unwrap_or(config.analytics.forecast_days);

    let client = MarketDataClient::new(&config.api);
    let service = SyncService::new();
    let feeds = Feeds::subscribe(&service, &client, &cli, &config);

    tracing::info!(
        coin = %cli.coin,
        days = cli.days,
        horizon,
        "dashboard started, waiting for first refresh"
    );

    let mut render_tick = tokio::time::interval(Duration::from_secs(5));
    let mut elapsed_ticks = 0u32;
    loop {
        tokio::select! {
            _ = render_tick.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
        }

        if cli.once && !once_should_render(feeds.has_any_data(), elapsed_ticks) {
            // Give the first round of fetches a moment before the single shot.
            elapsed_ticks += 1;
            continue;
        }

        render_dashboard(&cli, &config, horizon, &feeds);

        if cli.once {
            break;
        }
    }

    Ok(())
}

/// Decodes a cached payload into its typed response shape. A payload that no
/// longer matches the expected shape is treated like missing data.
fn decode<T: DeserializeOwned>(snapshot: &CacheSnapshot) -> Option<T> {
    let payload = snapshot.payload.clone()?;
    match serde_json::from_value(payload) {
        Ok(decoded) => Some(decoded),
        Err(error) => {
            tracing::warn!(key = %snapshot.key, %error, "cached payload failed to decode");
            None
        }
    }
}

/// A one-line freshness indicator for a feed, shown with each section so
/// stale-while-revalidate states are visible rather than silent.
fn freshness(snapshot: &CacheSnapshot) -> String {
    let fetched = snapshot
        .fetched_at
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    match snapshot.state {
        EntryState::Error => {
            let reason = snapshot.last_error.as_deref().unwrap_or("unknown error");
            format!("last good {fetched}, refresh failing: {reason}")
        }
        EntryState::Loading => format!("last good {fetched}, refreshing..."),
        _ => format!("as of {fetched}"),
    }
}

fn render_dashboard(cli: &Cli, config: &configuration::Config, horizon: usize, feeds: &Feeds) {
    println!();
    render_global(&feeds.global.snapshot());
    render_markets(&feeds.markets.snapshot());
    render_correlations(&feeds.markets.snapshot(), config.analytics.top_n);
    render_forecast(cli, config, horizon, &feeds.historical.snapshot());
    render_protocols(&feeds.protocols.snapshot());
}

fn render_global(snapshot: &CacheSnapshot) {
    let Some(overview) = decode::<GlobalOverview>(snapshot) else {
        println!("Global market data: no data yet ({})", freshness(snapshot));
        return;
    };

    let data = overview.data;
    let trillions = data.total_market_cap_usd().unwrap_or(0.0) / 1e12;
    println!(
        "Global: ${trillions:.2}T market cap ({:+.2}% 24h) | {} markets | BTC dominance {:.1}% | {}",
        data.market_cap_change_percentage_24h_usd,
        data.markets,
        data.btc_dominance().unwrap_or(0.0),
        freshness(snapshot),
    );
}

fn render_markets(snapshot: &CacheSnapshot) {
    let Some(coins) = decode::<Vec<MarketCoin>>(snapshot) else {
        println!("Market listing: no data yet ({})", freshness(snapshot));
        return;
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Name", "Symbol", "Price", "24h %", "Market Cap"]);

    for (rank, coin) in coins.iter().take(10).enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            coin.name.clone(),
            coin.symbol.to_uppercase(),
            coin.current_price
                .map(|p| format!("${p:.2}"))
                .unwrap_or_else(|| "-".to_string()),
            coin.price_change_percentage_24h
                .map(|c| format!("{c:+.2}%"))
                .unwrap_or_else(|| "-".to_string()),
            coin.market_cap
                .map(|m| format!("${:.1}B", m / 1e9))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }

    println!("\nTop coins ({})", freshness(snapshot));
    println!("{table}");
}

fn render_correlations(snapshot: &CacheSnapshot, top_n: usize) {
    let Some(coins) = decode::<Vec<MarketCoin>>(snapshot) else {
        return;
    };

    let assets: Vec<Asset> = coins.into_iter().map(MarketCoin::into_asset).collect();
    let builder = CorrelationMatrixBuilder::new(Box::new(ListingOrder), top_n);
    let cells = builder.build(&assets);

    let headers: Vec<String> = assets
        .iter()
        .take(top_n)
        .map(|a| a.symbol.to_uppercase())
        .collect();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    let mut header_row = vec![String::new()];
    header_row.extend(headers.iter().cloned());
    table.set_header(header_row);

    let cell_at = |i: usize, j: usize| -> Option<&CorrelationCell> {
        cells.iter().find(|c| c.row == i && c.col == j)
    };

    for (i, symbol) in headers.iter().enumerate() {
        let mut row = vec![symbol.clone()];
        for j in 0..headers.len() {
            // A hole in the matrix means "no data", not zero correlation.
            row.push(match cell_at(i, j) {
                Some(cell) => format!("{:+.2}", cell.coefficient),
                None => "n/a".to_string(),
            });
        }
        table.add_row(row);
    }

    println!("\n7-day price correlation (top {top_n})");
    println!("{table}");
}

fn render_forecast(
    cli: &Cli,
    config: &configuration::Config,
    horizon: usize,
    snapshot: &CacheSnapshot,
) {
    let Some(chart) = decode::<MarketChart>(snapshot) else {
        println!(
            "\nForecast for {}: no history yet ({})",
            cli.coin,
            freshness(snapshot)
        );
        return;
    };

    let history = chart.series();
    // Window sanity is enforced by Config::validate at startup.
    let projector = match Projector::with_windows(
        TrendRule::default(),
        config.analytics.sma_fast,
        config.analytics.sma_slow,
    ) {
        Ok(projector) => projector,
        Err(error) => {
            tracing::warn!(%error, "forecast disabled by invalid window configuration");
            return;
        }
    };

    let forecast = match projector.project(&history, horizon) {
        Ok(points) => points,
        Err(error) => {
            tracing::warn!(coin = %cli.coin, %error, "forecast unavailable");
            return;
        }
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Date", "Projected Price"]);
    for point in &forecast {
        table.add_row(vec![
            point
                .datetime()
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| point.timestamp.to_string()),
            format!("${:.2}", point.predicted_price),
        ]);
    }

    println!(
        "\nNaive {horizon}-day trend forecast for {} ({})",
        cli.coin,
        freshness(snapshot)
    );
    println!("{table}");
}

fn render_protocols(snapshot: &CacheSnapshot) {
    let Some(mut protocols) = decode::<Vec<Protocol>>(snapshot) else {
        println!("\nDeFi protocols: no data yet ({})", freshness(snapshot));
        return;
    };

    protocols.sort_by(|a, b| b.tvl.total_cmp(&a.tvl));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Protocol", "Chain", "TVL", "24h %"]);
    for protocol in protocols.iter().take(5) {
        table.add_row(vec![
            protocol.name.clone(),
            protocol.chain.clone(),
            format!("${:.2}B", protocol.tvl / 1e9),
            protocol
                .change_1d
                .map(|c| format!("{c:+.2}%"))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }

    println!("\nTop DeFi protocols by TVL ({})", freshness(snapshot));
    println!("{table}");
}
