//! CLI argument definitions for faretrack.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `search` | Search live fares and ingest the results |
//! | `history` | Show stored price history for a route |
//! | `routes` | List per-route rollups across the warehouse |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `10000` | Provider request timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! # Search and ingest fares for a round trip
//! faretrack search TPE LAX 2026-09-20 --return-date 2026-10-02
//!
//! # Show stored price history for the route
//! faretrack history TPE LAX --list
//!
//! # Per-route rollups, pretty JSON
//! faretrack routes --pretty
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// ✈️ Faretrack - Flight fare search and price-history tracking
///
/// Search live fares through the Amadeus travel API, persist every quote
/// into a local DuckDB warehouse, and track best and average prices per
/// route over time.
#[derive(Debug, Parser)]
#[command(
    name = "faretrack",
    author,
    version,
    about = "Flight fare search and price-history tracking",
    long_about = "Faretrack searches live flight fares and keeps a local price history.\n\
\n\
  • Live fare search via the Amadeus travel API\n\
  • Every quote persisted to a local DuckDB warehouse\n\
  • Best and average price per route across all stored quotes\n\
\n\
Use 'faretrack <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    ///
    /// - json: Single JSON object (default)
    /// - table: Plain text for terminal display
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Provider request timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// 🔍 Search live fares for a route and ingest the results.
    ///
    /// Searches the fare provider for the given route and dates, stores
    /// every returned quote, then reports the stored records together
    /// with the route's best and average price.
    ///
    /// # Examples
    ///
    ///   faretrack search TPE LAX 2026-09-20
    ///   faretrack search TPE LAX 2026-09-20 --return-date 2026-10-02 --adults 2
    Search(SearchArgs),

    /// 📈 Show stored price history for a route.
    ///
    /// Reports the best and average price across every quote ever stored
    /// for the route. Nothing is fetched; this reads the warehouse only.
    ///
    /// # Examples
    ///
    ///   faretrack history TPE LAX
    ///   faretrack history TPE LAX --list
    History(HistoryArgs),

    /// 🗺️ List per-route rollups across the warehouse.
    ///
    /// # Examples
    ///
    ///   faretrack routes
    ///   faretrack routes --format table
    Routes(RoutesArgs),
}

/// Arguments for the `search` command.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Origin location code (3-letter IATA, e.g., TPE).
    pub origin: String,

    /// Destination location code (3-letter IATA, e.g., LAX).
    pub destination: String,

    /// Outbound departure date as YYYY-MM-DD.
    pub departure_date: String,

    /// Inbound departure date as YYYY-MM-DD for a round trip.
    #[arg(long)]
    pub return_date: Option<String>,

    /// Number of adult passengers.
    #[arg(long, default_value_t = 1)]
    pub adults: u32,
}

/// Arguments for the `history` command.
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Origin location code (3-letter IATA).
    pub origin: String,

    /// Destination location code (3-letter IATA).
    pub destination: String,

    /// Include every stored quote for the route, cheapest first.
    #[arg(long, default_value_t = false)]
    pub list: bool,
}

/// Arguments for the `routes` command.
#[derive(Debug, Args)]
pub struct RoutesArgs {
    /// Maximum number of routes to return.
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}
