mod history;
mod routes;
mod search;

use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    match &cli.command {
        Command::Search(args) => search::run(args, cli.timeout_ms).await,
        Command::History(args) => history::run(args),
        Command::Routes(args) => routes::run(args),
    }
}

/// Round a price to cents for display.
pub(crate) fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    #[test]
    fn rounds_prices_to_cents() {
        assert_eq!(round_price(350.456), 350.46);
        assert_eq!(round_price(200.0), 200.0);
        assert_eq!(round_price(333.333_333), 333.33);
    }

    #[tokio::test]
    async fn when_user_asks_for_history_on_an_empty_warehouse_it_reports_no_data() {
        // Given: A faretrack home with no ingested fares
        let temp = tempdir().expect("tempdir");
        std::env::set_var("FARETRACK_HOME", temp.path());

        // When: The user runs `faretrack history TPE LAX`
        let cli = Cli::try_parse_from(["faretrack", "history", "TPE", "LAX"]).expect("parse");
        let data = run(&cli).await.expect("history command");

        // Then: The route reports null prices, not zero and not an error
        assert_eq!(data["origin"], "TPE");
        assert_eq!(data["destination"], "LAX");
        assert_eq!(data["quote_count"], 0);
        assert!(data["best_price"].is_null());
        assert!(data["average_price"].is_null());
    }

    #[tokio::test]
    async fn when_user_passes_a_bad_location_code_the_usage_exit_code_applies() {
        let cli = Cli::try_parse_from(["faretrack", "history", "T4E", "LAX"]).expect("parse");

        let error = run(&cli).await.expect_err("must fail");
        assert_eq!(error.exit_code(), 2);
    }
}
