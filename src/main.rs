use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod models;
mod services;
mod utils;

use api::energinet::EnerginetClient;
use services::load_service;
use services::plot_service::{self, PlotOptions};
use utils::errors::PowerError;

/// Fetch Danish electricity balance data and render a stacked area chart
#[derive(Parser, Debug)]
#[command(name = "elsystem", version, about)]
struct Args {
    /// Start of the loaded range (YYYY-MM-DD, inclusive)
    #[arg(long)]
    start_date: String,

    /// End of the loaded range (YYYY-MM-DD, inclusive)
    #[arg(long)]
    end_date: String,

    /// Generation columns to stack, bottom band first
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "SolarPower,OnshoreWindPower,OffshoreWindPower,FossilGas,FossilHardCoal,Biomass,FossilOil"
    )]
    columns: Vec<String>,

    /// Per-column scale factor as COLUMN=FACTOR, repeatable
    #[arg(long = "scale", value_parser = parse_scale)]
    scale: Vec<(String, f64)>,

    /// Restrict the plotted window (YYYY-MM-DD, inclusive)
    #[arg(long)]
    plot_start: Option<String>,

    /// Restrict the plotted window (YYYY-MM-DD, inclusive)
    #[arg(long)]
    plot_end: Option<String>,

    /// Chart title
    #[arg(long, default_value = "Danmarks elsystem")]
    title: String,

    /// Skip the total load overlay line
    #[arg(long)]
    no_load: bool,

    /// Output PNG path
    #[arg(long, default_value = "elsystem.png")]
    out: PathBuf,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

fn parse_scale(raw: &str) -> Result<(String, f64), String> {
    let (name, factor) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=FACTOR, got '{}'", raw))?;
    let factor: f64 = factor
        .parse()
        .map_err(|e| format!("bad scale factor '{}': {}", factor, e))?;
    if factor <= 0.0 {
        return Err(format!("scale factor for '{}' must be positive", name));
    }
    Ok((name.to_string(), factor))
}

async fn run(args: Args) -> Result<(), PowerError> {
    let client = EnerginetClient::with_timeout(Duration::from_secs(args.timeout));

    info!(
        "loading power data for {} to {}",
        args.start_date, args.end_date
    );
    let table = load_service::load_power_data(&client, &args.start_date, &args.end_date).await?;
    info!("loaded {} hourly rows", table.len());

    let options = PlotOptions {
        columns_to_plot: args.columns,
        scale_factors: args.scale.into_iter().collect::<HashMap<_, _>>(),
        start: args
            .plot_start
            .as_deref()
            .map(load_service::parse_date)
            .transpose()?,
        end: args
            .plot_end
            .as_deref()
            .map(load_service::parse_date)
            .transpose()?,
        title: args.title,
        plot_load: !args.no_load,
        ..PlotOptions::default()
    };

    plot_service::plot_power_system(&table, &options, &args.out)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("elsystem=info".parse().unwrap()),
        )
        .with_target(true)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scale_accepts_pairs() {
        assert_eq!(
            parse_scale("SolarPower=2.5").unwrap(),
            ("SolarPower".to_string(), 2.5)
        );
    }

    #[test]
    fn test_parse_scale_rejects_nonpositive_and_garbage() {
        assert!(parse_scale("SolarPower=0").is_err());
        assert!(parse_scale("SolarPower=-1.0").is_err());
        assert!(parse_scale("SolarPower").is_err());
        assert!(parse_scale("SolarPower=two").is_err());
    }
}
