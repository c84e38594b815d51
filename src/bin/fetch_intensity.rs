//! CLI entry point: fetch the current carbon intensity for a region
//! using the same client and conversion as the API handlers.

use clap::{Arg, ArgAction, Command};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use carbon_intensity_api::client::WattTimeClient;
use carbon_intensity_api::config::{DEFAULT_REGION, UpstreamProfile, WattTimeCredentials};
use carbon_intensity_api::proxy::fetch_intensity;

#[derive(Debug)]
struct Args {
    verbose: bool,
    region: String,
}

fn parse_args() -> Args {
    let matches = Command::new("fetch_intensity")
        .version(carbon_intensity_api::version())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Verbose mode. Outputs DEBUG and higher log messages."),
        )
        .arg(
            Arg::new("ba")
                .short('b')
                .long("ba")
                .env("WATTTIME_BA")
                .default_value(DEFAULT_REGION)
                .help("Balancing authority region code to query."),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");

    let region = matches
        .get_one::<String>("ba")
        .cloned()
        .unwrap_or_else(|| DEFAULT_REGION.to_string());

    Args { verbose, region }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    debug!("{args:?}");

    let credentials = WattTimeCredentials::from_env()?;
    let client = WattTimeClient::new(UpstreamProfile::from_env());
    let intensity = fetch_intensity(&client, &credentials, &args.region).await?;

    println!("{} carbon intensity: {intensity} gCO2/kWh", args.region);

    Ok(())
}
