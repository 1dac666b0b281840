use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use reward_distribution::VestingRate;
use rust_decimal::Decimal;
use std::{path::PathBuf, str::FromStr};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod types;

use commands::{DelegatorCommands, Error};
use config::Config;
use types::{PoolConversion, RunArgs};

fn run_args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
    vec![
        Arg::with_name("account")
            .short("a")
            .long("account")
            .value_name("NAME")
            .help("Account from which delegations are tracked")
            .takes_value(true),
        Arg::with_name("payer")
            .short("p")
            .long("payer")
            .value_name("NAME")
            .help("Account the payouts are sent from (defaults to the tracked account)")
            .takes_value(true),
        Arg::with_name("share")
            .short("s")
            .long("share")
            .value_name("PERCENT")
            .help("Percentage of the curation rewards returned to delegators")
            .takes_value(true),
        Arg::with_name("days")
            .short("d")
            .long("days")
            .value_name("DAYS")
            .help("Number of days curation rewards are tracked for")
            .takes_value(true),
        Arg::with_name("delegations")
            .long("delegations")
            .value_name("FILE")
            .help("JSON export of the account's delegation history")
            .takes_value(true)
            .required(true),
        Arg::with_name("rewards")
            .long("rewards")
            .value_name("FILE")
            .help("JSON export of the account's curation rewards")
            .takes_value(true)
            .required(true),
        Arg::with_name("balance")
            .short("b")
            .long("balance")
            .value_name("AMOUNT")
            .help("Liquid balance available on the paying account")
            .takes_value(true)
            .required(true),
        Arg::with_name("vesting-fund")
            .long("vesting-fund")
            .value_name("AMOUNT")
            .help("Total vesting fund, for converting vesting shares to liquid tokens")
            .takes_value(true)
            .requires("vesting-shares"),
        Arg::with_name("vesting-shares")
            .long("vesting-shares")
            .value_name("AMOUNT")
            .help("Total vesting shares, for converting vesting shares to liquid tokens")
            .takes_value(true)
            .requires("vesting-fund"),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let matches = App::new("Delegator Return")
        .version("1.0")
        .about("Returns a share of curation rewards to delegators, weighted by delegation time")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("plan")
                .about("Compute and print the payouts without sending anything")
                .args(&run_args()),
        )
        .subcommand(
            SubCommand::with_name("pay")
                .about("Compute the payouts and write transfer instructions")
                .args(&run_args())
                .arg(
                    Arg::with_name("out")
                        .short("o")
                        .long("out")
                        .value_name("FILE")
                        .help("File transfer instructions are appended to")
                        .takes_value(true),
                ),
        )
        .subcommand(SubCommand::with_name("config").about("Show the configuration file"))
        .get_matches();

    // Load configuration
    let config = Config::load()?;
    let now = chrono::Utc::now();
    info!("Start of the run on {}", now.format("%Y-%m-%d %H:%M:%S"));

    // Process subcommands
    match matches.subcommand() {
        ("plan", Some(sub_matches)) => {
            let args = resolve_args(sub_matches, &config)?;
            DelegatorCommands::plan(&args, &config, now).await?;
        }
        ("pay", Some(sub_matches)) => {
            let args = resolve_args(sub_matches, &config)?;
            DelegatorCommands::pay(&args, &config, now).await?;
        }
        ("config", Some(_)) => {
            DelegatorCommands::show_config(&config)?;
        }
        _ => {
            println!("No subcommand specified. Use --help for usage information.");
        }
    }

    info!("End of the run on {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"));
    Ok(())
}

/// Merge command-line flags over the configuration file
fn resolve_args(matches: &ArgMatches<'_>, config: &Config) -> Result<RunArgs, Error> {
    let config_path = || Config::path().display().to_string();

    let tracked_account = matches
        .value_of("account")
        .map(str::to_string)
        .or_else(|| config.tracked_account.clone())
        .ok_or_else(|| Error::Missing("--account", config_path()))?;
    let paying_account = matches
        .value_of("payer")
        .map(str::to_string)
        .or_else(|| config.paying_account.clone())
        .unwrap_or_else(|| tracked_account.clone());

    let percent = decimal_arg(matches, "share")?.unwrap_or(config.return_percent);
    let window_days = match matches.value_of("days") {
        Some(days) => days
            .parse::<u32>()
            .map_err(|e| Error::Parse(format!("--days {}: {}", days, e)))?,
        None => config.window_days,
    };

    let balance = decimal_arg(matches, "balance")?
        .ok_or_else(|| Error::Missing("--balance", config_path()))?;

    let conversion = match (
        decimal_arg(matches, "vesting-fund")?,
        decimal_arg(matches, "vesting-shares")?,
    ) {
        (Some(fund), Some(shares)) => PoolConversion::Vesting(VestingRate::new(fund, shares)?),
        _ => PoolConversion::Native,
    };

    Ok(RunArgs {
        tracked_account,
        paying_account,
        return_fraction: percent / Decimal::from(100),
        window_days,
        delegations: path_arg(matches, "delegations")?,
        rewards: path_arg(matches, "rewards")?,
        balance,
        conversion,
        output: matches.value_of("out").map(PathBuf::from),
    })
}

fn decimal_arg(matches: &ArgMatches<'_>, name: &str) -> Result<Option<Decimal>, Error> {
    matches
        .value_of(name)
        .map(|value| {
            Decimal::from_str(value).map_err(|e| Error::Parse(format!("--{} {}: {}", name, value, e)))
        })
        .transpose()
}

fn path_arg(matches: &ArgMatches<'_>, name: &'static str) -> Result<PathBuf, Error> {
    matches
        .value_of(name)
        .map(PathBuf::from)
        .ok_or_else(|| Error::Missing(name, Config::path().display().to_string()))
}
