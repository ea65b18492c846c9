use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::calendar::parse_date;
use crate::period::{Direction, PeriodUnit};

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "datenav",
    version,
    about = "Day, week and month date navigation with boundary-aware arrows"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub rc_overrides: Vec<KeyVal>,

    /// Pin "today" instead of reading the clock.
    #[arg(long = "today", value_parser = parse_date_arg, global = true)]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render the navigator for a date.
    Show(TargetArgs),
    /// Press the previous or next arrow once.
    Step {
        #[command(flatten)]
        target: TargetArgs,

        #[arg(value_parser = parse_direction_arg)]
        direction: Direction,
    },
    /// Open the picker and select a date; no date selects today.
    Pick {
        #[command(flatten)]
        target: TargetArgs,

        #[arg(long = "to", value_parser = parse_date_arg)]
        picked: Option<NaiveDate>,
    },
    /// Read navigation events from stdin, one per line.
    Session(TargetArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    #[arg(value_parser = parse_unit_arg)]
    pub unit: PeriodUnit,

    #[arg(long = "date", value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,

    /// 0 = Sunday .. 6 = Saturday, or a weekday name.
    #[arg(long = "week-start")]
    pub week_start: Option<String>,

    #[arg(long = "json")]
    pub json: bool,
}

fn parse_date_arg(raw: &str) -> anyhow::Result<NaiveDate> {
    parse_date(raw)
}

fn parse_unit_arg(raw: &str) -> anyhow::Result<PeriodUnit> {
    PeriodUnit::from_key(&raw.trim().to_ascii_lowercase())
        .ok_or_else(|| anyhow!("unknown period '{raw}' (expected day, week or month)"))
}

fn parse_direction_arg(raw: &str) -> anyhow::Result<Direction> {
    Direction::from_key(&raw.trim().to_ascii_lowercase())
        .ok_or_else(|| anyhow!("unknown direction '{raw}' (expected prev or next)"))
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
