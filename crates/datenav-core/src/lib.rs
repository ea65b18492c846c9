pub mod bounds;
pub mod calendar;
pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod host;
pub mod navigator;
pub mod period;
pub mod render;

use std::ffi::OsString;

use clap::Parser;
use tracing::{
  debug,
  info
};

pub use crate::bounds::Boundaries;
pub use crate::clock::{
  Clock,
  FixedClock,
  SystemClock
};
pub use crate::config::NavSettings;
pub use crate::navigator::{
  DayNavigator,
  MonthNavigator,
  NavContext,
  NavEvent,
  Navigator,
  NavigatorView,
  WeekNavigator
};
pub use crate::period::{
  Day,
  Direction,
  Month,
  Period,
  PeriodUnit,
  Week
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting datenav"
  );

  let mut settings = NavSettings::load(
    cli.config.as_deref()
  )?;
  settings.apply_overrides(
    cli
      .rc_overrides
      .into_iter()
      .map(|kv| (kv.key, kv.value))
  )?;
  settings.validate()?;
  debug!(?settings, "effective settings");

  let renderer =
    render::Renderer::new(&settings);
  let mut ctx = NavContext::new(settings);
  if let Some(today) = cli.today {
    ctx = ctx.with_clock(FixedClock(today));
  }

  let stdin = std::io::stdin();
  let stdout = std::io::stdout();
  commands::dispatch(
    ctx,
    &renderer,
    cli.command,
    stdin.lock(),
    stdout.lock()
  )?;

  info!("done");
  Ok(())
}
