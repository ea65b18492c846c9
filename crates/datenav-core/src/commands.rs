use std::io::{
  BufRead,
  Write
};

use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{
  debug,
  info,
  warn
};

use crate::calendar::parse_week_start;
use crate::cli::{
  Command,
  TargetArgs
};
use crate::host::{
  NavigationHost,
  SessionCommand
};
use crate::navigator::{
  Control,
  NavContext,
  NavEvent,
  NavigatorView
};
use crate::render::Renderer;

#[tracing::instrument(skip_all)]
pub fn dispatch<R, W>(
  ctx: NavContext,
  renderer: &Renderer,
  command: Command,
  input: R,
  mut out: W
) -> anyhow::Result<()>
where
  R: BufRead,
  W: Write
{
  match command {
    | Command::Show(target) => {
      let host = build_host(ctx, &target)?;
      emit(
        renderer,
        &host,
        host.selected(),
        target.json,
        &mut out
      )
    }
    | Command::Step {
      target,
      direction
    } => {
      let mut host =
        build_host(ctx, &target)?;
      let before = host.selected();
      let fired = host.handle(
        NavEvent::Click(Control::arrow(
          direction
        ))
      );
      if !fired {
        warn!(
          direction = direction.as_key(),
          "arrow disabled; date unchanged"
        );
        if !target.json {
          writeln!(
            out,
            "unchanged: {} arrow is \
             disabled",
            direction.as_key()
          )?;
        }
      }
      emit(
        renderer,
        &host,
        before,
        target.json,
        &mut out
      )
    }
    | Command::Pick {
      target,
      picked
    } => {
      let mut host =
        build_host(ctx, &target)?;
      let before = host.selected();
      host.handle(NavEvent::Click(
        Control::Label
      ));
      host.handle(NavEvent::PickerChange(
        picked
      ));
      emit(
        renderer,
        &host,
        before,
        target.json,
        &mut out
      )
    }
    | Command::Session(target) => {
      let mut host =
        build_host(ctx, &target)?;
      run_session(
        &mut host, renderer, input, out
      )
    }
  }
}

fn build_host(
  ctx: NavContext,
  target: &TargetArgs
) -> anyhow::Result<NavigationHost> {
  let week_start = match target
    .week_start
    .as_deref()
  {
    | Some(raw) => {
      parse_week_start(raw)
        .context("invalid --week-start")?
    }
    | None => ctx.settings.week_start
  };
  let selected = target
    .date
    .unwrap_or_else(|| ctx.today());

  debug!(
    unit = target.unit.as_key(),
    %selected,
    %week_start,
    "building navigation host"
  );
  Ok(NavigationHost::new(
    ctx,
    target.unit,
    week_start,
    selected
  ))
}

/// JSON shape of a one-shot command:
/// the view plus what happened to the
/// selected date.
#[derive(Debug, Serialize)]
struct CommandOutput<'a> {
  selected: NaiveDate,
  changed:  bool,
  #[serde(flatten)]
  view:     &'a NavigatorView
}

fn emit<W: Write>(
  renderer: &Renderer,
  host: &NavigationHost,
  before: NaiveDate,
  json: bool,
  out: &mut W
) -> anyhow::Result<()> {
  let view = host.view();
  if json {
    renderer.write_json(
      &mut *out,
      &CommandOutput {
        selected: host.selected(),
        changed:  host.selected() != before,
        view:     &view
      }
    )
  } else {
    writeln!(
      out,
      "{}: {}",
      view.unit.label(),
      host.selected().format("%Y-%m-%d")
    )?;
    renderer.write_view(&mut *out, &view)
  }
}

/// Drives a host from line-oriented
/// input, re-rendering after every
/// interaction.
#[tracing::instrument(skip_all)]
pub fn run_session<R, W>(
  host: &mut NavigationHost,
  renderer: &Renderer,
  input: R,
  mut out: W
) -> anyhow::Result<()>
where
  R: BufRead,
  W: Write
{
  renderer
    .write_view(&mut out, &host.view())?;

  for (line_num, line) in
    input.lines().enumerate()
  {
    let line = line.with_context(|| {
      format!(
        "failed to read session line {}",
        line_num + 1
      )
    })?;

    let command =
      match SessionCommand::parse(&line) {
        | Ok(Some(command)) => command,
        | Ok(None) => continue,
        | Err(error) => {
          warn!(line = line_num + 1, %error, "skipping session line");
          writeln!(out, "error: {error}")?;
          continue;
        }
      };

    match command {
      | SessionCommand::Quit => break,
      | SessionCommand::Show => {}
      | SessionCommand::Event(event) => {
        let before = host.selected();
        let fired = host.handle(event);
        if !fired
          && matches!(
            event,
            NavEvent::Click(
              Control::PreviousArrow
                | Control::NextArrow
            )
          )
        {
          writeln!(
            out,
            "unchanged: arrow is \
             disabled"
          )?;
        }
        if host.selected() != before {
          writeln!(
            out,
            "date: {}",
            host.selected()
              .format("%Y-%m-%d")
          )?;
        }
      }
    }

    renderer
      .write_view(&mut out, &host.view())?;
  }

  info!(
    selected = %host.selected(),
    "session finished"
  );
  Ok(())
}
