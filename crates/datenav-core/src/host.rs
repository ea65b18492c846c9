//! The host side of the navigator
//! contract: owns the selected date,
//! hands it down on every render and
//! takes the reported date back.

use anyhow::anyhow;
use chrono::{
  NaiveDate,
  Weekday
};
use tracing::info;

use crate::calendar::parse_date;
use crate::navigator::{
  Control,
  DayNavigator,
  MonthNavigator,
  NavContext,
  NavEvent,
  NavigatorView,
  PopoverState,
  WeekNavigator
};
use crate::period::{
  Period,
  PeriodUnit
};

#[derive(Debug, Clone)]
pub enum AnyNavigator {
  Day(DayNavigator),
  Week(WeekNavigator),
  Month(MonthNavigator)
}

impl AnyNavigator {
  #[must_use]
  pub fn for_unit(
    unit: PeriodUnit,
    week_start: Weekday
  ) -> Self {
    match unit {
      | PeriodUnit::Day => {
        Self::Day(DayNavigator::day())
      }
      | PeriodUnit::Week => {
        Self::Week(WeekNavigator::week(
          week_start
        ))
      }
      | PeriodUnit::Month => {
        Self::Month(
          MonthNavigator::month()
        )
      }
    }
  }

  #[must_use]
  pub fn view(
    &self,
    selected: NaiveDate,
    ctx: &NavContext
  ) -> NavigatorView {
    match self {
      | Self::Day(nav) => {
        nav.view(selected, ctx)
      }
      | Self::Week(nav) => {
        nav.view(selected, ctx)
      }
      | Self::Month(nav) => {
        nav.view(selected, ctx)
      }
    }
  }

  #[must_use]
  pub fn unit(&self) -> PeriodUnit {
    match self {
      | Self::Day(nav) => nav.period().unit(),
      | Self::Week(nav) => {
        nav.period().unit()
      }
      | Self::Month(nav) => {
        nav.period().unit()
      }
    }
  }

  #[must_use]
  pub fn popover(&self) -> PopoverState {
    match self {
      | Self::Day(nav) => nav.popover(),
      | Self::Week(nav) => nav.popover(),
      | Self::Month(nav) => nav.popover()
    }
  }

  pub fn dispatch<F>(
    &mut self,
    event: NavEvent,
    selected: NaiveDate,
    ctx: &NavContext,
    on_change: &mut F
  ) -> bool
  where
    F: FnMut(NaiveDate)
  {
    match self {
      | Self::Day(nav) => {
        nav.dispatch(
          event, selected, ctx, on_change
        )
      }
      | Self::Week(nav) => {
        nav.dispatch(
          event, selected, ctx, on_change
        )
      }
      | Self::Month(nav) => {
        nav.dispatch(
          event, selected, ctx, on_change
        )
      }
    }
  }
}

#[derive(Debug, Clone)]
pub struct NavigationHost {
  ctx:       NavContext,
  navigator: AnyNavigator,
  selected:  NaiveDate
}

impl NavigationHost {
  #[must_use]
  pub fn new(
    ctx: NavContext,
    unit: PeriodUnit,
    week_start: Weekday,
    selected: NaiveDate
  ) -> Self {
    Self {
      ctx,
      navigator: AnyNavigator::for_unit(
        unit, week_start
      ),
      selected
    }
  }

  #[must_use]
  pub fn selected(&self) -> NaiveDate {
    self.selected
  }

  #[must_use]
  pub fn popover(&self) -> PopoverState {
    self.navigator.popover()
  }

  #[must_use]
  pub fn view(&self) -> NavigatorView {
    self
      .navigator
      .view(self.selected, &self.ctx)
  }

  /// Feeds one interaction to the
  /// navigator and adopts whatever date
  /// it reports. Returns whether a date
  /// was reported.
  pub fn handle(
    &mut self,
    event: NavEvent
  ) -> bool {
    let mut reported = None;
    let fired = self.navigator.dispatch(
      event,
      self.selected,
      &self.ctx,
      &mut |date| reported = Some(date)
    );

    if let Some(date) = reported {
      info!(
        unit = self.navigator.unit().as_key(),
        from = %self.selected,
        to = %date,
        "selected date changed"
      );
      self.selected = date;
    }
    fired
  }
}

/// One line of an interactive session.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum SessionCommand {
  Event(NavEvent),
  Show,
  Quit
}

impl SessionCommand {
  /// `Ok(None)` for blank lines and
  /// `#` comments.
  pub fn parse(
    line: &str
  ) -> anyhow::Result<Option<Self>> {
    let line = line.trim();
    if line.is_empty()
      || line.starts_with('#')
    {
      return Ok(None);
    }

    let (word, rest) = line
      .split_once(char::is_whitespace)
      .map_or((line, ""), |(w, r)| {
        (w, r.trim())
      });

    let command = match word
      .to_ascii_lowercase()
      .as_str()
    {
      | "prev" | "previous" => {
        Self::Event(NavEvent::Click(
          Control::PreviousArrow
        ))
      }
      | "next" => {
        Self::Event(NavEvent::Click(
          Control::NextArrow
        ))
      }
      | "open" => {
        Self::Event(NavEvent::Click(
          Control::Label
        ))
      }
      | "pick" => {
        let picked = if rest.is_empty() {
          None
        } else {
          Some(parse_date(rest)?)
        };
        Self::Event(
          NavEvent::PickerChange(picked)
        )
      }
      | "dismiss" | "close" => {
        Self::Event(NavEvent::Dismiss)
      }
      | "show" => Self::Show,
      | "quit" | "exit" => Self::Quit,
      | other => {
        return Err(anyhow!(
          "unknown session command: \
           {other}"
        ));
      }
    };
    Ok(Some(command))
  }
}
