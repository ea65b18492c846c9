//! The calendar units a navigator can
//! advance by, each expressed as the
//! same small capability set: a label,
//! a one-step move in either direction
//! and a boundary check for that move.

use chrono::{
  Datelike,
  Locale,
  NaiveDate,
  NaiveTime,
  Weekday
};
use serde::Serialize;

use crate::bounds::Boundaries;
use crate::calendar::{
  add_days,
  first_day_of_month,
  last_day_of_month,
  shift_months,
  start_of_week
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Previous,
  Next
}

impl Direction {
  #[must_use]
  pub fn offset(self) -> i32 {
    match self {
      | Self::Previous => -1,
      | Self::Next => 1
    }
  }

  #[must_use]
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Previous => "previous",
      | Self::Next => "next"
    }
  }

  #[must_use]
  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key {
      | "prev" | "previous" => {
        Some(Self::Previous)
      }
      | "next" => Some(Self::Next),
      | _ => None
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
  Day,
  Week,
  Month
}

impl PeriodUnit {
  #[must_use]
  pub fn all() -> [Self; 3] {
    [Self::Day, Self::Week, Self::Month]
  }

  #[must_use]
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Day => "day",
      | Self::Week => "week",
      | Self::Month => "month"
    }
  }

  #[must_use]
  pub fn label(self) -> &'static str {
    match self {
      | Self::Day => "Day",
      | Self::Week => "Week",
      | Self::Month => "Month"
    }
  }

  #[must_use]
  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key {
      | "day" => Some(Self::Day),
      | "week" => Some(Self::Week),
      | "month" => Some(Self::Month),
      | _ => None
    }
  }

  /// Accessible name of the arrow
  /// moving in `direction`.
  #[must_use]
  pub fn arrow_aria_label(
    self,
    direction: Direction
  ) -> &'static str {
    match (self, direction) {
      | (Self::Day, Direction::Previous) => {
        "previous day"
      }
      | (Self::Day, Direction::Next) => {
        "next day"
      }
      | (
        Self::Week,
        Direction::Previous
      ) => "previous week",
      | (Self::Week, Direction::Next) => {
        "next week"
      }
      | (
        Self::Month,
        Direction::Previous
      ) => "previous month",
      | (Self::Month, Direction::Next) => {
        "next month"
      }
    }
  }

  #[must_use]
  pub fn label_aria_label(
    self
  ) -> &'static str {
    match self {
      | Self::Day => "selected date",
      | Self::Week => "selected week",
      | Self::Month => "selected month"
    }
  }

  #[must_use]
  pub fn picker_layout(
    self
  ) -> PickerLayout {
    match self {
      | Self::Day | Self::Week => {
        PickerLayout {
          open_to: PickerPane::Day,
          panes:   &[
            PickerPane::Month,
            PickerPane::Day
          ]
        }
      }
      | Self::Month => {
        PickerLayout {
          open_to: PickerPane::Month,
          panes:   &[
            PickerPane::Year,
            PickerPane::Month
          ]
        }
      }
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PickerPane {
  Year,
  Month,
  Day
}

/// Which panes the popover calendar
/// offers and which one it opens on.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct PickerLayout {
  pub open_to: PickerPane,
  pub panes:   &'static [PickerPane]
}

pub trait Period {
  fn unit(&self) -> PeriodUnit;

  fn label(
    &self,
    date: NaiveDate,
    locale: Locale
  ) -> String;

  /// The date reported to the host when
  /// the arrow in `direction` is used.
  fn step(
    &self,
    date: NaiveDate,
    direction: Direction
  ) -> NaiveDate;

  fn is_disabled(
    &self,
    date: NaiveDate,
    direction: Direction,
    bounds: &Boundaries
  ) -> bool;

  fn picker_layout(
    &self
  ) -> PickerLayout {
    self.unit().picker_layout()
  }

  fn previous(
    &self,
    date: NaiveDate
  ) -> NaiveDate {
    self.step(date, Direction::Previous)
  }

  fn next(
    &self,
    date: NaiveDate
  ) -> NaiveDate {
    self.step(date, Direction::Next)
  }

  fn is_previous_disabled(
    &self,
    date: NaiveDate,
    bounds: &Boundaries
  ) -> bool {
    self.is_disabled(
      date,
      Direction::Previous,
      bounds
    )
  }

  fn is_next_disabled(
    &self,
    date: NaiveDate,
    bounds: &Boundaries
  ) -> bool {
    self.is_disabled(
      date,
      Direction::Next,
      bounds
    )
  }
}

pub(crate) fn format_date(
  date: NaiveDate,
  pattern: &str,
  locale: Locale
) -> String {
  date
    .and_time(NaiveTime::MIN)
    .and_utc()
    .format_localized(pattern, locale)
    .to_string()
}

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq,
)]
pub struct Day;

impl Period for Day {
  fn unit(&self) -> PeriodUnit {
    PeriodUnit::Day
  }

  fn label(
    &self,
    date: NaiveDate,
    locale: Locale
  ) -> String {
    format_date(date, "%d %B %Y", locale)
  }

  fn step(
    &self,
    date: NaiveDate,
    direction: Direction
  ) -> NaiveDate {
    add_days(
      date,
      i64::from(direction.offset())
    )
  }

  fn is_disabled(
    &self,
    date: NaiveDate,
    direction: Direction,
    bounds: &Boundaries
  ) -> bool {
    let candidate =
      self.step(date, direction);
    match direction {
      | Direction::Previous => {
        bounds.blocks_previous(candidate)
      }
      | Direction::Next => {
        bounds.blocks_next(candidate)
      }
    }
  }
}

/// Inclusive seven-day span.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct WeekRange {
  pub start: NaiveDate,
  pub end:   NaiveDate
}

impl WeekRange {
  #[must_use]
  pub fn contains(
    &self,
    date: NaiveDate
  ) -> bool {
    self.start <= date && date <= self.end
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct Week {
  pub week_start: Weekday
}

impl Week {
  #[must_use]
  pub fn new(week_start: Weekday) -> Self {
    Self { week_start }
  }

  #[must_use]
  pub fn bounds(
    &self,
    date: NaiveDate
  ) -> WeekRange {
    let start =
      start_of_week(date, self.week_start);
    WeekRange {
      start,
      end: add_days(start, 6)
    }
  }

  #[must_use]
  pub fn range_label(
    range: WeekRange,
    locale: Locale
  ) -> String {
    format!(
      "{} - {}",
      format_date(range.start, "%d", locale),
      format_date(
        range.end,
        "%d %b %Y",
        locale
      )
    )
  }
}

impl Default for Week {
  fn default() -> Self {
    Self::new(Weekday::Sun)
  }
}

impl Period for Week {
  fn unit(&self) -> PeriodUnit {
    PeriodUnit::Week
  }

  fn label(
    &self,
    date: NaiveDate,
    locale: Locale
  ) -> String {
    Self::range_label(
      self.bounds(date),
      locale
    )
  }

  fn step(
    &self,
    date: NaiveDate,
    direction: Direction
  ) -> NaiveDate {
    let range = self.bounds(date);
    match direction {
      | Direction::Previous => {
        add_days(range.start, -1)
      }
      | Direction::Next => {
        add_days(range.end, 1)
      }
    }
  }

  fn is_disabled(
    &self,
    date: NaiveDate,
    direction: Direction,
    bounds: &Boundaries
  ) -> bool {
    let candidate =
      self.step(date, direction);
    match direction {
      | Direction::Previous => {
        bounds.blocks_previous(candidate)
      }
      | Direction::Next => {
        bounds.blocks_next(candidate)
      }
    }
  }
}

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq,
)]
pub struct Month;

impl Period for Month {
  fn unit(&self) -> PeriodUnit {
    PeriodUnit::Month
  }

  fn label(
    &self,
    date: NaiveDate,
    locale: Locale
  ) -> String {
    format_date(date, "%B %Y", locale)
  }

  fn step(
    &self,
    date: NaiveDate,
    direction: Direction
  ) -> NaiveDate {
    shift_months(date, direction.offset())
  }

  // Previous is blocked only once the
  // whole prior month sits at or before
  // min; next once the following month
  // starts beyond max.
  fn is_disabled(
    &self,
    date: NaiveDate,
    direction: Direction,
    bounds: &Boundaries
  ) -> bool {
    let target =
      self.step(date, direction);
    match direction {
      | Direction::Previous => {
        bounds.blocks_previous(
          last_day_of_month(
            target.year(),
            target.month()
          )
        )
      }
      | Direction::Next => {
        bounds.blocks_next(
          first_day_of_month(
            target.year(),
            target.month()
          )
        )
      }
    }
  }
}
