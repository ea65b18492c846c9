use chrono::{
  NaiveDate,
  Utc
};
use chrono_tz::Tz;

/// Source of "today" for picker
/// selections that come back empty.
pub trait Clock {
  fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
  pub timezone: Tz
}

impl SystemClock {
  #[must_use]
  pub fn new(timezone: Tz) -> Self {
    Self { timezone }
  }
}

impl Clock for SystemClock {
  fn today(&self) -> NaiveDate {
    today_in_timezone(self.timezone)
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
  fn today(&self) -> NaiveDate {
    self.0
  }
}

#[must_use]
pub fn today_in_timezone(
  timezone: Tz
) -> NaiveDate {
  Utc::now()
    .with_timezone(&timezone)
    .date_naive()
}
