use anyhow::anyhow;
use chrono::NaiveDate;
use serde::Serialize;

/// Host-supplied minimum and maximum
/// selectable dates. Either side may be
/// absent.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct Boundaries {
  pub min: Option<NaiveDate>,
  pub max: Option<NaiveDate>
}

impl Boundaries {
  #[must_use]
  pub fn new(
    min: Option<NaiveDate>,
    max: Option<NaiveDate>
  ) -> Self {
    Self { min, max }
  }

  /// True when moving back to
  /// `candidate` must be refused:
  /// `candidate` is on or before `min`.
  #[must_use]
  pub fn blocks_previous(
    &self,
    candidate: NaiveDate
  ) -> bool {
    self
      .min
      .is_some_and(|min| candidate <= min)
  }

  /// True when `candidate` lies strictly
  /// after `max`.
  #[must_use]
  pub fn blocks_next(
    &self,
    candidate: NaiveDate
  ) -> bool {
    self
      .max
      .is_some_and(|max| candidate > max)
  }

  pub fn validate(
    &self
  ) -> anyhow::Result<()> {
    if let (Some(min), Some(max)) =
      (self.min, self.max)
      && min > max
    {
      return Err(anyhow!(
        "navigation min_date {min} is \
         after max_date {max}"
      ));
    }
    Ok(())
  }
}
