//! One navigator, parameterized by the
//! period it advances by. The popover
//! is the only state it owns; the
//! selected date and the settings come
//! from the host on every call.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{
  debug,
  trace
};

use crate::clock::{
  Clock,
  SystemClock
};
use crate::config::NavSettings;
use crate::period::{
  Day,
  Direction,
  Month,
  Period,
  PeriodUnit,
  PickerPane,
  Week
};

pub type DayNavigator = Navigator<Day>;
pub type WeekNavigator = Navigator<Week>;
pub type MonthNavigator = Navigator<Month>;

/// Read-only host configuration handed
/// to a navigator on every call.
#[derive(Clone)]
pub struct NavContext {
  pub settings: NavSettings,
  clock:        Arc<dyn Clock + Send + Sync>
}

impl NavContext {
  #[must_use]
  pub fn new(settings: NavSettings) -> Self {
    let clock =
      SystemClock::new(settings.timezone);
    Self {
      settings,
      clock: Arc::new(clock)
    }
  }

  #[must_use]
  pub fn with_clock<C>(
    mut self,
    clock: C
  ) -> Self
  where
    C: Clock + Send + Sync + 'static
  {
    self.clock = Arc::new(clock);
    self
  }

  #[must_use]
  pub fn today(&self) -> NaiveDate {
    self.clock.today()
  }
}

impl std::fmt::Debug for NavContext {
  fn fmt(
    &self,
    f: &mut std::fmt::Formatter<'_>
  ) -> std::fmt::Result {
    f.debug_struct("NavContext")
      .field("settings", &self.settings)
      .finish_non_exhaustive()
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
#[serde(rename_all = "snake_case")]
pub enum Control {
  PreviousArrow,
  Label,
  NextArrow
}

impl Control {
  #[must_use]
  pub fn arrow(
    direction: Direction
  ) -> Self {
    match direction {
      | Direction::Previous => {
        Self::PreviousArrow
      }
      | Direction::Next => Self::NextArrow
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
pub enum VerticalOrigin {
  Top,
  Bottom
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
pub enum HorizontalOrigin {
  Left,
  Right
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct AnchorOrigin {
  pub vertical:   VerticalOrigin,
  pub horizontal: HorizontalOrigin
}

/// The element the popover hangs from.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct Anchor {
  pub control: Control,
  pub origin:  AnchorOrigin
}

impl Anchor {
  /// Popover below the label, aligned
  /// to its left edge.
  #[must_use]
  pub fn label() -> Self {
    Self {
      control: Control::Label,
      origin:  AnchorOrigin {
        vertical:   VerticalOrigin::Bottom,
        horizontal: HorizontalOrigin::Left
      }
    }
  }
}

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq,
)]
pub enum PopoverState {
  #[default]
  Closed,
  Open {
    anchor: Anchor
  }
}

impl PopoverState {
  #[must_use]
  pub fn is_open(&self) -> bool {
    matches!(self, Self::Open { .. })
  }

  #[must_use]
  pub fn anchor(&self) -> Option<Anchor> {
    match self {
      | Self::Open { anchor } => {
        Some(*anchor)
      }
      | Self::Closed => None
    }
  }
}

/// User interactions routed through
/// [`Navigator::dispatch`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum NavEvent {
  Click(Control),
  PickerChange(Option<NaiveDate>),
  Dismiss
}

#[derive(
  Debug, Clone, PartialEq, Eq, Serialize,
)]
pub struct ArrowView {
  pub direction:  Direction,
  pub disabled:   bool,
  pub aria_label: &'static str
}

#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct PickerView {
  pub anchor:  Anchor,
  pub open_to: PickerPane,
  pub panes:   &'static [PickerPane],
  pub value:   NaiveDate,
  pub min_date: Option<NaiveDate>,
  pub max_date: Option<NaiveDate>,
  pub props:
    BTreeMap<String, serde_json::Value>
}

/// Everything a toolkit needs to draw
/// one navigator.
#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct NavigatorView {
  pub unit:             PeriodUnit,
  pub label:            String,
  pub label_aria_label: &'static str,
  pub previous:         ArrowView,
  pub next:             ArrowView,
  pub picker:           Option<PickerView>
}

impl NavigatorView {
  #[must_use]
  pub fn arrow(
    &self,
    direction: Direction
  ) -> &ArrowView {
    match direction {
      | Direction::Previous => {
        &self.previous
      }
      | Direction::Next => &self.next
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct Navigator<P> {
  period:  P,
  popover: PopoverState
}

impl<P: Period> Navigator<P> {
  #[must_use]
  pub fn new(period: P) -> Self {
    Self {
      period,
      popover: PopoverState::Closed
    }
  }

  #[must_use]
  pub fn period(&self) -> &P {
    &self.period
  }

  #[must_use]
  pub fn popover(&self) -> PopoverState {
    self.popover
  }

  #[must_use]
  pub fn is_disabled(
    &self,
    selected: NaiveDate,
    direction: Direction,
    ctx: &NavContext
  ) -> bool {
    self.period.is_disabled(
      selected,
      direction,
      &ctx.settings.boundaries
    )
  }

  #[must_use]
  pub fn view(
    &self,
    selected: NaiveDate,
    ctx: &NavContext
  ) -> NavigatorView {
    let unit = self.period.unit();
    let arrow = |direction| {
      ArrowView {
        direction,
        disabled: self.is_disabled(
          selected, direction, ctx
        ),
        aria_label: unit
          .arrow_aria_label(direction)
      }
    };

    let picker =
      self.popover.anchor().map(|anchor| {
        let layout =
          self.period.picker_layout();
        PickerView {
          anchor,
          open_to: layout.open_to,
          panes: layout.panes,
          value: selected,
          min_date: ctx
            .settings
            .boundaries
            .min,
          max_date: ctx
            .settings
            .boundaries
            .max,
          props: ctx
            .settings
            .picker_props
            .clone()
        }
      });

    NavigatorView {
      unit,
      label: self.period.label(
        selected,
        ctx.settings.locale
      ),
      label_aria_label: unit
        .label_aria_label(),
      previous: arrow(
        Direction::Previous
      ),
      next: arrow(Direction::Next),
      picker
    }
  }

  /// Reports the previous period
  /// unconditionally; refusing a
  /// disabled arrow happens in
  /// [`Self::dispatch`].
  pub fn handle_previous<F>(
    &self,
    selected: NaiveDate,
    on_change: &mut F
  ) where
    F: FnMut(NaiveDate)
  {
    self.handle_arrow(
      selected,
      Direction::Previous,
      on_change
    );
  }

  pub fn handle_next<F>(
    &self,
    selected: NaiveDate,
    on_change: &mut F
  ) where
    F: FnMut(NaiveDate)
  {
    self.handle_arrow(
      selected,
      Direction::Next,
      on_change
    );
  }

  fn handle_arrow<F>(
    &self,
    selected: NaiveDate,
    direction: Direction,
    on_change: &mut F
  ) where
    F: FnMut(NaiveDate)
  {
    let target =
      self.period.step(selected, direction);
    debug!(
      unit = self.period.unit().as_key(),
      direction = direction.as_key(),
      %selected,
      %target,
      "arrow activated"
    );
    on_change(target);
  }

  /// Closed -> Open. Re-opening while
  /// open keeps the existing anchor.
  pub fn open(&mut self, anchor: Anchor) {
    if self.popover.is_open() {
      trace!(
        "popover already open; ignoring"
      );
      return;
    }
    debug!(
      unit = self.period.unit().as_key(),
      ?anchor,
      "popover opened"
    );
    self.popover =
      PopoverState::Open { anchor };
  }

  pub fn close(&mut self) {
    if self.popover.is_open() {
      debug!(
        unit = self.period.unit().as_key(),
        "popover closed"
      );
    }
    self.popover = PopoverState::Closed;
  }

  /// Forwards the picked date verbatim,
  /// or today when the picker yields
  /// nothing, then closes the popover.
  pub fn handle_pick<F>(
    &mut self,
    picked: Option<NaiveDate>,
    ctx: &NavContext,
    on_change: &mut F
  ) where
    F: FnMut(NaiveDate)
  {
    let date = picked
      .unwrap_or_else(|| ctx.today());
    debug!(
      unit = self.period.unit().as_key(),
      ?picked,
      %date,
      "picker selection"
    );
    on_change(date);
    self.close();
  }

  /// Routes one interaction the way the
  /// toolkit would: clicks on disabled
  /// arrows never reach a handler and
  /// picker changes only arrive while
  /// the picker is mounted. Returns
  /// whether `on_change` fired.
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
    match event {
      | NavEvent::Click(
        Control::PreviousArrow
      ) => {
        self.click_arrow(
          selected,
          Direction::Previous,
          ctx,
          on_change
        )
      }
      | NavEvent::Click(
        Control::NextArrow
      ) => {
        self.click_arrow(
          selected,
          Direction::Next,
          ctx,
          on_change
        )
      }
      | NavEvent::Click(Control::Label) => {
        self.open(Anchor::label());
        false
      }
      | NavEvent::PickerChange(picked) => {
        if !self.popover.is_open() {
          debug!(
            ?picked,
            "picker change without open \
             popover; ignoring"
          );
          return false;
        }
        self.handle_pick(
          picked, ctx, on_change
        );
        true
      }
      | NavEvent::Dismiss => {
        self.close();
        false
      }
    }
  }

  fn click_arrow<F>(
    &self,
    selected: NaiveDate,
    direction: Direction,
    ctx: &NavContext,
    on_change: &mut F
  ) -> bool
  where
    F: FnMut(NaiveDate)
  {
    if self.is_disabled(
      selected, direction, ctx
    ) {
      debug!(
        unit = self.period.unit().as_key(),
        direction = direction.as_key(),
        %selected,
        "click on disabled arrow dropped"
      );
      return false;
    }
    self.handle_arrow(
      selected, direction, on_change
    );
    true
  }
}

impl DayNavigator {
  #[must_use]
  pub fn day() -> Self {
    Self::new(Day)
  }
}

impl WeekNavigator {
  #[must_use]
  pub fn week(
    week_start: chrono::Weekday
  ) -> Self {
    Self::new(Week::new(week_start))
  }
}

impl MonthNavigator {
  #[must_use]
  pub fn month() -> Self {
    Self::new(Month)
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    NaiveDate,
    Weekday
  };

  use super::{
    Anchor,
    Control,
    DayNavigator,
    MonthNavigator,
    NavContext,
    NavEvent,
    PopoverState,
    WeekNavigator
  };
  use crate::bounds::Boundaries;
  use crate::clock::FixedClock;
  use crate::config::NavSettings;
  use crate::period::{
    Direction,
    PickerPane
  };

  fn ymd(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  fn ctx_with(
    boundaries: Boundaries
  ) -> NavContext {
    let settings = NavSettings {
      boundaries,
      ..NavSettings::default()
    };
    NavContext::new(settings)
      .with_clock(FixedClock(ymd(
        2030, 6, 15
      )))
  }

  #[test]
  fn starts_closed_without_picker() {
    let nav = DayNavigator::day();
    let view = nav.view(
      ymd(2024, 1, 10),
      &ctx_with(Boundaries::default())
    );
    assert_eq!(
      nav.popover(),
      PopoverState::Closed
    );
    assert!(view.picker.is_none());
    assert_eq!(
      view.label,
      "10 January 2024"
    );
    assert_eq!(
      view.label_aria_label,
      "selected date"
    );
    assert!(!view.previous.disabled);
    assert!(!view.next.disabled);
  }

  #[test]
  fn arrow_click_reports_new_date() {
    let ctx =
      ctx_with(Boundaries::default());
    let mut nav = DayNavigator::day();
    let mut seen = Vec::new();
    let fired = nav.dispatch(
      NavEvent::Click(Control::NextArrow),
      ymd(2024, 1, 31),
      &ctx,
      &mut |date| seen.push(date)
    );
    assert!(fired);
    assert_eq!(seen, vec![ymd(
      2024, 2, 1
    )]);
  }

  #[test]
  fn disabled_arrow_click_is_dropped() {
    let ctx = ctx_with(Boundaries::new(
      Some(ymd(2024, 1, 9)),
      Some(ymd(2024, 1, 10))
    ));
    let mut nav = DayNavigator::day();
    let mut calls = 0;
    let selected = ymd(2024, 1, 10);

    let view = nav.view(selected, &ctx);
    assert!(view.previous.disabled);
    assert!(view.next.disabled);

    for control in [
      Control::PreviousArrow,
      Control::NextArrow
    ] {
      let fired = nav.dispatch(
        NavEvent::Click(control),
        selected,
        &ctx,
        &mut |_| calls += 1
      );
      assert!(!fired);
    }
    assert_eq!(calls, 0);
  }

  #[test]
  fn handlers_themselves_do_not_guard() {
    let ctx = ctx_with(Boundaries::new(
      None,
      Some(ymd(2024, 1, 10))
    ));
    let nav = DayNavigator::day();
    let selected = ymd(2024, 1, 10);
    assert!(nav.is_disabled(
      selected,
      Direction::Next,
      &ctx
    ));

    let mut seen = None;
    nav.handle_next(selected, &mut |date| {
      seen = Some(date);
    });
    assert_eq!(seen, Some(ymd(2024, 1, 11)));
  }

  #[test]
  fn label_click_opens_picker_at_label() {
    let ctx =
      ctx_with(Boundaries::default());
    let mut nav = MonthNavigator::month();
    let fired = nav.dispatch(
      NavEvent::Click(Control::Label),
      ymd(2024, 5, 20),
      &ctx,
      &mut |_| {}
    );
    assert!(!fired);
    assert_eq!(
      nav.popover(),
      PopoverState::Open {
        anchor: Anchor::label()
      }
    );

    let view =
      nav.view(ymd(2024, 5, 20), &ctx);
    let picker =
      view.picker.expect("picker open");
    assert_eq!(
      picker.open_to,
      PickerPane::Month
    );
    assert_eq!(
      picker.value,
      ymd(2024, 5, 20)
    );
  }

  #[test]
  fn reopening_keeps_first_anchor() {
    let mut nav = DayNavigator::day();
    let first = Anchor::label();
    nav.open(first);
    let mut other = Anchor::label();
    other.control = Control::NextArrow;
    nav.open(other);
    assert_eq!(
      nav.popover().anchor(),
      Some(first)
    );
  }

  #[test]
  fn picker_selection_emits_then_closes() {
    let ctx =
      ctx_with(Boundaries::default());
    let mut nav =
      WeekNavigator::week(Weekday::Mon);
    nav.open(Anchor::label());

    let mut seen = Vec::new();
    let picked = ymd(2024, 1, 10);
    let fired = nav.dispatch(
      NavEvent::PickerChange(Some(picked)),
      ymd(2023, 12, 1),
      &ctx,
      &mut |date| seen.push(date)
    );
    assert!(fired);
    // Not normalized to the week start.
    assert_eq!(seen, vec![picked]);
    assert!(!nav.popover().is_open());
  }

  #[test]
  fn empty_picker_selection_uses_today() {
    let ctx =
      ctx_with(Boundaries::default());
    let mut nav = DayNavigator::day();
    nav.open(Anchor::label());

    let mut seen = Vec::new();
    nav.dispatch(
      NavEvent::PickerChange(None),
      ymd(2024, 1, 10),
      &ctx,
      &mut |date| seen.push(date)
    );
    assert_eq!(seen, vec![ymd(
      2030, 6, 15
    )]);
    assert!(!nav.popover().is_open());
  }

  #[test]
  fn picked_date_skips_boundary_checks() {
    let ctx = ctx_with(Boundaries::new(
      Some(ymd(2024, 1, 1)),
      Some(ymd(2024, 1, 31))
    ));
    let mut nav = DayNavigator::day();
    nav.open(Anchor::label());
    let mut seen = Vec::new();
    nav.dispatch(
      NavEvent::PickerChange(Some(ymd(
        2025, 1, 1
      ))),
      ymd(2024, 1, 10),
      &ctx,
      &mut |date| seen.push(date)
    );
    assert_eq!(seen, vec![ymd(2025, 1, 1)]);
  }

  #[test]
  fn picker_change_while_closed_is_ignored()
  {
    let ctx =
      ctx_with(Boundaries::default());
    let mut nav = DayNavigator::day();
    let mut calls = 0;
    let fired = nav.dispatch(
      NavEvent::PickerChange(None),
      ymd(2024, 1, 10),
      &ctx,
      &mut |_| calls += 1
    );
    assert!(!fired);
    assert_eq!(calls, 0);
  }

  #[test]
  fn dismiss_closes_without_change() {
    let ctx =
      ctx_with(Boundaries::default());
    let mut nav = DayNavigator::day();
    nav.open(Anchor::label());
    let mut calls = 0;
    let fired = nav.dispatch(
      NavEvent::Dismiss,
      ymd(2024, 1, 10),
      &ctx,
      &mut |_| calls += 1
    );
    assert!(!fired);
    assert_eq!(calls, 0);
    assert_eq!(
      nav.popover(),
      PopoverState::Closed
    );
  }

  #[test]
  fn month_view_reflects_max_boundary() {
    let ctx = ctx_with(Boundaries::new(
      None,
      Some(ymd(2024, 1, 31))
    ));
    let nav = MonthNavigator::month();
    let view =
      nav.view(ymd(2024, 1, 15), &ctx);
    assert_eq!(view.label, "January 2024");
    assert!(view.next.disabled);
    assert!(!view.previous.disabled);
    assert_eq!(
      view.next.aria_label,
      "next month"
    );
  }
}
