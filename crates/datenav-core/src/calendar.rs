use anyhow::anyhow;
use chrono::{
  Datelike,
  Duration,
  NaiveDate,
  Weekday
};

/// Adds `days` to `date`, returning
/// `date` unchanged when the result
/// falls outside chrono's range.
#[must_use]
pub fn add_days(
  date: NaiveDate,
  days: i64
) -> NaiveDate {
  date
    .checked_add_signed(Duration::days(
      days
    ))
    .unwrap_or(date)
}

/// Moves `date` by whole months,
/// clamping the day-of-month to the
/// length of the target month.
#[must_use]
pub fn shift_months(
  date: NaiveDate,
  months: i32
) -> NaiveDate {
  let mut year = date.year();
  let mut month =
    date.month() as i32 + months;

  while month < 1 {
    month += 12;
    year = year.saturating_sub(1);
  }
  while month > 12 {
    month -= 12;
    year = year.saturating_add(1);
  }

  let month = month as u32;
  let day = date
    .day()
    .min(days_in_month(year, month));
  NaiveDate::from_ymd_opt(
    year, month, day
  )
  .unwrap_or(date)
}

#[must_use]
pub fn first_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  NaiveDate::from_ymd_opt(
    year, month, 1
  )
  .unwrap_or(NaiveDate::MIN)
}

#[must_use]
pub fn last_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  let (next_year, next_month) =
    if month >= 12 {
      (year.saturating_add(1), 1_u32)
    } else {
      (year, month + 1)
    };
  match NaiveDate::from_ymd_opt(
    next_year, next_month, 1
  ) {
    | Some(first) => add_days(first, -1),
    | None => NaiveDate::MAX
  }
}

#[must_use]
pub fn days_in_month(
  year: i32,
  month: u32
) -> u32 {
  last_day_of_month(year, month).day()
}

#[must_use]
pub fn start_of_week(
  day: NaiveDate,
  week_start: Weekday
) -> NaiveDate {
  let day_idx = day
    .weekday()
    .num_days_from_sunday()
    as i64;
  let start_idx = week_start
    .num_days_from_sunday()
    as i64;
  let diff =
    (7 + day_idx - start_idx) % 7;
  add_days(day, -diff)
}

/// Sunday-based index: 0 is Sunday, 6
/// is Saturday.
pub fn weekday_from_index(
  index: u8
) -> anyhow::Result<Weekday> {
  match index {
    | 0 => Ok(Weekday::Sun),
    | 1 => Ok(Weekday::Mon),
    | 2 => Ok(Weekday::Tue),
    | 3 => Ok(Weekday::Wed),
    | 4 => Ok(Weekday::Thu),
    | 5 => Ok(Weekday::Fri),
    | 6 => Ok(Weekday::Sat),
    | other => {
      Err(anyhow!(
        "week start index must be \
         0..=6 (0 = Sunday), got \
         {other}"
      ))
    }
  }
}

pub fn weekday_from_name(
  raw: &str
) -> anyhow::Result<Weekday> {
  let lowered =
    raw.trim().to_ascii_lowercase();
  match lowered.as_str() {
    | "sun" | "sunday" => {
      Ok(Weekday::Sun)
    }
    | "mon" | "monday" => {
      Ok(Weekday::Mon)
    }
    | "tue" | "tuesday" => {
      Ok(Weekday::Tue)
    }
    | "wed" | "wednesday" => {
      Ok(Weekday::Wed)
    }
    | "thu" | "thursday" => {
      Ok(Weekday::Thu)
    }
    | "fri" | "friday" => {
      Ok(Weekday::Fri)
    }
    | "sat" | "saturday" => {
      Ok(Weekday::Sat)
    }
    | _ => {
      Err(anyhow!(
        "unknown weekday: {raw}"
      ))
    }
  }
}

/// Accepts either a Sunday-based index
/// or a weekday name.
pub fn parse_week_start(
  raw: &str
) -> anyhow::Result<Weekday> {
  let trimmed = raw.trim();
  match trimmed.parse::<u8>() {
    | Ok(index) => {
      weekday_from_index(index)
    }
    | Err(_) => {
      weekday_from_name(trimmed)
    }
  }
}

pub fn parse_date(
  raw: &str
) -> anyhow::Result<NaiveDate> {
  NaiveDate::parse_from_str(
    raw.trim(),
    "%Y-%m-%d"
  )
  .map_err(|error| {
    anyhow!(
      "invalid date '{raw}' \
       (expected YYYY-MM-DD): \
       {error}"
    )
  })
}
