use std::collections::BTreeMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use chrono::{
  Locale,
  NaiveDate,
  Weekday
};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{
  debug,
  info,
  warn
};

use crate::bounds::Boundaries;
use crate::calendar::{
  parse_date,
  parse_week_start,
  weekday_from_index
};

const CONFIG_FILE_NAME: &str =
  "datenav.toml";
const CONFIG_DIR_NAME: &str = "datenav";
const CONFIG_ENV_VAR: &str =
  "DATENAV_CONFIG";
pub const DEFAULT_LOCALE: &str = "en_US";
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Host-level settings shared by every
/// navigator: label locale, boundary
/// dates and the pass-through picker
/// properties.
#[derive(Debug, Clone)]
pub struct NavSettings {
  pub locale:       Locale,
  pub locale_name:  String,
  pub timezone:     Tz,
  pub week_start:   Weekday,
  pub boundaries:   Boundaries,
  pub picker_props:
    BTreeMap<String, serde_json::Value>,
  pub color:        bool,
  pub loaded_files: Vec<PathBuf>
}

impl Default for NavSettings {
  fn default() -> Self {
    Self {
      locale:       Locale::en_US,
      locale_name:  DEFAULT_LOCALE
        .to_string(),
      timezone:     chrono_tz::UTC,
      week_start:   Weekday::Sun,
      boundaries:   Boundaries::default(),
      picker_props: BTreeMap::new(),
      color:        true,
      loaded_files: vec![]
    }
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
  locale:     Option<String>,
  timezone:   Option<String>,
  color:      Option<bool>,
  week:       WeekSection,
  navigation: NavigationSection
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WeekSection {
  start_on: Option<toml::Value>
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NavigationSection {
  min_date: Option<String>,
  max_date: Option<String>,
  picker:   BTreeMap<String, toml::Value>
}

impl NavSettings {
  #[tracing::instrument(skip(
    config_override
  ))]
  pub fn load(
    config_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let settings = match resolve_config_path(
      config_override
    )? {
      | Some(path) => {
        info!(config = %path.display(), "loading navigation settings");
        Self::load_file(&path)?
      }
      | None => {
        warn!(
          "no datenav.toml found; \
           using defaults"
        );
        Self::default()
      }
    };

    settings.validate()?;
    Ok(settings)
  }

  #[tracing::instrument]
  pub fn load_file(
    path: &Path
  ) -> anyhow::Result<Self> {
    let path = expand_tilde(path);
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    let mut settings =
      Self::from_toml_str(
        &text,
        &path.display().to_string()
      )?;
    settings.loaded_files.push(path);
    Ok(settings)
  }

  /// Parses settings text. Bad values
  /// are logged and fall back to their
  /// defaults; only malformed TOML is an
  /// error.
  pub fn from_toml_str(
    text: &str,
    source: &str
  ) -> anyhow::Result<Self> {
    let file =
      toml::from_str::<SettingsFile>(text)
        .with_context(|| {
          format!(
            "failed to parse {source}"
          )
        })?;

    let mut settings = Self::default();

    if let Some(raw) = file.locale.as_deref()
      && let Some(locale) =
        parse_locale(raw, source)
    {
      settings.locale = locale;
      settings.locale_name =
        raw.trim().to_string();
    }

    if let Some(raw) =
      file.timezone.as_deref()
      && let Some(tz) =
        parse_timezone(raw, source)
    {
      settings.timezone = tz;
    }

    if let Some(color) = file.color {
      settings.color = color;
    }

    if let Some(raw) = file.week.start_on
      && let Some(week_start) =
        week_start_from_value(&raw, source)
    {
      settings.week_start = week_start;
    }

    settings.boundaries = Boundaries::new(
      file
        .navigation
        .min_date
        .as_deref()
        .and_then(|raw| {
          parse_boundary(
            raw,
            "min_date",
            source
          )
        }),
      file
        .navigation
        .max_date
        .as_deref()
        .and_then(|raw| {
          parse_boundary(
            raw,
            "max_date",
            source
          )
        })
    );

    settings.picker_props = file
      .navigation
      .picker
      .into_iter()
      .map(|(key, value)| {
        (key, toml_to_json(value))
      })
      .collect();

    debug!(
      locale = %settings.locale_name,
      timezone = %settings.timezone,
      week_start = %settings.week_start,
      min_date = ?settings.boundaries.min,
      max_date = ?settings.boundaries.max,
      picker_props = settings.picker_props.len(),
      "parsed navigation settings"
    );
    Ok(settings)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> anyhow::Result<()>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, value = %v, "applying override");
      self.apply_override(&key, &v)?;
    }
    Ok(())
  }

  fn apply_override(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    match key {
      | "locale" => {
        self.locale =
          parse_locale(value, "--rc")
            .ok_or_else(|| {
              anyhow!(
                "unknown locale: {value}"
              )
            })?;
        self.locale_name =
          value.trim().to_string();
      }
      | "timezone" => {
        self.timezone =
          parse_timezone(value, "--rc")
            .ok_or_else(|| {
              anyhow!(
                "unknown timezone: \
                 {value}"
              )
            })?;
      }
      | "color" => {
        self.color = parse_bool(value);
      }
      | "week.start_on" => {
        self.week_start =
          parse_week_start(value)?;
      }
      | "navigation.min_date" => {
        self.boundaries.min =
          optional_date(value)?;
      }
      | "navigation.max_date" => {
        self.boundaries.max =
          optional_date(value)?;
      }
      | other => {
        if let Some(prop) = other
          .strip_prefix(
            "navigation.picker."
          )
        {
          self.picker_props.insert(
            prop.to_string(),
            serde_json::Value::String(
              value.to_string()
            )
          );
        } else {
          warn!(key = %other, "ignoring unknown setting");
        }
      }
    }
    Ok(())
  }

  pub fn validate(
    &self
  ) -> anyhow::Result<()> {
    self
      .boundaries
      .validate()
      .context(
        "invalid navigation boundaries"
      )
  }
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_config_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(env_path) =
    std::env::var(CONFIG_ENV_VAR)
  {
    if env_path == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      env_path
    )));
  }

  let Some(config_dir) =
    dirs::config_dir()
  else {
    debug!(
      "no platform config directory"
    );
    return Ok(None);
  };
  let candidate = config_dir
    .join(CONFIG_DIR_NAME)
    .join(CONFIG_FILE_NAME);
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

pub fn parse_locale(
  raw: &str,
  source: &str
) -> Option<Locale> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  let normalized =
    trimmed.replace('-', "_");
  match Locale::try_from(
    normalized.as_str()
  ) {
    | Ok(locale) => Some(locale),
    | Err(_) => {
      tracing::error!(
        source,
        locale = %trimmed,
        "unknown locale"
      );
      None
    }
  }
}

pub fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => Some(tz),
    | Err(error) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %error,
        "invalid timezone id"
      );
      None
    }
  }
}

fn week_start_from_value(
  value: &toml::Value,
  source: &str
) -> Option<Weekday> {
  let parsed = match value {
    | toml::Value::Integer(index) => {
      u8::try_from(*index)
        .map_err(|_| {
          anyhow!(
            "week start index out of \
             range: {index}"
          )
        })
        .and_then(weekday_from_index)
    }
    | toml::Value::String(raw) => {
      parse_week_start(raw)
    }
    | other => {
      Err(anyhow!(
        "week start must be an index \
         or weekday name, got {other}"
      ))
    }
  };

  match parsed {
    | Ok(day) => Some(day),
    | Err(error) => {
      tracing::error!(
        source,
        %error,
        "invalid week start; using \
         default"
      );
      None
    }
  }
}

/// Datetimes become their TOML text
/// (`2024-01-01`); non-finite floats
/// become null.
fn toml_to_json(
  value: toml::Value
) -> serde_json::Value {
  match value {
    | toml::Value::String(text) => {
      serde_json::Value::String(text)
    }
    | toml::Value::Integer(number) => {
      serde_json::Value::from(number)
    }
    | toml::Value::Float(number) => {
      serde_json::Number::from_f64(number)
        .map_or(
          serde_json::Value::Null,
          serde_json::Value::Number
        )
    }
    | toml::Value::Boolean(flag) => {
      serde_json::Value::Bool(flag)
    }
    | toml::Value::Datetime(datetime) => {
      serde_json::Value::String(
        datetime.to_string()
      )
    }
    | toml::Value::Array(items) => {
      serde_json::Value::Array(
        items
          .into_iter()
          .map(toml_to_json)
          .collect()
      )
    }
    | toml::Value::Table(table) => {
      serde_json::Value::Object(
        table
          .into_iter()
          .map(|(key, value)| {
            (key, toml_to_json(value))
          })
          .collect()
      )
    }
  }
}

fn parse_boundary(
  raw: &str,
  key: &str,
  source: &str
) -> Option<NaiveDate> {
  if raw.trim().is_empty() {
    return None;
  }
  match parse_date(raw) {
    | Ok(date) => Some(date),
    | Err(error) => {
      tracing::error!(
        source,
        key,
        %error,
        "invalid boundary date; \
         leaving it unset"
      );
      None
    }
  }
}

fn optional_date(
  raw: &str
) -> anyhow::Result<Option<NaiveDate>> {
  let trimmed = raw.trim();
  if trimmed.is_empty()
    || trimmed
      .eq_ignore_ascii_case("none")
  {
    return Ok(None);
  }
  parse_date(trimmed).map(Some)
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn parse_bool(s: &str) -> bool {
  matches!(
    s.trim()
      .to_ascii_lowercase()
      .as_str(),
    "1" | "y" | "yes" | "on" | "true"
  )
}
