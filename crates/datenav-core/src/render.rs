use std::io::{self, IsTerminal, Write};

use chrono::NaiveDate;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::config::NavSettings;
use crate::navigator::{ArrowView, NavigatorView, PickerView};
use crate::period::Direction;

const MIN_LABEL_WIDTH: usize = 20;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(settings: &NavSettings) -> Self {
        Self {
            color: settings.color && io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn write_json<W: Write, T: Serialize>(&self, mut out: W, value: &T) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut out, value)?;
        writeln!(out)?;
        Ok(())
    }

    pub fn write_view<W: Write>(&self, mut out: W, view: &NavigatorView) -> anyhow::Result<()> {
        let label_width = UnicodeWidthStr::width(view.label.as_str()).max(MIN_LABEL_WIDTH);
        let label = self.paint(&center(&view.label, label_width), "1");

        writeln!(
            out,
            "{}  {}  {}",
            self.arrow(&view.previous),
            label,
            self.arrow(&view.next)
        )?;

        if let Some(picker) = &view.picker {
            self.write_picker(&mut out, picker)?;
        }
        Ok(())
    }

    fn write_picker<W: Write>(&self, out: &mut W, picker: &PickerView) -> anyhow::Result<()> {
        let panes = picker
            .panes
            .iter()
            .map(|pane| format!("{pane:?}").to_ascii_lowercase())
            .collect::<Vec<_>>()
            .join(", ");

        writeln!(
            out,
            "  picker  open to {} ({panes})",
            format!("{:?}", picker.open_to).to_ascii_lowercase()
        )?;
        writeln!(out, "  value   {}", picker.value.format("%Y-%m-%d"))?;
        writeln!(out, "  min     {}", format_bound(picker.min_date))?;
        writeln!(out, "  max     {}", format_bound(picker.max_date))?;

        if !picker.props.is_empty() {
            let props = picker
                .props
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(out, "  props   {props}")?;
        }
        Ok(())
    }

    fn arrow(&self, arrow: &ArrowView) -> String {
        let glyph = match arrow.direction {
            Direction::Previous => "‹",
            Direction::Next => "›",
        };
        if !arrow.disabled {
            return glyph.to_string();
        }
        if self.color {
            self.paint(glyph, "2")
        } else {
            "·".to_string()
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn center(text: &str, width: usize) -> String {
    let visible = UnicodeWidthStr::width(text);
    let padding = width.saturating_sub(visible);
    let left = padding / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(padding - left))
}

fn format_bound(date: Option<NaiveDate>) -> String {
    date.map(|value| value.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}
