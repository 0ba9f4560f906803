//! Weekly timetable grid.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::input::{split_command, timestamped_name};
use super::{Blob, Widget, WidgetContext, WidgetError};
use crate::messaging::Message;
use crate::registry::ToolKind;

pub const DAYS: [&str; 5] = ["Mon", "Tue", "Wed", "Thu", "Fri"];
pub const HOURS: [&str; 6] = ["08:00", "10:00", "12:00", "14:00", "16:00", "18:00"];
pub const COLORS: [&str; 6] = ["blue", "emerald", "purple", "orange", "rose", "indigo"];

const CELL_WIDTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub subject: String,
    pub color: usize,
}

/// Accepts `mon`, `Monday`, `TUE`...
pub fn parse_day(input: &str) -> Option<usize> {
    let lower = input.trim().to_lowercase();
    if lower.len() < 3 {
        return None;
    }
    DAYS.iter()
        .position(|d| lower.starts_with(&d.to_lowercase()))
}

/// Accepts `08:00`, `8:00`, `8` or `08`.
pub fn parse_hour(input: &str) -> Option<usize> {
    let input = input.trim();
    let hour_part = input.strip_suffix(":00").unwrap_or(input);
    let hour: u32 = hour_part.parse().ok()?;
    HOURS.iter().position(|h| h[..2].parse::<u32>().ok() == Some(hour))
}

/// Colour by 1-based index or name.
pub fn parse_color(input: &str) -> Option<usize> {
    let input = input.trim().to_lowercase();
    if let Ok(n) = input.parse::<usize>() {
        return (1..=COLORS.len()).contains(&n).then(|| n - 1);
    }
    COLORS.iter().position(|c| *c == input)
}

#[derive(Debug, Clone, Default)]
pub struct Timetable {
    slots: BTreeMap<(usize, usize), Slot>,
    active_color: usize,
}

impl Timetable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_color(&self) -> usize {
        self.active_color
    }

    pub fn set_active_color(&mut self, color: usize) {
        self.active_color = color.min(COLORS.len() - 1);
    }

    pub fn get(&self, day: usize, hour: usize) -> Option<&Slot> {
        self.slots.get(&(day, hour))
    }

    /// Fill a slot with the active colour; an empty subject clears it.
    ///
    /// Returns false, leaving the grid untouched, when the slot is outside
    /// `DAYS` x `HOURS`.
    pub fn set(&mut self, day: usize, hour: usize, subject: &str) -> bool {
        if day >= DAYS.len() || hour >= HOURS.len() {
            return false;
        }
        let subject = subject.trim();
        if subject.is_empty() {
            self.slots.remove(&(day, hour));
        } else {
            self.slots.insert(
                (day, hour),
                Slot {
                    subject: subject.to_string(),
                    color: self.active_color,
                },
            );
        }
        true
    }

    pub fn reset(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The grid as fixed-width text, one row per hour.
    pub fn grid(&self) -> Vec<String> {
        let mut header = format!("{:<7}", "");
        for day in DAYS {
            header.push_str(&format!("{:<width$}", day, width = CELL_WIDTH));
        }
        let mut lines = vec![header.trim_end().to_string()];
        for (h, hour) in HOURS.iter().enumerate() {
            let mut row = format!("{:<7}", hour);
            for d in 0..DAYS.len() {
                let cell = match self.get(d, h) {
                    Some(slot) => truncate(&slot.subject, CELL_WIDTH - 2),
                    None => "-".to_string(),
                };
                row.push_str(&format!("{:<width$}", cell, width = CELL_WIDTH));
            }
            lines.push(row.trim_end().to_string());
        }
        lines
    }

    /// Every filled slot with its colour.
    pub fn legend(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|((d, h), slot)| {
                format!("{} {}  {} ({})", DAYS[*d], HOURS[*h], slot.subject, COLORS[slot.color])
            })
            .collect()
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}

const USAGE: &[(&str, &str)] = &[
    ("set <day> <hour> [subject]", "Fill a slot; no subject clears it"),
    ("color <1-6|name>", "Pick the colour for new slots"),
    ("reset", "Clear the whole grid"),
    ("export", "Save the grid as a text file"),
    ("show", "Show the grid"),
];

pub struct TimetableWidget {
    table: Timetable,
    export: Option<Blob>,
}

impl TimetableWidget {
    pub fn new() -> Self {
        Self {
            table: Timetable::new(),
            export: None,
        }
    }

    pub fn table(&self) -> &Timetable {
        &self.table
    }

    fn set(&mut self, arg: &str) -> Result<(), WidgetError> {
        const EXPECTED: &str = "set <day> <hour> [subject]";
        let mut parts = arg.splitn(3, char::is_whitespace);
        let day_arg = parts.next().ok_or(WidgetError::Usage(EXPECTED))?;
        let hour_arg = parts.next().ok_or(WidgetError::Usage(EXPECTED))?;
        let day = parse_day(day_arg)
            .ok_or_else(|| WidgetError::Invalid(format!("Unknown day: {}", day_arg)))?;
        let hour = parse_hour(hour_arg).ok_or_else(|| {
            WidgetError::Invalid(format!(
                "Unknown slot: {} (use one of {})",
                hour_arg,
                HOURS.join(", ")
            ))
        })?;
        self.table.set(day, hour, parts.next().unwrap_or(""));
        Ok(())
    }

    fn export(&mut self, ctx: &WidgetContext) -> Result<Message, WidgetError> {
        let mut lines = self.table.grid();
        lines.push(String::new());
        lines.extend(self.table.legend());
        let text = lines.join("\n") + "\n";
        let blob = self
            .export
            .insert(Blob::new(timestamped_name("timetable", "txt"), text.as_bytes())?);
        let dest = blob.save_to(&ctx.output_dir)?;
        Ok(Message::success(format!("Saved {}", dest.display())))
    }
}

impl Default for TimetableWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Widget for TimetableWidget {
    fn kind(&self) -> ToolKind {
        ToolKind::TimetableMaker
    }

    fn usage(&self) -> &'static [(&'static str, &'static str)] {
        USAGE
    }

    fn render(&self) -> Message {
        let mut lines = self.table.grid();
        lines.push(String::new());
        lines.push(format!(
            "Active colour: {} ({} slots filled)",
            COLORS[self.table.active_color()],
            self.table.len()
        ));
        Message::panel("Timetable Maker", lines)
    }

    async fn handle(
        &mut self,
        input: &str,
        ctx: &WidgetContext,
    ) -> Result<Vec<Message>, WidgetError> {
        let (cmd, arg) = split_command(input);
        match cmd.as_str() {
            "set" => self.set(arg)?,
            "color" | "colour" => {
                let color = parse_color(arg).ok_or_else(|| {
                    WidgetError::Invalid(format!("Pick one of {}", COLORS.join(", ")))
                })?;
                self.table.set_active_color(color);
            }
            "reset" => self.table.reset(),
            "export" | "save" => {
                let done = self.export(ctx)?;
                return Ok(vec![done]);
            }
            "show" | "" => {}
            _ => return Err(WidgetError::UnknownCommand(cmd)),
        }
        Ok(vec![self.render()])
    }
}
