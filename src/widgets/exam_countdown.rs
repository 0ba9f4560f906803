//! Exam countdown list.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::seq::IndexedRandom;
use uuid::Uuid;

use super::input::{parse_or, split_command};
use super::{Widget, WidgetContext, WidgetError};
use crate::messaging::Message;
use crate::registry::ToolKind;

pub const EXAM_COLORS: [&str; 5] = ["primary", "indigo", "rose", "emerald", "orange"];

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Urgent,
    Soon,
    Normal,
}

impl Urgency {
    pub fn for_days(days: i64) -> Self {
        if days <= 2 {
            Urgency::Urgent
        } else if days <= 7 {
            Urgency::Soon
        } else {
            Urgency::Normal
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Urgency::Urgent => "Urgent",
            Urgency::Soon => "Soon",
            Urgency::Normal => "Normal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exam {
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub color: &'static str,
}

/// Whole days until midnight UTC of `date`, rounded up, never negative.
pub fn days_left(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let seconds = (start - now).num_milliseconds() as f64 / 1000.0;
    (seconds / SECONDS_PER_DAY).ceil().max(0.0) as i64
}

/// Exams kept in date order.
#[derive(Debug, Clone, Default)]
pub struct ExamList {
    exams: Vec<Exam>,
}

impl ExamList {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two example exams, 4 and 12 days from `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let mut list = Self::new();
        list.push("Mathematics Final", (now + Duration::days(4)).date_naive(), "primary");
        list.push("Science Presentation", (now + Duration::days(12)).date_naive(), "indigo");
        list
    }

    fn push(&mut self, name: &str, date: NaiveDate, color: &'static str) -> &Exam {
        let exam = Exam {
            id: Uuid::new_v4(),
            name: name.to_string(),
            date,
            color,
        };
        // Insert after any exam on the same day so ties keep entry order.
        let at = self.exams.partition_point(|e| e.date <= date);
        self.exams.insert(at, exam);
        &self.exams[at]
    }

    /// Add with a random colour.
    pub fn add(&mut self, name: &str, date: NaiveDate) -> &Exam {
        let color = EXAM_COLORS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(EXAM_COLORS[0]);
        self.push(name, date, color)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Exam> {
        let at = self.exams.iter().position(|e| e.id == id)?;
        Some(self.exams.remove(at))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Exam> {
        self.exams.iter()
    }

    pub fn len(&self) -> usize {
        self.exams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }

    pub fn lines(&self, now: DateTime<Utc>) -> Vec<String> {
        if self.exams.is_empty() {
            return vec!["No exams tracked. Add one with 'add <YYYY-MM-DD> <name>'".to_string()];
        }
        self.exams
            .iter()
            .enumerate()
            .map(|(i, exam)| {
                let days = days_left(exam.date, now);
                format!(
                    "{}. {:<28} {}  {:>3} days left  [{}] ({})",
                    i + 1,
                    exam.name,
                    exam.date.format("%Y-%m-%d"),
                    days,
                    Urgency::for_days(days).label(),
                    exam.color
                )
            })
            .collect()
    }
}

const USAGE: &[(&str, &str)] = &[
    ("add <YYYY-MM-DD> <name>", "Track a new exam"),
    ("remove <n>", "Stop tracking the n-th exam"),
    ("list", "Show exams by date"),
];

pub struct ExamWidget {
    exams: ExamList,
}

impl ExamWidget {
    pub fn new() -> Self {
        Self {
            exams: ExamList::seeded(Utc::now()),
        }
    }

    pub fn exams(&self) -> &ExamList {
        &self.exams
    }

    fn add(&mut self, arg: &str) -> Result<(), WidgetError> {
        const EXPECTED: &str = "add <YYYY-MM-DD> <name>";
        let (date, name) = arg
            .split_once(char::is_whitespace)
            .ok_or(WidgetError::Usage(EXPECTED))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(WidgetError::Usage(EXPECTED));
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| WidgetError::Invalid(format!("Not a YYYY-MM-DD date: {}", date)))?;
        let exam = self.exams.add(name, date);
        tracing::debug!(name = %exam.name, date = %exam.date, "Exam added");
        Ok(())
    }

    fn remove(&mut self, index: usize) -> Result<(), WidgetError> {
        let id = index
            .checked_sub(1)
            .and_then(|i| self.exams.iter().nth(i))
            .map(|e| e.id)
            .ok_or_else(|| WidgetError::Invalid(format!("No exam number {}", index)))?;
        self.exams.remove(id);
        Ok(())
    }
}

impl Default for ExamWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Widget for ExamWidget {
    fn kind(&self) -> ToolKind {
        ToolKind::ExamTracker
    }

    fn usage(&self) -> &'static [(&'static str, &'static str)] {
        USAGE
    }

    fn render(&self) -> Message {
        Message::panel("Exam Countdown", self.exams.lines(Utc::now()))
    }

    async fn handle(
        &mut self,
        input: &str,
        _ctx: &WidgetContext,
    ) -> Result<Vec<Message>, WidgetError> {
        let (cmd, arg) = split_command(input);
        match cmd.as_str() {
            "add" => self.add(arg)?,
            "remove" | "rm" | "done" => self.remove(parse_or(arg, 0))?,
            "list" | "show" | "" => {}
            _ => return Err(WidgetError::UnknownCommand(cmd)),
        }
        Ok(vec![self.render()])
    }
}
