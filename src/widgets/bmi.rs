//! Body mass index and daily calorie estimate.

use async_trait::async_trait;

use super::input::{parse_f64_or, parse_or, split_command};
use super::{Widget, WidgetContext, WidgetError};
use crate::messaging::Message;
use crate::registry::ToolKind;

/// Activity multipliers with their labels.
pub const ACTIVITY_LEVELS: &[(f64, &str)] = &[
    (1.2, "Sedentary"),
    (1.375, "Lightly active"),
    (1.55, "Moderately active"),
    (1.725, "Very active"),
    (1.9, "Extra active"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiStatus {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiStatus {
    pub fn label(self) -> &'static str {
        match self {
            BmiStatus::Underweight => "Underweight",
            BmiStatus::Normal => "Normal",
            BmiStatus::Overweight => "Overweight",
            BmiStatus::Obese => "Obese",
        }
    }
}

pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

pub fn bmi_status(bmi: f64) -> BmiStatus {
    if bmi < 18.5 {
        BmiStatus::Underweight
    } else if bmi < 25.0 {
        BmiStatus::Normal
    } else if bmi < 30.0 {
        BmiStatus::Overweight
    } else {
        BmiStatus::Obese
    }
}

/// Basal metabolic rate (Mifflin-St Jeor).
pub fn bmr(weight_kg: f64, height_cm: f64, age: u32, sex: Sex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64;
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMetrics {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub sex: Sex,
    pub activity: f64,
}

impl Default for BodyMetrics {
    fn default() -> Self {
        Self {
            weight_kg: 70.0,
            height_cm: 170.0,
            age: 25,
            sex: Sex::Male,
            activity: 1.2,
        }
    }
}

impl BodyMetrics {
    pub fn bmi(&self) -> f64 {
        bmi(self.weight_kg, self.height_cm)
    }

    pub fn status(&self) -> BmiStatus {
        bmi_status(self.bmi())
    }

    pub fn bmr(&self) -> f64 {
        bmr(self.weight_kg, self.height_cm, self.age, self.sex)
    }

    pub fn daily_calories(&self) -> f64 {
        self.bmr() * self.activity
    }
}

/// Resolve an activity argument: a preset number (1-5) or a multiplier.
fn parse_activity(arg: &str, current: f64) -> f64 {
    match arg.trim().parse::<usize>() {
        Ok(n) if (1..=ACTIVITY_LEVELS.len()).contains(&n) => ACTIVITY_LEVELS[n - 1].0,
        _ => {
            let value = parse_f64_or(arg, current);
            if value > 0.0 {
                value
            } else {
                current
            }
        }
    }
}

const USAGE: &[(&str, &str)] = &[
    ("weight <kg>", "Set weight"),
    ("height <cm>", "Set height"),
    ("age <years>", "Set age"),
    ("sex <male|female>", "Set sex"),
    ("activity <1-5|factor>", "Set activity level"),
    ("show", "Show results"),
];

pub struct BmiWidget {
    metrics: BodyMetrics,
}

impl BmiWidget {
    pub fn new() -> Self {
        Self {
            metrics: BodyMetrics::default(),
        }
    }

    pub fn metrics(&self) -> &BodyMetrics {
        &self.metrics
    }
}

impl Default for BmiWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Widget for BmiWidget {
    fn kind(&self) -> ToolKind {
        ToolKind::BmiCalculator
    }

    fn usage(&self) -> &'static [(&'static str, &'static str)] {
        USAGE
    }

    fn render(&self) -> Message {
        let m = &self.metrics;
        let activity = ACTIVITY_LEVELS
            .iter()
            .find(|(factor, _)| (factor - m.activity).abs() < f64::EPSILON)
            .map(|(_, label)| *label)
            .unwrap_or("Custom");
        let sex = match m.sex {
            Sex::Male => "male",
            Sex::Female => "female",
        };
        Message::panel(
            "Health Metrics",
            [
                format!(
                    "{} kg, {} cm, age {}, {}, {} (x{})",
                    m.weight_kg, m.height_cm, m.age, sex, activity, m.activity
                ),
                format!("BMI: {:.1} ({})", m.bmi(), m.status().label()),
                format!("BMR: {:.0} kcal", m.bmr()),
                format!("Daily calories: {:.0} kcal", m.daily_calories()),
            ],
        )
    }

    async fn handle(
        &mut self,
        input: &str,
        _ctx: &WidgetContext,
    ) -> Result<Vec<Message>, WidgetError> {
        let (cmd, arg) = split_command(input);
        let defaults = BodyMetrics::default();
        match cmd.as_str() {
            "weight" => self.metrics.weight_kg = parse_f64_or(arg, defaults.weight_kg),
            "height" => self.metrics.height_cm = parse_f64_or(arg, defaults.height_cm),
            "age" => self.metrics.age = parse_or(arg, defaults.age),
            "sex" | "gender" => {
                self.metrics.sex = match arg.to_lowercase().as_str() {
                    "female" | "f" => Sex::Female,
                    "male" | "m" => Sex::Male,
                    _ => self.metrics.sex,
                }
            }
            "activity" => self.metrics.activity = parse_activity(arg, self.metrics.activity),
            "show" | "" => {}
            _ => return Err(WidgetError::UnknownCommand(cmd)),
        }
        Ok(vec![self.render()])
    }
}
