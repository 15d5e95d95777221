//! Keyword question answering
//!
//! Maps a free-text question to one statistic of one numeric column. No
//! language model is involved: the intent comes from a fixed keyword table
//! and the column from a whole-word match against the numeric column names.
//!
//! ```rust,ignore
//! let text = genie_core::query::answer("What is the total sales?", &table);
//! assert_eq!(text, "Total Sales is 300.00");
//! ```

use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::insights::forecast::forecast_with_schema;
use crate::insights::statistics::compute_with_schema;
use crate::insights::InsightEngine;
use crate::schema::Schema;
use crate::table::Table;

/// What the question asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Total,
    Average,
    Maximum,
    Minimum,
    Predict,
    Unknown,
}

/// Keywords per intent with their common inflections, in priority order.
/// A keyword must be a whole word of the question.
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (Intent::Total, &["total", "totals", "sum", "sums", "summed"]),
    (Intent::Average, &["average", "averages", "avg", "mean"]),
    (Intent::Maximum, &["max", "maximum", "highest", "largest", "biggest"]),
    (Intent::Minimum, &["min", "minimum", "lowest", "smallest"]),
    (
        Intent::Predict,
        &[
            "predict",
            "predicts",
            "predicted",
            "predicting",
            "prediction",
            "forecast",
            "forecasts",
            "forecasted",
            "forecasting",
            "next",
        ],
    ),
];

pub const HELP_TEXT: &str = "I can answer questions about the total, average, maximum, \
minimum or predicted next value of a numeric column, e.g. \"What is the average Sales?\"";

const NO_NUMERIC_TEXT: &str =
    "This dataset has no numeric columns, so there is nothing to calculate.";

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Average => "average",
            Self::Maximum => "maximum",
            Self::Minimum => "minimum",
            Self::Predict => "predict",
            Self::Unknown => "unknown",
        }
    }

    /// Leading word of a statistic answer
    fn label(&self) -> &'static str {
        match self {
            Self::Total => "Total",
            Self::Average => "Average",
            Self::Maximum => "Maximum",
            Self::Minimum => "Minimum",
            Self::Predict => "Predicted next",
            Self::Unknown => "",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured answer to a question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub intent: Intent,
    /// Column the answer is about, when one was resolved
    pub column: Option<String>,
    pub value: Option<f64>,
    pub text: String,
}

impl Answer {
    fn text_only(intent: Intent, column: Option<String>, text: impl Into<String>) -> Self {
        Self {
            intent,
            column,
            value: None,
            text: text.into(),
        }
    }
}

/// First intent with a keyword among the words of the question
pub fn resolve_intent(question: &str) -> Intent {
    let lower = question.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    INTENT_KEYWORDS
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|kw| words.contains(kw))
        })
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::Unknown)
}

/// Pick the numeric column a question refers to.
///
/// Whole-word, case-insensitive match against numeric column names. The
/// earliest mention wins, the longer name on a tie. Without a mention the
/// first numeric column is used.
pub fn resolve_column<'a>(question: &str, schema: &'a Schema) -> Result<&'a str> {
    let mut best: Option<(usize, &str)> = None;

    for col in schema.numeric_columns() {
        let pattern = format!(
            r"(?i)(?:^|[^\p{{L}}\p{{N}}])({})(?:$|[^\p{{L}}\p{{N}}])",
            regex::escape(&col.name)
        );
        let re = Regex::new(&pattern)?;
        let Some(start) = re
            .captures(question)
            .and_then(|c| c.get(1))
            .map(|m| m.start())
        else {
            continue;
        };

        let better = match best {
            None => true,
            Some((pos, name)) => start < pos || (start == pos && col.name.len() > name.len()),
        };
        if better {
            best = Some((start, col.name.as_str()));
        }
    }

    match best {
        Some((_, name)) => Ok(name),
        None => schema
            .first_numeric()
            .map(|c| c.name.as_str())
            .ok_or(Error::NoNumericColumns),
    }
}

/// Two decimals with comma thousands separators: 1234567.891 → "1,234,567.89"
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // "-0.00" reads oddly; only sign values that survive rounding
    let sign = if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Answer a question as plain text. Never fails.
pub fn answer(question: &str, table: &Table) -> String {
    respond(question, table).text
}

/// Answer a question with the resolved intent, column and value
pub fn respond(question: &str, table: &Table) -> Answer {
    respond_with_schema(question, table, &Schema::resolve(table))
}

pub(crate) fn respond_with_schema(question: &str, table: &Table, schema: &Schema) -> Answer {
    let intent = resolve_intent(question);
    if intent == Intent::Unknown {
        return Answer::text_only(intent, None, HELP_TEXT);
    }

    let column = match resolve_column(question, schema) {
        Ok(name) => name.to_string(),
        Err(e) => return Answer::text_only(intent, None, explain(&e)),
    };

    let value = match intent {
        Intent::Predict => {
            forecast_with_schema(table, schema, &column).map(|forecast| forecast.predicted)
        }
        _ => compute_with_schema(table, schema)
            .get(&column)
            .map(|stat| match intent {
                Intent::Total => stat.sum,
                Intent::Average => stat.mean,
                Intent::Maximum => stat.max,
                _ => stat.min,
            })
            .ok_or_else(|| Error::InsufficientData {
                required: 1,
                found: 0,
            }),
    };

    match value {
        Ok(v) => {
            tracing::debug!(intent = %intent, column = %column, "Answered question");
            Answer {
                intent,
                text: format!("{} {} is {}", intent.label(), column, format_number(v)),
                column: Some(column),
                value: Some(v),
            }
        }
        Err(e) => {
            let text = format!("Cannot answer for {}: {}", column, explain(&e));
            Answer::text_only(intent, Some(column), text)
        }
    }
}

impl InsightEngine {
    /// Answer a question about this engine's table
    pub fn ask(&self, question: &str) -> Answer {
        respond_with_schema(question, self.table(), self.schema())
    }
}

fn explain(err: &Error) -> String {
    match err {
        Error::NoNumericColumns => NO_NUMERIC_TEXT.to_string(),
        Error::InsufficientData { required, found } => format!(
            "not enough data (need at least {} values, found {})",
            required, found
        ),
        Error::InvalidColumn(msg) => format!("column {}", msg),
        other => other.to_string(),
    }
}
