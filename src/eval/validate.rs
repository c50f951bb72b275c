//! Strict validation of raw model output.
//!
//! The model's text is an untrusted, weakly-structured boundary: it gets
//! fence-stripped, parsed, and checked field by field before anything
//! downstream sees it. Unparseable text is a `Parse` failure; a parsed
//! object of the wrong shape is a `Schema` failure. No retries happen here.

use std::collections::BTreeMap;

use serde_json::Value;
use strum::IntoEnumIterator;

use super::schema::{Assessment, Category, CategoryJudgment};
use crate::error::EvalError;

const COMMENT_KEY: &str = "comment";

/// Turn raw model text into a validated [`Assessment`] or fail.
pub fn parse_assessment(raw: &str) -> Result<Assessment, EvalError> {
    let text = strip_code_fences(raw);

    let value: Value =
        serde_json::from_str(text).map_err(|error| EvalError::Parse(error.to_string()))?;

    let Value::Object(map) = value else {
        return Err(EvalError::Schema("top-level value is not an object".into()));
    };

    // exactly the six category keys plus the comment, nothing else
    for key in map.keys() {
        if key != COMMENT_KEY && key.parse::<Category>().is_err() {
            return Err(EvalError::Schema(format!("unexpected key `{key}`")));
        }
    }

    let mut judgments = BTreeMap::new();
    for category in Category::iter() {
        let entry = map
            .get(category.as_ref())
            .ok_or_else(|| EvalError::Schema(format!("missing category `{category}`")))?;
        judgments.insert(category, parse_judgment(category, entry)?);
    }

    let comment = match map.get(COMMENT_KEY) {
        Some(Value::String(comment)) => comment.clone(),
        Some(_) => return Err(EvalError::Schema("`comment` is not a string".into())),
        None => return Err(EvalError::Schema("missing `comment`".into())),
    };

    Ok(Assessment { judgments, comment })
}

fn parse_judgment(category: Category, value: &Value) -> Result<CategoryJudgment, EvalError> {
    let Value::Object(fields) = value else {
        return Err(EvalError::Schema(format!(
            "category `{category}` is not an object"
        )));
    };

    let score = fields
        .get("score")
        .and_then(Value::as_f64)
        .ok_or_else(|| EvalError::Schema(format!("category `{category}` has no numeric score")))?;

    if !(0.0..=5.0).contains(&score) {
        return Err(EvalError::Schema(format!(
            "category `{category}` score {score} is outside [0, 5]"
        )));
    }
    if !on_half_point_grid(score) {
        return Err(EvalError::Schema(format!(
            "category `{category}` score {score} is not a multiple of 0.5"
        )));
    }

    let reason = fields
        .get("reason")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .ok_or_else(|| {
            EvalError::Schema(format!("category `{category}` has no non-empty reason"))
        })?;

    Ok(CategoryJudgment {
        score,
        reason: reason.to_string(),
    })
}

fn on_half_point_grid(score: f64) -> bool {
    let doubled = score * 2.0;
    (doubled - doubled.round()).abs() < 1e-9
}

/// Strip a surrounding fenced code block, tolerating a case-insensitive
/// `json` tag and whitespace on either side of the fences.
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let rest = rest.trim_start();
        let rest = if rest.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) {
            &rest[4..]
        } else {
            rest
        };
        text = rest.trim_start();
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }

    text
}
