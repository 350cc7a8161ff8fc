use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use log::debug;

use crate::model::{
    Condition, ConditionKind, ConditionOperator, ConditionValue, ConditionalConfig, DeviceType,
    LogicOp, Slide,
};

/// Everything a condition can look at. The caller supplies the clock readings
/// explicitly so evaluation stays referentially reproducible; the engine
/// never reads wall time on its own.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    pub current_date: NaiveDate,
    pub current_time: NaiveTime,
    pub device: Option<DeviceType>,
    pub screen_width: Option<u32>,
    pub user_role: Option<String>,
    pub language: Option<String>,
    pub custom: BTreeMap<String, serde_json::Value>,
}

impl RuntimeContext {
    pub fn new(current_date: NaiveDate, current_time: NaiveTime) -> Self {
        Self {
            current_date,
            current_time,
            device: None,
            screen_width: None,
            user_role: None,
            language: None,
            custom: BTreeMap::new(),
        }
    }
}

/// Evaluate a conditional chain against the context.
///
/// Disabled configs and empty chains are always true. Otherwise the chain is
/// a strict left-fold: the first condition seeds the accumulator and each
/// subsequent condition combines with the accumulator via its own `logic`
/// field. Sequence order wins over boolean-operator precedence; that is the
/// documented contract, not an accident.
pub fn evaluate(config: &ConditionalConfig, ctx: &RuntimeContext) -> bool {
    if !config.enabled || config.conditions.is_empty() {
        return true;
    }

    let Some((first, rest)) = config.conditions.split_first() else {
        return true;
    };
    let mut acc = evaluate_condition(first, ctx);

    for condition in rest {
        let value = evaluate_condition(condition, ctx);
        acc = match condition.logic.unwrap_or(LogicOp::And) {
            LogicOp::And => acc && value,
            LogicOp::Or => acc || value,
        };
    }
    acc
}

/// A single condition. Missing context fields and payloads that do not match
/// the condition's type degrade to false without aborting the fold.
fn evaluate_condition(condition: &Condition, ctx: &RuntimeContext) -> bool {
    use ConditionOperator as Op;

    match (condition.kind, &condition.value) {
        (ConditionKind::DateRange, ConditionValue::DateRange { start, end }) => {
            let inside = start.is_none_or(|s| ctx.current_date >= s)
                && end.is_none_or(|e| ctx.current_date <= e);
            match condition.operator {
                Op::Within | Op::Is => inside,
                Op::Outside | Op::IsNot => !inside,
                _ => false,
            }
        }
        (ConditionKind::TimeRange, ConditionValue::TimeRange { start, end }) => {
            // start > end means the range wraps midnight (e.g. 22:00-06:00).
            let inside = if start <= end {
                ctx.current_time >= *start && ctx.current_time <= *end
            } else {
                ctx.current_time >= *start || ctx.current_time <= *end
            };
            match condition.operator {
                Op::Within | Op::Is => inside,
                Op::Outside | Op::IsNot => !inside,
                _ => false,
            }
        }
        (ConditionKind::DeviceType, ConditionValue::Device(expected)) => match ctx.device {
            Some(actual) => match condition.operator {
                Op::Is => actual == *expected,
                Op::IsNot => actual != *expected,
                _ => false,
            },
            None => false,
        },
        (ConditionKind::ScreenSize, ConditionValue::ScreenWidth(width)) => {
            match ctx.screen_width {
                Some(actual) => match condition.operator {
                    Op::AtLeast => actual >= *width,
                    Op::AtMost => actual <= *width,
                    Op::Is => actual == *width,
                    _ => false,
                },
                None => false,
            }
        }
        (ConditionKind::UserRole, ConditionValue::Role(role)) => match &ctx.user_role {
            Some(actual) => string_compare(condition.operator, actual, role),
            None => false,
        },
        (ConditionKind::Language, ConditionValue::Language(lang)) => match &ctx.language {
            // Compare primary subtags: "en-US" matches "en".
            Some(actual) => {
                let actual = primary_subtag(actual);
                let expected = primary_subtag(lang);
                match condition.operator {
                    Op::Is => actual.eq_ignore_ascii_case(expected),
                    Op::IsNot => !actual.eq_ignore_ascii_case(expected),
                    _ => false,
                }
            }
            None => false,
        },
        (ConditionKind::Custom, ConditionValue::Custom { key, value }) => {
            match ctx.custom.get(key) {
                Some(actual) => {
                    let actual = stringify(actual);
                    let expected = stringify(value);
                    string_compare(condition.operator, &actual, &expected)
                }
                None => false,
            }
        }
        // Payload shape does not match the condition type.
        _ => false,
    }
}

fn string_compare(op: ConditionOperator, actual: &str, expected: &str) -> bool {
    match op {
        ConditionOperator::Is => actual == expected,
        ConditionOperator::IsNot => actual != expected,
        ConditionOperator::Contains => actual.contains(expected),
        _ => false,
    }
}

fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}

/// Stringify a JSON value the way `contains` expects: bare strings lose
/// their quotes, everything else uses its JSON rendering.
fn stringify(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The navigable subset of the deck: slides that are not hidden and whose
/// conditional chain passes. A failing slide with `hide_when_false == false`
/// and a resolvable fallback is replaced by that fallback in position; an
/// unresolvable fallback falls back to omission.
///
/// Recompute on every context or slide change; results must not be cached
/// across context changes.
pub fn filter_visible<'a>(slides: &'a [Slide], ctx: &RuntimeContext) -> Vec<&'a Slide> {
    let mut out = Vec::with_capacity(slides.len());
    for slide in slides {
        if !slide.visible {
            continue;
        }
        let Some(conditional) = &slide.conditional else {
            out.push(slide);
            continue;
        };
        if evaluate(conditional, ctx) {
            out.push(slide);
            continue;
        }
        if conditional.hide_when_false {
            continue;
        }
        let fallback = conditional
            .fallback_slide_id
            .as_deref()
            .filter(|id| *id != slide.id)
            .and_then(|id| slides.iter().find(|s| s.id == id));
        if let Some(substitute) = fallback {
            debug!(
                "slide {} failed its conditions, substituting fallback {}",
                slide.id, substitute.id
            );
            out.push(substitute);
        }
    }
    out
}
