use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::ExtractedEntities;

/// Inclusive bounds for a plausible dialysis session, in hours
pub const MIN_DIALYSIS_HOURS: f64 = 2.0;
pub const MAX_DIALYSIS_HOURS: f64 = 6.0;

static DURATION_HOURS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.?\d*)\s*小时").expect("duration pattern is valid"));

/// Result of evaluating one logic check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub is_valid: bool,
    pub message: String,
}

impl CheckOutcome {
    pub fn pass() -> Self {
        Self {
            is_valid: true,
            message: String::new(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

pub type CheckFn = fn(&ExtractedEntities) -> CheckOutcome;

/// A named consistency predicate over extracted entities
#[derive(Clone, Copy)]
pub struct LogicCheck {
    /// Registry key used in rule files
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    check: CheckFn,
}

impl LogicCheck {
    pub const fn new(
        key: &'static str,
        name: &'static str,
        description: &'static str,
        check: CheckFn,
    ) -> Self {
        Self {
            key,
            name,
            description,
            check,
        }
    }

    pub fn evaluate(&self, entities: &ExtractedEntities) -> CheckOutcome {
        (self.check)(entities)
    }
}

impl fmt::Debug for LogicCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogicCheck")
            .field("key", &self.key)
            .field("name", &self.name)
            .finish()
    }
}

impl PartialEq for LogicCheck {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for LogicCheck {}

pub const WEIGHT_ULTRAFILTRATION: LogicCheck = LogicCheck::new(
    "weight_ultrafiltration",
    "体重与超滤量一致性",
    "透析前后体重差应与超滤量基本一致",
    check_weight_ultrafiltration,
);

pub const ANTICOAGULANT_DOSE: LogicCheck = LogicCheck::new(
    "anticoagulant_dose",
    "抗凝剂与剂量匹配",
    "抗凝剂应有对应的剂量记录",
    check_anticoagulant_dose,
);

pub const DIALYSIS_DURATION: LogicCheck = LogicCheck::new(
    "dialysis_duration",
    "透析时间合理性",
    "透析时间应在2-6小时范围内",
    check_dialysis_duration,
);

/// Built-in checks in evaluation order
pub fn builtin_checks() -> Vec<LogicCheck> {
    vec![WEIGHT_ULTRAFILTRATION, ANTICOAGULANT_DOSE, DIALYSIS_DURATION]
}

/// Resolve a check by its registry key
pub fn lookup_check(key: &str) -> Option<LogicCheck> {
    builtin_checks().into_iter().find(|check| check.key == key)
}

fn any_sign_contains(entities: &ExtractedEntities, needle: &str) -> bool {
    entities.signs.iter().any(|sign| sign.contains(needle))
}

/// A weight change should come with an ultrafiltration record
pub fn check_weight_ultrafiltration(entities: &ExtractedEntities) -> CheckOutcome {
    if any_sign_contains(entities, "体重") && !any_sign_contains(entities, "超滤") {
        return CheckOutcome::fail("记录了体重变化但缺少超滤量记录");
    }
    CheckOutcome::pass()
}

/// An anticoagulant should come with a dose
pub fn check_anticoagulant_dose(entities: &ExtractedEntities) -> CheckOutcome {
    let has_dose = entities
        .signs
        .iter()
        .any(|sign| sign.contains("剂量") || sign.contains("单位"));

    if any_sign_contains(entities, "抗凝") && !has_dose {
        return CheckOutcome::fail("记录了抗凝剂但缺少剂量记录");
    }
    CheckOutcome::pass()
}

/// Session length must fall within the plausible range; unparseable values pass
pub fn check_dialysis_duration(entities: &ExtractedEntities) -> CheckOutcome {
    for sign in entities.signs.iter().filter(|s| s.contains("透析时间")) {
        let Some(hours) = parse_hours(sign) else {
            continue;
        };
        if !(MIN_DIALYSIS_HOURS..=MAX_DIALYSIS_HOURS).contains(&hours) {
            return CheckOutcome::fail(format!(
                "透析时间 {} 小时不在合理范围内(2-6小时)",
                format_hours(hours)
            ));
        }
    }
    CheckOutcome::pass()
}

fn parse_hours(span: &str) -> Option<f64> {
    let captures = DURATION_HOURS.captures(span)?;
    captures.get(1)?.as_str().parse::<f64>().ok()
}

/// Whole numbers keep one decimal place (`4.0`), fractions print as parsed.
///
/// Output is always positional; very large values are written out in full
/// (`10000000000000000.0`) rather than in exponent form.
fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{:.1}", hours)
    } else {
        hours.to_string()
    }
}
