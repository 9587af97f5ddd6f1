//! Date comparisons driven by a Java-style date pattern.

use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::{DateTime, NaiveDateTime};
use tracing::{trace, warn};

use rapidsetup_core::{AttributeValue, Result};

use super::compare::{apply_operator, is_ordering, ordering_matches, Comparison};
use super::{ConstraintEvaluator, EvaluatorKind};
use crate::attribute_value::AttributeValueDto;
use crate::context::ConstraintContext;

/// Compares dates, not strings.
///
/// Both sides are parsed with the configured `dateFormat` and truncated to the
/// precision that format expresses, so `yyyy-MM-dd` compares calendar days even
/// when the attribute stores a full timestamp.
#[derive(Debug)]
pub struct DateEvaluator<'n> {
    dto: &'n AttributeValueDto,
}

impl<'n> DateEvaluator<'n> {
    pub fn new(dto: &'n AttributeValueDto) -> Self {
        Self { dto }
    }
}

impl ConstraintEvaluator for DateEvaluator<'_> {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::Date
    }

    fn evaluate(&self, ctx: &ConstraintContext<'_>) -> Result<bool> {
        let format = match self.dto.date_format() {
            Some(pattern) => match java_pattern_to_chrono(pattern) {
                Some(format) => Some(format),
                None => {
                    warn!(
                        property = self.dto.property(),
                        pattern, "Unsupported date format"
                    );
                    return Ok(false);
                }
            },
            None => None,
        };
        let format = format.as_deref();

        let expected = to_date(&AttributeValue::from(self.dto.value()), format);
        trace!(property = self.dto.property(), ?expected, "Date literal");

        apply_operator(self.dto, ctx, |op, actual| {
            if !is_ordering(op) {
                return Ok(Comparison::Unsupported);
            }
            Ok(match (to_date(actual, format), expected) {
                (Some(a), Some(e)) => ordering_matches(op, a.cmp(&e)).into(),
                _ => Comparison::Incomparable,
            })
        })
    }
}

/// Converts a value to a timestamp at the precision of `format`.
fn to_date(value: &AttributeValue, format: Option<&str>) -> Option<NaiveDateTime> {
    let parsed = match value {
        AttributeValue::Date(d) => Some(*d),
        AttributeValue::Int(millis) => DateTime::from_timestamp_millis(*millis).map(|d| d.naive_utc()),
        AttributeValue::Float(millis) => {
            DateTime::from_timestamp_millis(*millis as i64).map(|d| d.naive_utc())
        }
        AttributeValue::String(s) => return format.and_then(|f| parse_with(s.trim(), f)),
        _ => None,
    }?;
    match format {
        Some(f) => parse_with(&parsed.format(f).to_string(), f),
        None => Some(parsed),
    }
}

/// Parses `s` with `format`, filling fields the format does not carry: a
/// missing month or day becomes 1 and a missing time becomes midnight.
fn parse_with(s: &str, format: &str) -> Option<NaiveDateTime> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, s, StrftimeItems::new(format)).ok()?;

    if parsed.to_naive_date().is_err() {
        // Setting an already parsed field fails and keeps the parsed value
        let _ = parsed.set_month(1);
        let _ = parsed.set_day(1);
    }
    let date = parsed.to_naive_date().ok()?;

    if parsed.to_naive_time().is_err() {
        let _ = parsed.set_hour(0);
        let _ = parsed.set_minute(0);
    }
    let time = parsed.to_naive_time().ok()?;

    if format.contains("%z") {
        return parsed.to_datetime().ok().map(|d| d.naive_utc());
    }
    Some(date.and_time(time))
}

/// Translates a Java `SimpleDateFormat` pattern into a chrono format string.
///
/// Returns `None` for pattern letters without a chrono equivalent.
///
/// # Example
///
/// ```
/// use rapidsetup_constraint::java_pattern_to_chrono;
///
/// assert_eq!(java_pattern_to_chrono("MM/dd/yyyy").as_deref(), Some("%m/%d/%Y"));
/// assert_eq!(
///     java_pattern_to_chrono("yyyy-MM-dd'T'HH:mm:ss").as_deref(),
///     Some("%Y-%m-%dT%H:%M:%S")
/// );
/// ```
pub fn java_pattern_to_chrono(pattern: &str) -> Option<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // '' is a literal quote; otherwise copy until the closing quote
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        out.push('\'');
                        i += 2;
                        continue;
                    }
                    break;
                }
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let mut run = 1;
        while chars.get(i + run) == Some(&c) {
            run += 1;
        }
        let directive = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1..=2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', _) => "%d",
            ('D', _) => "%j",
            ('H', _) | ('k', _) => "%H",
            ('h', _) | ('K', _) => "%I",
            ('m', _) => "%M",
            ('s', _) => "%S",
            ('S', 3) => "%3f",
            ('S', _) => "%f",
            ('a', _) => "%p",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            // Numeric offsets only; zone names (`z`) have no chrono parser
            ('Z', _) | ('X', _) => "%z",
            _ => return None,
        };
        out.push_str(directive);
        i += run;
    }

    Some(out)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}
