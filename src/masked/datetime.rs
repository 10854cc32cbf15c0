use chrono::{Datelike, NaiveDateTime, Timelike};

use super::date_util;
use super::grammar;
use super::model::{DatePart, DatePartKind};
use super::parser::{MaskParser, Replaced};

pub const DEFAULT_FORMAT: &str = "MM/dd/yyyy";

/// Interprets a date/time format string (`MM/dd/yyyy`, `hh:mm tt`, ...) as
/// an ordered sequence of parts, derives the generic mask behind it, and
/// adds date-aware formatting/parsing on top of a composed [`MaskParser`].
#[derive(Debug, Clone)]
pub struct DateTimeMaskParser {
    format: String,
    parts: Vec<DatePart>,
    parser: MaskParser,
}

impl Default for DateTimeMaskParser {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT, "_")
    }
}

impl DateTimeMaskParser {
    pub fn new(format: impl Into<String>, prompt: impl Into<String>) -> Self {
        let mut parser = Self {
            format: String::new(),
            parts: Vec::new(),
            parser: MaskParser::new("", prompt),
        };
        let format = format.into();
        if format.is_empty() {
            parser.set_mask(DEFAULT_FORMAT);
        } else {
            parser.set_mask(format);
        }
        parser
    }

    pub fn mask(&self) -> &str {
        &self.format
    }

    /// Re-tokenizes the format and rebuilds the derived pattern; empty
    /// assignments are ignored.
    pub fn set_mask(&mut self, format: impl Into<String>) {
        let format = format.into();
        if format.is_empty() {
            return;
        }
        self.parts = tokenize(&format);
        self.parser.set_mask(derive_mask(&self.parts));
        self.format = format;
    }

    pub fn prompt(&self) -> char {
        self.parser.prompt()
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.parser.set_prompt(prompt);
    }

    /// The composed generic parser handling character-level masking.
    pub fn parser(&self) -> &MaskParser {
        &self.parser
    }

    pub fn parts(&self) -> &[DatePart] {
        &self.parts
    }

    /// The prompt-filled string for the derived pattern.
    pub fn empty_mask(&self) -> String {
        self.parser.apply("")
    }

    pub fn apply(&self, input: &str) -> String {
        self.parser.apply(input)
    }

    pub fn replace(&self, masked: &str, value: &str, start: usize, end: usize) -> Replaced {
        self.parser.replace(masked, value, start, end)
    }

    /// Renders a date into the masked display string, part by part;
    /// `None` yields the empty mask.
    pub fn format_date(&self, date: Option<NaiveDateTime>) -> String {
        let Some(date) = date else {
            return self.empty_mask();
        };

        let mut out = String::new();
        for part in &self.parts {
            match part.kind {
                DatePartKind::Literal => out.push_str(&part.format),
                DatePartKind::Month => push_padded(&mut out, date.month(), part.width()),
                DatePartKind::Date => push_padded(&mut out, date.day(), part.width()),
                DatePartKind::Year => {
                    let year = if part.width() <= 2 {
                        (date.year().rem_euclid(100)) as u32
                    } else {
                        date.year().max(0) as u32
                    };
                    push_padded(&mut out, year, part.width());
                }
                DatePartKind::Hours => {
                    let hour = if part.is_twelve_hour() {
                        date_util::to_twelve_hour(date.hour())
                    } else {
                        date.hour()
                    };
                    push_padded(&mut out, hour, part.width());
                }
                DatePartKind::Minutes => push_padded(&mut out, date.minute(), part.width()),
                DatePartKind::Seconds => push_padded(&mut out, date.second(), part.width()),
                DatePartKind::AmPm => {
                    out.push_str(if date.hour() < 12 { "AM" } else { "PM" });
                }
            }
        }
        out
    }

    /// Assembles a date from each part's substring. `None` for any invalid
    /// calendar value or a segment still holding prompt characters. Parts
    /// absent from the format default to 2000-01-01 00:00:00; two-digit
    /// years resolve via [`date_util::TWO_DIGIT_YEAR_CUTOFF`].
    pub fn parse_date(&self, masked: &str) -> Option<NaiveDateTime> {
        let chars: Vec<char> = masked.chars().collect();
        let mut year: Option<i32> = None;
        let mut month: Option<u32> = None;
        let mut day: Option<u32> = None;
        let mut hour: Option<u32> = None;
        let mut minute: Option<u32> = None;
        let mut second: Option<u32> = None;
        let mut pm: Option<bool> = None;
        let mut twelve_hour = false;

        for part in &self.parts {
            if part.kind == DatePartKind::Literal {
                continue;
            }
            let text: String = chars.get(part.start..part.end)?.iter().collect();
            if part.kind == DatePartKind::AmPm {
                match text.to_ascii_uppercase().as_str() {
                    "AM" => pm = Some(false),
                    "PM" => pm = Some(true),
                    _ => return None,
                }
                continue;
            }
            if !text.chars().all(|ch| ch.is_ascii_digit()) {
                return None;
            }
            let value: u32 = text.parse().ok()?;
            match part.kind {
                DatePartKind::Month => month = Some(value),
                DatePartKind::Date => day = Some(value),
                DatePartKind::Year => {
                    year = Some(if part.width() <= 2 {
                        date_util::resolve_two_digit_year(value)
                    } else {
                        value as i32
                    });
                }
                DatePartKind::Hours => {
                    twelve_hour = part.is_twelve_hour();
                    hour = Some(value);
                }
                DatePartKind::Minutes => minute = Some(value),
                DatePartKind::Seconds => second = Some(value),
                DatePartKind::AmPm | DatePartKind::Literal => {}
            }
        }

        if month.is_some_and(|m| !(1..=12).contains(&m)) {
            return None;
        }
        let year = year.unwrap_or(2000);
        let month = month.unwrap_or(1);
        let day = day.unwrap_or(1);
        if day < 1 || day > date_util::days_in_month(year, month) {
            return None;
        }

        let hour = match (hour, pm) {
            (Some(h), Some(pm)) => {
                if twelve_hour && !(1..=12).contains(&h) {
                    return None;
                }
                date_util::to_twenty_four_hour(h, pm)
            }
            (Some(h), None) => h,
            (None, Some(true)) => 12,
            (None, _) => 0,
        };
        if hour > 23 {
            return None;
        }
        let minute = minute.unwrap_or(0);
        let second = second.unwrap_or(0);
        if minute > 59 || second > 59 {
            return None;
        }

        chrono::NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
    }

    /// The part whose range contains `pos`; `None` on a literal.
    pub fn date_part_at_position(&self, pos: usize) -> Option<&DatePart> {
        self.parts
            .iter()
            .find(|part| part.kind != DatePartKind::Literal && part.contains(pos))
    }

    pub fn has_date_parts(&self) -> bool {
        self.parts.iter().any(|part| part.kind.is_date())
    }

    pub fn has_time_parts(&self) -> bool {
        self.parts.iter().any(|part| part.kind.is_time())
    }

    /// First non-literal part in left-to-right order.
    pub fn first_date_part(&self) -> Option<&DatePart> {
        self.parts
            .iter()
            .find(|part| part.kind != DatePartKind::Literal)
    }

    pub fn part_by_type(&self, kind: DatePartKind) -> Option<&DatePart> {
        self.parts.iter().find(|part| part.kind == kind)
    }

    /// Steps one segment of `date` by `delta`, looping within the segment's
    /// bounds with `wrap` and clamping without. Year never wraps; AM/PM
    /// toggles regardless of the step size.
    pub fn spin(
        &self,
        kind: DatePartKind,
        date: NaiveDateTime,
        delta: i32,
        wrap: bool,
    ) -> NaiveDateTime {
        let (year, month, day) = (date.year(), date.month(), date.day());
        let (hour, minute, second) = (date.hour(), date.minute(), date.second());
        let delta = delta as i64;

        let stepped = match kind {
            DatePartKind::Year => date_util::clamped_date_time(
                year.saturating_add(delta as i32),
                month,
                day,
                hour,
                minute,
                second,
            ),
            DatePartKind::Month => {
                let next = wrap_step(month as i64, delta, 1, 12, wrap) as u32;
                date_util::clamped_date_time(year, next, day, hour, minute, second)
            }
            DatePartKind::Date => {
                let max = date_util::days_in_month(year, month) as i64;
                let next = wrap_step(day as i64, delta, 1, max, wrap) as u32;
                date_util::clamped_date_time(year, month, next, hour, minute, second)
            }
            DatePartKind::Hours => {
                let next = wrap_step(hour as i64, delta, 0, 23, wrap) as u32;
                date_util::clamped_date_time(year, month, day, next, minute, second)
            }
            DatePartKind::Minutes => {
                let next = wrap_step(minute as i64, delta, 0, 59, wrap) as u32;
                date_util::clamped_date_time(year, month, day, hour, next, second)
            }
            DatePartKind::Seconds => {
                let next = wrap_step(second as i64, delta, 0, 59, wrap) as u32;
                date_util::clamped_date_time(year, month, day, hour, minute, next)
            }
            DatePartKind::AmPm => {
                date_util::clamped_date_time(year, month, day, (hour + 12) % 24, minute, second)
            }
            DatePartKind::Literal => None,
        };

        stepped.unwrap_or(date)
    }
}

fn wrap_step(value: i64, delta: i64, min: i64, max: i64, wrap: bool) -> i64 {
    let next = value + delta;
    if wrap {
        let span = max - min + 1;
        min + (next - min).rem_euclid(span)
    } else {
        next.clamp(min, max)
    }
}

fn push_padded(out: &mut String, value: u32, width: usize) {
    out.push_str(&format!("{value:0width$}"));
}

/// Splits a format string into token/literal runs, each with its range in
/// the output (masked) coordinate space.
fn tokenize(format: &str) -> Vec<DatePart> {
    let chars: Vec<char> = format.chars().collect();
    let mut parts = Vec::new();
    let mut idx = 0usize;
    let mut out = 0usize;

    while idx < chars.len() {
        let ch = chars[idx];
        let run_start = idx;
        if let Some(kind) = DatePartKind::from_token(ch) {
            while idx < chars.len() && chars[idx] == ch {
                idx += 1;
            }
            let token: String = chars[run_start..idx].iter().collect();
            // Numeric runs get at least two positions so a rendered value
            // ("M" -> month 10) cannot outgrow its range and shift every
            // later part.
            let width = if kind == DatePartKind::AmPm {
                2
            } else {
                token.chars().count().max(2)
            };
            parts.push(DatePart {
                kind,
                start: out,
                end: out + width,
                format: token,
            });
            out += width;
        } else {
            while idx < chars.len() && DatePartKind::from_token(chars[idx]).is_none() {
                idx += 1;
            }
            let token: String = chars[run_start..idx].iter().collect();
            let width = token.chars().count();
            parts.push(DatePart {
                kind: DatePartKind::Literal,
                start: out,
                end: out + width,
                format: token,
            });
            out += width;
        }
    }
    parts
}

/// Digit flags for numeric segments, a two-letter region for AM/PM,
/// literals passed through with grammar flags escaped.
fn derive_mask(parts: &[DatePart]) -> String {
    let mut mask = String::new();
    for part in parts {
        match part.kind {
            DatePartKind::Literal => {
                for ch in part.format.chars() {
                    if grammar::is_flag(ch) {
                        mask.push('\\');
                    }
                    mask.push(ch);
                }
            }
            DatePartKind::AmPm => mask.push_str("LL"),
            _ => {
                for _ in 0..part.width() {
                    mask.push('0');
                }
            }
        }
    }
    mask
}
