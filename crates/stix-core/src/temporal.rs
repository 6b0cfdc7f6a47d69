//! # Temporal Parsing — Permissive Timestamp Ingestion
//!
//! Timestamps arrive as native date-times, bare dates, or free-form strings.
//! [`parse_timestamp`] reads free-form text the way people write dates:
//! RFC 3339 and RFC 2822, ISO 8601 with or without separators, slash and
//! dot dates, month and weekday names, 12-hour clocks, `UTC`/`GMT`/`Z`
//! markers and numeric offsets. It reports whether the text carried zone
//! information.
//!
//! ## Resolution Rules
//!
//! - All-numeric dates are read month first (`04/06/16` is April 6) unless
//!   the leading number can only be a year or a day.
//! - A year written with one or two digits lands within 50 years of the
//!   reference day's year.
//! - Date fields the text omits are taken from the reference day (today,
//!   for [`parse_timestamp`]). A defaulted day is clamped to the month's
//!   length. Omitted time fields are zero.
//!
//! ## Normalization
//!
//! - Zone-aware text is converted to UTC.
//! - Zone-less text is assumed to already be UTC and is labeled as such,
//!   with no shift of the wall-clock value.
//! - Bare date objects are combined with midnight and stamped with
//!   [`LEGACY_DATE_OFFSET_SECS`], a fixed offset of UTC−04:56. Unlike text,
//!   they are not labeled UTC.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};

use crate::error::PropertyError;
use crate::value::utc_offset;

/// Offset west of UTC, in seconds, attached to date-only timestamps
/// (UTC−04:56, local mean time of New York).
pub const LEGACY_DATE_OFFSET_SECS: i32 = 4 * 3600 + 56 * 60;

/// Words that spell UTC.
const UTC_NAMES: &[&str] = &["z", "utc", "gmt", "ut"];

/// Filler words skipped between date and time parts ("6th of April at 8").
const SKIPPED_WORDS: &[&str] = &["at", "on", "of", "and", "the", "st", "nd", "rd", "th"];

const WEEKDAYS: &[&str] = &[
    "mon", "monday", "tue", "tues", "tuesday", "wed", "wednesday", "thu", "thur", "thurs",
    "thursday", "fri", "friday", "sat", "saturday", "sun", "sunday",
];

const MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

/// Result of parsing timestamp text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTimestamp {
    /// The text named a zone or offset.
    Aware(DateTime<FixedOffset>),
    /// The text carried no zone information.
    Naive(NaiveDateTime),
}

impl ParsedTimestamp {
    /// Normalize to a UTC-labeled date-time.
    ///
    /// Aware values are converted; naive values are labeled UTC unchanged.
    pub fn into_utc(self) -> DateTime<FixedOffset> {
        match self {
            ParsedTimestamp::Aware(dt) => dt.with_timezone(&utc_offset()),
            ParsedTimestamp::Naive(naive) => {
                Utc.from_utc_datetime(&naive).with_timezone(&utc_offset())
            }
        }
    }
}

/// Parse free-form timestamp text, filling omitted date fields from today
/// (UTC).
///
/// # Errors
///
/// Returns [`PropertyError::UnrecognizedTimestamp`] if the text is not a
/// recognizable date or time.
pub fn parse_timestamp(text: &str) -> Result<ParsedTimestamp, PropertyError> {
    parse_timestamp_on(text, Utc::now().date_naive())
}

/// Parse free-form timestamp text, filling omitted date fields from
/// `today`.
///
/// # Errors
///
/// Returns [`PropertyError::UnrecognizedTimestamp`] if the text is not a
/// recognizable date or time.
pub fn parse_timestamp_on(text: &str, today: NaiveDate) -> Result<ParsedTimestamp, PropertyError> {
    let s = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(ParsedTimestamp::Aware(dt));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(ParsedTimestamp::Aware(dt));
    }

    let tokens = tokenize(s);
    let mut fields = Fields::default();
    let mut i = 0;
    while i < tokens.len() {
        i = match &tokens[i] {
            Token::Number(digits) => fields.number(&tokens, i, digits)?,
            Token::Word(word) => fields.word(i, word)?,
            Token::Sep(c) => fields.separator(&tokens, i, *c)?,
        };
    }
    fields.resolve(today)
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// A run of ASCII digits, leading zeros kept.
    Number(String),
    /// A run of letters, lowercased.
    Word(String),
    /// Any other non-space character.
    Sep(char),
}

/// Split text into digit runs, letter runs, and single separators.
/// Whitespace only delimits.
fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            let mut run = String::new();
            while let Some(d) = chars.next_if(char::is_ascii_digit) {
                run.push(d);
            }
            tokens.push(Token::Number(run));
        } else if c.is_alphabetic() {
            let mut run = String::new();
            while let Some(a) = chars.next_if(|a| a.is_alphabetic()) {
                run.push(a);
            }
            tokens.push(Token::Word(run.to_lowercase()));
        } else {
            chars.next();
            if !c.is_whitespace() {
                tokens.push(Token::Sep(c));
            }
        }
    }
    tokens
}

// ---------------------------------------------------------------------------
// Field collection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartKind {
    /// A free-standing number; its role is decided by position.
    Number,
    MonthName,
    /// The year slot of a compact `YYMMDD`/`YYYYMMDD` run.
    Year,
}

/// One date component as written.
#[derive(Debug, Clone, Copy)]
struct DatePart {
    value: u32,
    /// Digits as written; zero for a month name.
    digits: usize,
    kind: PartKind,
}

impl DatePart {
    fn numeric(digits: &str, kind: PartKind) -> Result<Self, PropertyError> {
        Ok(Self {
            value: to_number(digits)?,
            digits: digits.len(),
            kind,
        })
    }

    fn is_month_name(&self) -> bool {
        self.kind == PartKind::MonthName
    }

    /// Only a year can have more than two digits or exceed 31.
    fn is_year_like(&self) -> bool {
        match self.kind {
            PartKind::Year => true,
            PartKind::MonthName => false,
            PartKind::Number => self.digits > 2 || self.value > 31,
        }
    }
}

#[derive(Debug, Default)]
struct Fields {
    date: Vec<DatePart>,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    nanos: u32,
    /// Seconds east of UTC.
    offset: Option<i32>,
    /// Token index just past the time of day; a sign there starts an offset.
    time_end: Option<usize>,
}

fn unrecognized() -> PropertyError {
    PropertyError::UnrecognizedTimestamp
}

fn to_number(digits: &str) -> Result<u32, PropertyError> {
    digits.parse().map_err(|_| unrecognized())
}

/// Fractional-second digits to nanoseconds; digits past the ninth are dropped.
fn to_nanos(digits: &str) -> Result<u32, PropertyError> {
    let kept: String = digits.chars().take(9).collect();
    let scale = 10u32.pow(9 - kept.len() as u32);
    Ok(to_number(&kept)? * scale)
}

fn month_number(word: &str) -> Option<u32> {
    if word == "sept" {
        return Some(9);
    }
    MONTHS
        .iter()
        .position(|m| *m == word || (word.len() == 3 && m.starts_with(word)))
        .and_then(|i| u32::try_from(i + 1).ok())
}

impl Fields {
    fn push_date(&mut self, part: DatePart) -> Result<(), PropertyError> {
        let second_month = part.is_month_name() && self.date.iter().any(DatePart::is_month_name);
        if self.date.len() == 3 || second_month {
            return Err(unrecognized());
        }
        self.date.push(part);
        Ok(())
    }

    fn set_time(&mut self, hour: u32, minute: u32, second: u32) -> Result<(), PropertyError> {
        if self.hour.is_some() || hour > 23 || minute > 59 || second > 59 {
            return Err(unrecognized());
        }
        self.hour = Some(hour);
        self.minute = Some(minute);
        self.second = Some(second);
        Ok(())
    }

    /// Consume an optional `.fff` fraction at `i`.
    fn fraction(&mut self, tokens: &[Token], i: usize) -> Result<usize, PropertyError> {
        if let (Some(Token::Sep('.')), Some(Token::Number(frac))) =
            (tokens.get(i), tokens.get(i + 1))
        {
            self.nanos = to_nanos(frac)?;
            return Ok(i + 2);
        }
        Ok(i)
    }

    fn number(&mut self, tokens: &[Token], i: usize, digits: &str) -> Result<usize, PropertyError> {
        let next = tokens.get(i + 1);
        let after_t = i > 0 && tokens[i - 1] == Token::Word("t".into());

        // H:M[:S[.f]]
        if next == Some(&Token::Sep(':')) {
            let minute = match tokens.get(i + 2) {
                Some(Token::Number(m)) => to_number(m)?,
                _ => return Err(unrecognized()),
            };
            let mut end = i + 3;
            let mut second = 0;
            if let (Some(Token::Sep(':')), Some(Token::Number(s))) =
                (tokens.get(end), tokens.get(end + 1))
            {
                second = to_number(s)?;
                end = self.fraction(tokens, end + 2)?;
            }
            self.set_time(to_number(digits)?, minute, second)?;
            self.time_end = Some(end);
            return Ok(end);
        }

        // Compact time after the ISO `T`: HH, HHMM, HHMMSS.
        if after_t || (digits.len() == 6 && !self.date.is_empty() && self.hour.is_none()) {
            let (h, m, s) = match digits.len() {
                2 => (&digits[..2], "0", "0"),
                4 => (&digits[..2], &digits[2..4], "0"),
                6 => (&digits[..2], &digits[2..4], &digits[4..6]),
                _ => return Err(unrecognized()),
            };
            self.set_time(to_number(h)?, to_number(m)?, to_number(s)?)?;
            let end = self.fraction(tokens, i + 1)?;
            self.time_end = Some(end);
            return Ok(end);
        }

        // "8 PM"
        if let Some(Token::Word(w)) = next {
            if (w == "am" || w == "pm") && self.hour.is_none() {
                self.set_time(to_number(digits)?, 0, 0)?;
                return Ok(i + 1);
            }
        }

        if self.date.is_empty() {
            // Compact dates: YYYYMMDD, YYYYMMDDHHMM[SS], YYMMDD.
            let compact = match digits.len() {
                8 | 12 | 14 => Some(4),
                6 => Some(2),
                _ => None,
            };
            if let Some(year_len) = compact {
                let (ymd, clock) = digits.split_at(year_len + 4);
                self.push_date(DatePart::numeric(&ymd[..year_len], PartKind::Year)?)?;
                self.push_date(DatePart::numeric(&ymd[year_len..year_len + 2], PartKind::Number)?)?;
                self.push_date(DatePart::numeric(&ymd[year_len + 2..], PartKind::Number)?)?;
                if !clock.is_empty() {
                    let second = if clock.len() == 6 { to_number(&clock[4..])? } else { 0 };
                    self.set_time(to_number(&clock[..2])?, to_number(&clock[2..4])?, second)?;
                    self.time_end = Some(i + 1);
                }
                return Ok(i + 1);
            }
        }

        self.push_date(DatePart::numeric(digits, PartKind::Number)?)?;
        Ok(i + 1)
    }

    fn word(&mut self, i: usize, word: &str) -> Result<usize, PropertyError> {
        if let Some(month) = month_number(word) {
            self.push_date(DatePart {
                value: month,
                digits: 0,
                kind: PartKind::MonthName,
            })?;
        } else if word == "am" || word == "pm" {
            let hour = match self.hour {
                Some(h) if (1..=12).contains(&h) => h,
                _ => return Err(unrecognized()),
            };
            self.hour = Some(match (word, hour) {
                ("am", 12) => 0,
                ("pm", h) if h < 12 => h + 12,
                (_, h) => h,
            });
            self.time_end = Some(i + 1);
        } else if UTC_NAMES.contains(&word) {
            if self.offset.is_some() {
                return Err(unrecognized());
            }
            self.offset = Some(0);
        } else if !(word == "t" || WEEKDAYS.contains(&word) || SKIPPED_WORDS.contains(&word)) {
            return Err(unrecognized());
        }
        Ok(i + 1)
    }

    fn separator(&mut self, tokens: &[Token], i: usize, c: char) -> Result<usize, PropertyError> {
        let starts_offset = self.time_end == Some(i) && self.offset.is_none();
        match c {
            '+' | '-' if starts_offset => self.numeric_offset(tokens, i, c),
            '-' | '/' | '.' | ',' => Ok(i + 1),
            _ => Err(unrecognized()),
        }
    }

    /// `+HH`, `+HHMM`, `+HH:MM`, and the same with `-`.
    fn numeric_offset(&mut self, tokens: &[Token], i: usize, sign: char) -> Result<usize, PropertyError> {
        let Some(Token::Number(digits)) = tokens.get(i + 1) else {
            return Err(unrecognized());
        };
        let (hours, mut minutes, mut end) = match digits.len() {
            1 | 2 => (to_number(digits)?, 0, i + 2),
            4 => (to_number(&digits[..2])?, to_number(&digits[2..])?, i + 2),
            _ => return Err(unrecognized()),
        };
        if digits.len() <= 2 {
            if let (Some(Token::Sep(':')), Some(Token::Number(m))) =
                (tokens.get(end), tokens.get(end + 1))
            {
                minutes = to_number(m)?;
                end += 2;
            }
        }
        if hours > 23 || minutes > 59 {
            return Err(unrecognized());
        }
        let magnitude = i32::try_from(hours * 3600 + minutes * 60).map_err(|_| unrecognized())?;
        self.offset = Some(if sign == '-' { -magnitude } else { magnitude });
        Ok(end)
    }

    fn resolve(self, today: NaiveDate) -> Result<ParsedTimestamp, PropertyError> {
        if self.date.is_empty() && self.hour.is_none() {
            return Err(unrecognized());
        }
        let (year, month, day) = order_date_parts(&self.date);

        let year = match year {
            Some(p) if p.digits <= 2 => expand_short_year(p.value, today),
            Some(p) => i32::try_from(p.value).map_err(|_| unrecognized())?,
            None => today.year(),
        };
        let month = month.unwrap_or_else(|| today.month());
        let day = match day {
            Some(d) => d,
            None => today.day().min(days_in_month(year, month).ok_or_else(unrecognized)?),
        };
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(unrecognized)?;
        let time = NaiveTime::from_hms_nano_opt(
            self.hour.unwrap_or(0),
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
            self.nanos,
        )
        .ok_or_else(unrecognized)?;
        let naive = date.and_time(time);

        match self.offset {
            None => Ok(ParsedTimestamp::Naive(naive)),
            Some(secs) => FixedOffset::east_opt(secs)
                .and_then(|offset| offset.from_local_datetime(&naive).single())
                .map(ParsedTimestamp::Aware)
                .ok_or_else(unrecognized),
        }
    }
}

/// Assign written date parts to (year, month, day).
fn order_date_parts(parts: &[DatePart]) -> (Option<DatePart>, Option<u32>, Option<u32>) {
    match parts {
        [] => (None, None, None),
        [a] if a.is_month_name() => (None, Some(a.value), None),
        [a] if a.is_year_like() => (Some(*a), None, None),
        [a] => (None, None, Some(a.value)),
        [a, b] if a.is_month_name() || b.is_month_name() => {
            let (month, other) = if a.is_month_name() { (a, b) } else { (b, a) };
            if other.is_year_like() {
                (Some(*other), Some(month.value), None)
            } else {
                (None, Some(month.value), Some(other.value))
            }
        }
        [a, b] if a.is_year_like() => (Some(*a), Some(b.value), None),
        [a, b] if b.is_year_like() => (Some(*b), Some(a.value), None),
        [a, b] if a.value > 12 => (None, Some(b.value), Some(a.value)),
        [a, b] => (None, Some(a.value), Some(b.value)),
        [a, b, c] => {
            if let Some(idx) = parts.iter().position(DatePart::is_month_name) {
                let mut rest = parts.iter().enumerate().filter(|(i, _)| *i != idx).map(|(_, p)| *p);
                let (x, y) = match (rest.next(), rest.next()) {
                    (Some(x), Some(y)) => (x, y),
                    _ => return (None, None, None),
                };
                let month = Some(parts[idx].value);
                if x.is_year_like() && !y.is_year_like() {
                    (Some(x), month, Some(y.value))
                } else {
                    (Some(y), month, Some(x.value))
                }
            } else if a.is_year_like() {
                if b.value > 12 && c.value <= 12 {
                    (Some(*a), Some(c.value), Some(b.value))
                } else {
                    (Some(*a), Some(b.value), Some(c.value))
                }
            } else if a.value > 12 && b.value <= 12 {
                (Some(*c), Some(b.value), Some(a.value))
            } else {
                (Some(*c), Some(a.value), Some(b.value))
            }
        }
        _ => (None, None, None),
    }
}

/// Place a one- or two-digit year within 50 years of `today`.
fn expand_short_year(short: u32, today: NaiveDate) -> i32 {
    let current = today.year();
    // `short` is below 100 here.
    let mut year = current / 100 * 100 + short as i32;
    if year >= current + 50 {
        year -= 100;
    } else if year < current - 50 {
        year += 100;
    }
    year
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// The fixed offset attached to date-only timestamps.
pub fn legacy_date_offset() -> FixedOffset {
    FixedOffset::west_opt(LEGACY_DATE_OFFSET_SECS).unwrap_or_else(utc_offset)
}

/// Combine a bare date with midnight at [`legacy_date_offset`].
///
/// # Errors
///
/// Returns [`PropertyError::UnrecognizedTimestamp`] if the date lies at the
/// edge of the representable range and cannot carry the offset.
pub fn date_at_legacy_midnight(date: NaiveDate) -> Result<DateTime<FixedOffset>, PropertyError> {
    date.and_time(NaiveTime::MIN)
        .and_local_timezone(legacy_date_offset())
        .single()
        .ok_or(PropertyError::UnrecognizedTimestamp)
}
