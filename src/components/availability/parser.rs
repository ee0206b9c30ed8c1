//! iCal feed parsing.
//!
//! Turns feed text into sorted [`ReservedRange`]s. Only the pieces of
//! RFC 5545 needed for booking spans are understood: line unfolding,
//! `BEGIN`/`END` blocks, and `DTSTART`/`DTEND` values in DATE or DATE-TIME
//! form. Anything else is ignored, and broken blocks are skipped.

use super::models::ReservedRange;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

/// Component type that represents a booking
pub const BOOKING_COMPONENT: &str = "VEVENT";

/// Outer wrapper of every feed; its own properties are not an event
const CALENDAR_CONTAINER: &str = "VCALENDAR";

/// Raw fields pulled from one feed block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Block type from `BEGIN:<kind>`
    pub kind: String,
    pub dtstart: Option<String>,
    pub dtend: Option<String>,
}

impl CalendarEvent {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            ..Default::default()
        }
    }

    /// Whether this block describes a booking
    pub fn is_booking(&self) -> bool {
        self.kind == BOOKING_COMPONENT
    }

    /// Convert into a range if both boundaries decode and are ordered
    pub fn to_range(&self) -> Option<ReservedRange> {
        if !self.is_booking() {
            return None;
        }
        let start = parse_ical_date(self.dtstart.as_deref()?)?;
        let end = parse_ical_date(self.dtend.as_deref()?)?;
        ReservedRange::new(start, end)
    }

    fn record(&mut self, name: &str, value: &str) {
        let slot = match name {
            "DTSTART" => &mut self.dtstart,
            "DTEND" => &mut self.dtend,
            _ => return,
        };
        // First occurrence wins
        if slot.is_none() {
            *slot = Some(value.trim().to_string());
        }
    }
}

/// Parse feed text into reserved ranges, ascending by start
pub fn parse_feed(text: &str) -> Vec<ReservedRange> {
    let events = extract_events(text);
    let mut ranges: Vec<ReservedRange> = events
        .iter()
        .filter_map(CalendarEvent::to_range)
        .collect();

    debug!(
        "Parsed feed: {} blocks, {} booking ranges",
        events.len(),
        ranges.len()
    );

    // Stable, so equal starts keep feed order
    ranges.sort_by_key(|r| r.start_date);
    ranges
}

/// Collect every complete top-level block of the feed.
///
/// Properties of nested sub-components (e.g. `VALARM` inside a `VEVENT`)
/// are not attributed to the enclosing block. Unterminated blocks are dropped.
pub fn extract_events(text: &str) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    let mut current: Option<CalendarEvent> = None;
    let mut nested = 0usize;

    for line in unfold_lines(text) {
        let Some((name, value)) = split_content_line(&line) else {
            continue;
        };

        match name.as_str() {
            "BEGIN" => {
                let kind = value.trim().to_ascii_uppercase();
                if current.is_none() {
                    if kind != CALENDAR_CONTAINER {
                        current = Some(CalendarEvent::new(&kind));
                        nested = 0;
                    }
                } else if nested == 0 && kind == BOOKING_COMPONENT {
                    // The previous booking was never closed
                    current = Some(CalendarEvent::new(&kind));
                } else {
                    nested += 1;
                }
            }
            "END" => {
                if current.is_none() {
                    continue;
                }
                if nested > 0 {
                    nested -= 1;
                    continue;
                }
                let kind = value.trim().to_ascii_uppercase();
                if let Some(event) = current.take() {
                    if event.kind == kind {
                        events.push(event);
                    }
                }
            }
            _ => {
                if nested == 0 {
                    if let Some(event) = current.as_mut() {
                        event.record(&name, value);
                    }
                }
            }
        }
    }

    events
}

/// Join folded lines back together.
///
/// A line beginning with a space or tab continues the previous one; the
/// leading whitespace character is removed.
pub fn unfold_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for raw in text.lines() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        if let Some(rest) = raw.strip_prefix([' ', '\t']) {
            if let Some(last) = lines.last_mut() {
                last.push_str(rest);
                continue;
            }
        }
        lines.push(raw.to_string());
    }

    lines
}

/// Split `NAME[;PARAMS]:VALUE` into an upper-cased name and the raw value.
///
/// Colons inside double-quoted parameter values do not end the name part.
pub fn split_content_line(line: &str) -> Option<(String, &str)> {
    let mut in_quotes = false;
    let mut name_end = None;

    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes && name_end.is_none() => name_end = Some(i),
            ':' if !in_quotes => {
                let name = line[..name_end.unwrap_or(i)].trim();
                if name.is_empty() {
                    return None;
                }
                return Some((name.to_ascii_uppercase(), &line[i + 1..]));
            }
            _ => {}
        }
    }

    None
}

/// Decode an iCal DATE (`YYYYMMDD`) or DATE-TIME (`YYYYMMDDTHHMMSS[Z]`).
///
/// Both forms are read as UTC; `TZID` parameters are not resolved.
pub fn parse_ical_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    match value.split_once('T') {
        Some((date, time)) => {
            let time = time.strip_suffix('Z').unwrap_or(time);
            if time.len() != 6 || !is_digits(time) {
                return None;
            }
            let hour = time[0..2].parse().ok()?;
            let minute = time[2..4].parse().ok()?;
            let second = time[4..6].parse().ok()?;
            let naive = parse_date_part(date)?.and_hms_opt(hour, minute, second)?;
            Some(naive.and_utc())
        }
        None => Some(parse_date_part(value)?.and_hms_opt(0, 0, 0)?.and_utc()),
    }
}

fn parse_date_part(date: &str) -> Option<NaiveDate> {
    if date.len() != 8 || !is_digits(date) {
        return None;
    }
    let year = date[0..4].parse().ok()?;
    let month = date[4..6].parse().ok()?;
    let day = date[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}
