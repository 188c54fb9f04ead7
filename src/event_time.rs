use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

const MONTH_NAMES: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Best-effort conversion of a free-text date expression into an absolute
/// instant. Never fails; unrecognized input is logged and read as "now".
pub fn parse_event_time(text: &str) -> DateTime<Utc> {
    parse_event_time_at(text, Utc::now())
}

pub(crate) fn parse_event_time_at(text: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let normalized = text.trim().to_lowercase();

    if normalized.is_empty() {
        tracing::warn!("Empty date expression, reading event time as now");
        return now;
    }

    match normalized.as_str() {
        "now" | "just now" => return now,
        "today" => return start_of_local_day(now),
        "yesterday" => return start_of_local_day(now) - Duration::hours(24),
        _ => {}
    }

    if let Some(instant) = parse_relative_expression(&normalized, now) {
        return instant;
    }

    if let Some(instant) = parse_month_day_year(&normalized) {
        return instant;
    }

    if let Some(instant) = parse_standard_timestamp(text.trim()) {
        return instant;
    }

    tracing::warn!(raw_date = %text, "Unrecognized date expression, reading event time as now");
    now
}

fn start_of_local_day(now: DateTime<Utc>) -> DateTime<Utc> {
    let local_day = now.with_timezone(&Local).date_naive();
    local_day
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| Local.from_local_datetime(&midnight).earliest())
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or(now)
}

fn parse_relative_expression(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != 3 || tokens[2] != "ago" {
        return None;
    }

    let amount = tokens[0].parse::<i64>().ok()?;
    let unit = tokens[1].strip_suffix('s').unwrap_or(tokens[1]);

    // Months and years are fixed 30/365-day spans, no calendar arithmetic.
    let span = match unit {
        "second" => Duration::try_seconds(amount),
        "minute" => Duration::try_minutes(amount),
        "hour" => Duration::try_hours(amount),
        "day" => Duration::try_days(amount),
        "week" => Duration::try_weeks(amount),
        "month" => Duration::try_days(amount.checked_mul(30)?),
        "year" => Duration::try_days(amount.checked_mul(365)?),
        _ => None,
    }?;

    now.checked_sub_signed(span)
}

fn parse_month_day_year(text: &str) -> Option<DateTime<Utc>> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != 3 {
        return None;
    }

    let month = month_number(tokens[0])?;
    let day = tokens[1].trim_end_matches(',').parse::<u32>().ok()?;
    let year = tokens[2].parse::<i32>().ok()?;

    let midnight = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|instant| instant.with_timezone(&Utc))
}

fn month_number(token: &str) -> Option<u32> {
    let position = MONTH_NAMES
        .iter()
        .position(|name| *name == token || (token.len() == 3 && name.starts_with(token)))?;
    Some(position as u32 + 1)
}

fn parse_standard_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }

    // Zone-less timestamps are read as UTC so stored state stays stable
    // across host timezone changes.
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }

    None
}
