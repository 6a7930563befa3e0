use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};

const MS_PER_DAY: f64 = 86_400_000.0;

/// UTC midnight of `date` in epoch milliseconds, the x-scale unit.
pub fn date_to_millis(date: NaiveDate) -> f64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis() as f64
}

/// Calendar date containing the epoch-millisecond instant.
pub fn millis_to_date(ms: f64) -> Option<NaiveDate> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(ms.floor() as i64).map(|dt| dt.date_naive())
}

pub fn days_to_millis(days: f64) -> f64 {
    days * MS_PER_DAY
}

/// Tooltip formatting, e.g. `Mar 1, 2008`
pub fn format_tooltip_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Axis label for a tick spaced `step_months` apart.
///
/// - `step >= 12` -> `2008`
/// - `step >= 3` -> `Apr 2008`
/// - otherwise -> `Apr 01`
pub fn format_axis_label(date: NaiveDate, step_months: u32) -> String {
    if step_months >= 12 {
        date.format("%Y").to_string()
    } else if step_months >= 3 {
        date.format("%b %Y").to_string()
    } else {
        date.format("%b %d").to_string()
    }
}

/// Month steps tried for axis ticks, smallest first.
const TICK_STEPS_MONTHS: [u32; 7] = [1, 2, 3, 6, 12, 24, 60];

/// First-of-month ticks covering `[start_ms, end_ms]` with at most
/// `max_ticks` entries. Returns the chosen step alongside the ticks.
pub fn month_ticks(start_ms: f64, end_ms: f64, max_ticks: usize) -> (u32, Vec<NaiveDate>) {
    let (Some(start), Some(end)) = (millis_to_date(start_ms), millis_to_date(end_ms)) else {
        return (12, Vec::new());
    };
    if end < start || max_ticks == 0 {
        return (12, Vec::new());
    }

    let span_months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    let span_months = span_months.max(0) as u32;
    let step = TICK_STEPS_MONTHS
        .iter()
        .copied()
        .find(|step| (span_months / step) as usize + 1 <= max_ticks)
        .unwrap_or(TICK_STEPS_MONTHS[TICK_STEPS_MONTHS.len() - 1]);

    // Align the first tick to a multiple of the step counted from January.
    let mut tick = match NaiveDate::from_ymd_opt(start.year(), 1, 1) {
        Some(jan) => jan,
        None => return (step, Vec::new()),
    };
    if step >= 12 {
        let years = step / 12;
        let offset = start.year().rem_euclid(years as i32);
        if let Some(aligned) = NaiveDate::from_ymd_opt(start.year() - offset, 1, 1) {
            tick = aligned;
        }
    }

    let mut ticks = Vec::new();
    while tick <= end {
        if tick >= start {
            ticks.push(tick);
            if ticks.len() > max_ticks * 4 {
                break;
            }
        }
        match tick.checked_add_months(Months::new(step)) {
            Some(next) => tick = next,
            None => break,
        }
    }
    (step, ticks)
}
