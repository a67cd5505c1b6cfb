use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::Rng;

use crate::calendar;
use crate::jitter::{jitter_int, sample_count, sample_float, Spread};
use crate::models::{AlertLevel, AlertRecord, AlertStatus, HourlyPoint, PerformanceData};

pub const PERCENT_DECIMALS: u32 = 2;

/// Failure rate (percent) above which the system is critical.
pub const CRITICAL_FAILURE_RATE: f64 = 3.0;
/// Availability (percent) below which the system is critical.
pub const CRITICAL_AVAILABILITY: f64 = 95.0;
pub const WARNING_FAILURE_RATE: f64 = 1.0;
pub const WARNING_AVAILABILITY: f64 = 99.0;

pub const MINUTES_PER_MONTH: f64 = 30.0 * 24.0 * 60.0;
pub const HOURLY_WINDOW: usize = 24;

const MONTHLY_AVAILABILITY: Spread = Spread::new(99.5, 0.4);
const MONTHLY_CONVERSATIONS: Spread = Spread::new(90_000.0, 15_000.0);
const MONTHLY_FAILURE_RATE: Spread = Spread::new(0.5, 0.3);

const HOURLY_FAILURE_RATE: Spread = Spread::new(0.3, 0.25);
const HOURLY_AVAILABILITY: Spread = Spread::new(99.8, 0.15);

const CURRENT_FAILURE_RATE: Spread = Spread::new(0.3, 0.2);
const CURRENT_AVAILABILITY: Spread = Spread::new(99.8, 0.15);

/// Hours between consecutive canned alerts, before jitter.
const ALERT_SPACING_HOURS: f64 = 30.0;
const ALERT_OFFSET_HOURS: f64 = 10.0;
const ALERT_JITTER_HOURS: f64 = 10.0;

const CANNED_ALERTS: [(AlertLevel, &str); 5] = [
    (AlertLevel::Critical, "reply failure rate reached 3.2%"),
    (AlertLevel::Warning, "reply failure rate reached 1.5%"),
    (AlertLevel::Critical, "system unavailable (server restart)"),
    (AlertLevel::Warning, "reply failure rate reached 1.2%"),
    (AlertLevel::Warning, "system availability dropped to 98.5%"),
];

/// Critical thresholds are checked first; comparisons are strict.
pub fn classify(failure_rate: f64, availability: f64) -> AlertLevel {
    if failure_rate > CRITICAL_FAILURE_RATE || availability < CRITICAL_AVAILABILITY {
        AlertLevel::Critical
    } else if failure_rate > WARNING_FAILURE_RATE || availability < WARNING_AVAILABILITY {
        AlertLevel::Warning
    } else {
        AlertLevel::Normal
    }
}

pub fn downtime_minutes(availability: f64) -> u64 {
    ((100.0 - availability) / 100.0 * MINUTES_PER_MONTH).round().max(0.0) as u64
}

pub fn performance_for_month<R: Rng>(rng: &mut R, month: String) -> PerformanceData {
    let availability = sample_float(rng, MONTHLY_AVAILABILITY, PERCENT_DECIMALS).min(100.0);
    let total_conversations = sample_count(rng, MONTHLY_CONVERSATIONS);
    let failure_rate = sample_float(rng, MONTHLY_FAILURE_RATE, PERCENT_DECIMALS).max(0.0);
    let failure_count = ((total_conversations as f64 * failure_rate / 100.0).round() as u64)
        .min(total_conversations);

    PerformanceData {
        month,
        availability,
        downtime: downtime_minutes(availability),
        total_conversations,
        success_count: total_conversations - failure_count,
        failure_count,
    }
}

pub fn generate_performance_data<R: Rng>(
    rng: &mut R,
    today: NaiveDate,
    months: usize,
) -> Vec<PerformanceData> {
    calendar::generate_months(today, months)
        .into_iter()
        .map(|month| performance_for_month(rng, month))
        .collect()
}

/// The last 24 hours ending at `now`, oldest first.
pub fn generate_hourly_data<R: Rng>(rng: &mut R, now: NaiveDateTime) -> Vec<HourlyPoint> {
    calendar::generate_hours(now, HOURLY_WINDOW)
        .into_iter()
        .map(|time| HourlyPoint {
            time,
            failure_rate: sample_float(rng, HOURLY_FAILURE_RATE, PERCENT_DECIMALS),
            availability: sample_float(rng, HOURLY_AVAILABILITY, PERCENT_DECIMALS),
        })
        .collect()
}

/// Canned alerts spread over roughly the last week, newest first.
pub fn generate_alert_records<R: Rng>(rng: &mut R, now: NaiveDateTime) -> Vec<AlertRecord> {
    let anchor = calendar::truncate_to_hour(now);
    let mut alerts: Vec<AlertRecord> = CANNED_ALERTS
        .iter()
        .enumerate()
        .map(|(index, &(severity, message))| {
            let base = index as f64 * ALERT_SPACING_HOURS + ALERT_OFFSET_HOURS;
            let hours_ago = jitter_int(rng, base, ALERT_JITTER_HOURS);
            AlertRecord {
                time: anchor - Duration::hours(hours_ago),
                severity,
                message,
            }
        })
        .collect();

    // Jittered offsets can overlap between neighbours.
    alerts.sort_by(|a, b| b.time.cmp(&a.time));
    alerts
}

pub fn generate_alert_status<R: Rng>(rng: &mut R, now: NaiveDateTime) -> AlertStatus {
    let failure_rate = sample_float(rng, CURRENT_FAILURE_RATE, PERCENT_DECIMALS);
    let availability = sample_float(rng, CURRENT_AVAILABILITY, PERCENT_DECIMALS);

    AlertStatus {
        status: classify(failure_rate, availability),
        failure_rate,
        availability,
        alerts: generate_alert_records(rng, now),
    }
}
