use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::error::DashboardError;

pub const DEFAULT_DAYS: usize = 30;
pub const DEFAULT_MONTHS: usize = 12;
pub const MAX_DAYS: usize = 3650;
pub const MAX_MONTHS: usize = 120;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Length of the daily series.
    pub days: usize,
    /// Length of the monthly series.
    pub months: usize,
    pub seed: u64,
    pub today: NaiveDate,
    pub now: NaiveDateTime,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let now = Local::now().naive_local();
        Self {
            days: DEFAULT_DAYS,
            months: DEFAULT_MONTHS,
            seed: rand::random(),
            today: now.date(),
            now,
        }
    }
}

impl GeneratorConfig {
    /// A missing seed is drawn fresh; a `today` override keeps the current time of day.
    pub fn new(
        days: usize,
        months: usize,
        seed: Option<u64>,
        today: Option<NaiveDate>,
    ) -> Result<Self, DashboardError> {
        let defaults = Self::default();
        let (today, now) = match today {
            Some(date) => (date, date.and_time(defaults.now.time())),
            None => (defaults.today, defaults.now),
        };
        let config = Self {
            days,
            months,
            seed: seed.unwrap_or(defaults.seed),
            today,
            now,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        check_window("days", self.days, MAX_DAYS)?;
        check_window("months", self.months, MAX_MONTHS)
    }
}

fn check_window(name: &'static str, value: usize, max: usize) -> Result<(), DashboardError> {
    if value == 0 || value > max {
        return Err(DashboardError::InvalidWindow { name, value, max });
    }
    Ok(())
}

pub fn parse_date(value: &str) -> Result<NaiveDate, DashboardError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| DashboardError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_a_month_and_a_year() {
        let config = GeneratorConfig::default();
        assert_eq!(config.days, 30);
        assert_eq!(config.months, 12);
        assert_eq!(config.now.date(), config.today);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn explicit_seed_and_today_are_kept() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date");
        let config = GeneratorConfig::new(7, 3, Some(42), Some(today)).expect("valid config");
        assert_eq!(config.seed, 42);
        assert_eq!(config.today, today);
        assert_eq!(config.now.date(), today);
    }

    #[test]
    fn rejects_empty_and_oversized_windows() {
        let err = GeneratorConfig::new(0, 12, None, None).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidWindow { name: "days", .. }));
        let err = GeneratorConfig::new(30, MAX_MONTHS + 1, None, None).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidWindow { name: "months", .. }));
    }

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(
            parse_date("2025-01-15").ok(),
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
        assert!(matches!(
            parse_date("15/01/2025"),
            Err(DashboardError::InvalidDate(_))
        ));
    }
}
