use chrono::NaiveDate;

use crate::error::DashboardError;
use crate::models::{ABTestData, DailyAIEvaluation, DailyUserRating, UserUsageData};

/// Records that belong to one calendar day.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for DailyUserRating {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for DailyAIEvaluation {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for UserUsageData {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for ABTestData {
    fn date(&self) -> NaiveDate {
        self.version_a.user_rating.date
    }
}

/// The day every daily view is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSelection {
    selected: NaiveDate,
}

impl DateSelection {
    pub fn new(today: NaiveDate) -> Self {
        Self { selected: today }
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn select(&mut self, date: NaiveDate) {
        self.selected = date;
    }

    /// The record for the selected day, or the most recent one when that day
    /// is outside the series.
    pub fn lookup<'a, T: Dated>(
        &self,
        series: &'a [T],
        series_name: &'static str,
    ) -> Result<&'a T, DashboardError> {
        let record = record_for_date(series, self.selected)
            .ok_or(DashboardError::EmptySeries(series_name))?;
        if record.date() != self.selected {
            tracing::warn!(
                series = series_name,
                selected = %self.selected,
                fallback = %record.date(),
                "selected date not in series; using most recent record"
            );
        }
        Ok(record)
    }
}

pub fn record_for_date<T: Dated>(series: &[T], date: NaiveDate) -> Option<&T> {
    series
        .iter()
        .find(|record| record.date() == date)
        .or_else(|| series.last())
}
