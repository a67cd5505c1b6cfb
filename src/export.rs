use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;

use crate::error::DashboardError;
use crate::models::{CostData, DailyUserRating, VersionData};
use crate::snapshot::DashboardSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Ratings,
    Evaluations,
    AbTrend,
    Usage,
    Costs,
    Performance,
    Hourly,
    Alerts,
}

impl Dataset {
    pub const ALL: [Dataset; 8] = [
        Dataset::Ratings,
        Dataset::Evaluations,
        Dataset::AbTrend,
        Dataset::Usage,
        Dataset::Costs,
        Dataset::Performance,
        Dataset::Hourly,
        Dataset::Alerts,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Ratings => "ratings",
            Dataset::Evaluations => "evaluations",
            Dataset::AbTrend => "ab-trend",
            Dataset::Usage => "usage",
            Dataset::Costs => "costs",
            Dataset::Performance => "performance",
            Dataset::Hourly => "hourly",
            Dataset::Alerts => "alerts",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dataset {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Dataset::ALL
            .into_iter()
            .find(|dataset| dataset.name() == value)
            .ok_or_else(|| DashboardError::UnknownDataset(value.to_string()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RatingRow {
    date: NaiveDate,
    five_star_count: u64,
    four_five_star_count: u64,
    total_rated_users: u64,
    insight_users: u64,
    active_users: u64,
    total_conversations: u64,
    rating5: u64,
    rating4: u64,
    rating3: u64,
    rating2: u64,
    rating1: u64,
    unrated: u64,
    dislike_count: u64,
    dislike_rate: f64,
    cumulative_dislike_count: u64,
}

impl From<&DailyUserRating> for RatingRow {
    fn from(record: &DailyUserRating) -> Self {
        let d = &record.distribution;
        Self {
            date: record.date,
            five_star_count: record.five_star_count,
            four_five_star_count: record.four_five_star_count,
            total_rated_users: record.total_rated_users,
            insight_users: record.insight_users,
            active_users: record.active_users,
            total_conversations: record.total_conversations,
            rating5: d.rating5,
            rating4: d.rating4,
            rating3: d.rating3,
            rating2: d.rating2,
            rating1: d.rating1,
            unrated: d.unrated,
            dislike_count: record.dislike_count,
            dislike_rate: record.dislike_rate,
            cumulative_dislike_count: record.cumulative_dislike_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AbTrendRow {
    version: &'static str,
    date: NaiveDate,
    five_star_count: u64,
    four_five_star_count: u64,
    total_rated_users: u64,
    insight_users: u64,
    active_users: u64,
    total_conversations: u64,
    dislike_count: u64,
    dislike_rate: f64,
    cumulative_dislike_count: u64,
    empathy_score: f64,
    positive_attention_score: f64,
    alliance_score: f64,
}

impl AbTrendRow {
    fn new(version: &'static str, data: &VersionData) -> Self {
        let rating = &data.user_rating;
        let scores = &data.ai_evaluation;
        Self {
            version,
            date: rating.date,
            five_star_count: rating.five_star_count,
            four_five_star_count: rating.four_five_star_count,
            total_rated_users: rating.total_rated_users,
            insight_users: rating.insight_users,
            active_users: rating.active_users,
            total_conversations: rating.total_conversations,
            dislike_count: rating.dislike_count,
            dislike_rate: rating.dislike_rate,
            cumulative_dislike_count: rating.cumulative_dislike_count,
            empathy_score: scores.empathy_score,
            positive_attention_score: scores.positive_attention_score,
            alliance_score: scores.alliance_score,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CostRow<'a> {
    month: &'a str,
    total_cost: f64,
    active_users: u64,
    cost_per_user_year: f64,
    variable_cost: f64,
    fixed_cost: f64,
    api_chat: f64,
    api_insight: f64,
    api_evaluation: f64,
    api_recommendation: f64,
    api_prompt_platform: f64,
    storage_database: f64,
    storage_object_storage: f64,
    infrastructure_server: f64,
    infrastructure_bandwidth: f64,
    infrastructure_other: f64,
    cost_per_active_user: f64,
    cost_per_insight: f64,
    cost_per_five_star: f64,
    five_star_count: u64,
    social_value: u64,
    social_value_multiple: f64,
}

impl<'a> From<&'a CostData> for CostRow<'a> {
    fn from(record: &'a CostData) -> Self {
        Self {
            month: &record.month,
            total_cost: record.total_cost,
            active_users: record.active_users,
            cost_per_user_year: record.cost_per_user_year,
            variable_cost: record.variable_cost,
            fixed_cost: record.fixed_cost,
            api_chat: record.api_cost.chat,
            api_insight: record.api_cost.insight,
            api_evaluation: record.api_cost.evaluation,
            api_recommendation: record.api_cost.recommendation,
            api_prompt_platform: record.api_cost.prompt_platform,
            storage_database: record.storage_cost.database,
            storage_object_storage: record.storage_cost.object_storage,
            infrastructure_server: record.infrastructure_cost.server,
            infrastructure_bandwidth: record.infrastructure_cost.bandwidth,
            infrastructure_other: record.infrastructure_cost.other,
            cost_per_active_user: record.cost_per_active_user,
            cost_per_insight: record.cost_per_insight,
            cost_per_five_star: record.cost_per_five_star,
            five_star_count: record.five_star_count,
            social_value: record.social_value,
            social_value_multiple: record.social_value_multiple,
        }
    }
}

fn write_rows<W, T, I>(writer: &mut csv::Writer<W>, rows: I) -> anyhow::Result<usize>
where
    W: std::io::Write,
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut written = 0usize;
    for row in rows {
        writer.serialize(row)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Writes one series as CSV with flat column names and returns the row count.
pub fn write_dataset<W: std::io::Write>(
    snapshot: &DashboardSnapshot,
    dataset: Dataset,
    writer: &mut csv::Writer<W>,
) -> anyhow::Result<usize> {
    match dataset {
        Dataset::Ratings => write_rows(writer, snapshot.user_ratings.iter().map(RatingRow::from)),
        Dataset::Evaluations => write_rows(writer, &snapshot.ai_evaluations),
        Dataset::AbTrend => write_rows(
            writer,
            snapshot.ab_trend.iter().flat_map(|pair| {
                [
                    AbTrendRow::new("A", &pair.version_a),
                    AbTrendRow::new("B", &pair.version_b),
                ]
            }),
        ),
        Dataset::Usage => write_rows(writer, &snapshot.usage),
        Dataset::Costs => write_rows(writer, snapshot.costs.iter().map(CostRow::from)),
        Dataset::Performance => write_rows(writer, &snapshot.performance),
        Dataset::Hourly => write_rows(writer, &snapshot.hourly),
        Dataset::Alerts => write_rows(writer, &snapshot.alert_status.alerts),
    }
}

pub fn export_csv(
    snapshot: &DashboardSnapshot,
    dataset: Dataset,
    path: &Path,
) -> anyhow::Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_dataset(snapshot, dataset, &mut writer)
}

pub fn export_json(snapshot: &DashboardSnapshot, path: &Path) -> anyhow::Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), snapshot)
        .context("failed to serialize snapshot")?;
    Ok(())
}
