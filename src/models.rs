use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingDistribution {
    pub rating1: u64,
    pub rating2: u64,
    pub rating3: u64,
    pub rating4: u64,
    pub rating5: u64,
    pub unrated: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyUserRating {
    pub date: NaiveDate,
    pub five_star_count: u64,
    pub four_five_star_count: u64,
    pub total_rated_users: u64,
    pub insight_users: u64,
    pub active_users: u64,
    pub total_conversations: u64,
    pub distribution: RatingDistribution,
    pub dislike_count: u64,
    /// Percentage of conversations with a down-voted reply, two decimals.
    pub dislike_rate: f64,
    pub cumulative_dislike_count: u64,
}

/// Average AI evaluator scores for one day, each on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAIEvaluation {
    pub date: NaiveDate,
    pub empathy_score: f64,
    pub positive_attention_score: f64,
    pub alliance_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RatingBucket {
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "unrated")]
    Unrated,
}

impl fmt::Display for RatingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RatingBucket::Five => "5 stars",
            RatingBucket::Four => "4 stars",
            RatingBucket::Three => "3 stars",
            RatingBucket::Two => "2 stars",
            RatingBucket::One => "1 star",
            RatingBucket::Unrated => "unrated",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossAnalysisRow {
    pub user_rating: RatingBucket,
    pub topic_count: u64,
    pub empathy_avg: f64,
    pub positive_attention_avg: f64,
    pub alliance_avg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionData {
    pub user_rating: DailyUserRating,
    pub ai_evaluation: DailyAIEvaluation,
    pub cross_analysis: Vec<CrossAnalysisRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ABTestData {
    pub version_a: VersionData,
    pub version_b: VersionData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
    pub version: &'static str,
    pub date: &'static str,
    pub changes: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatorVersion {
    pub version: &'static str,
    pub last_update: &'static str,
    /// Newest entry first.
    pub changelog: &'static [ChangelogEntry],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: &'static str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_disliked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DislikeConversation {
    pub topic_id: &'static str,
    pub dislike_time: &'static str,
    pub topic: &'static str,
    pub messages: &'static [ChatMessage],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUsageData {
    pub date: NaiveDate,
    /// Cumulative registrations.
    pub total_users: u64,
    pub new_users: u64,
    pub active_users: u64,
    pub total_conversations: u64,
    pub historical_conversations: u64,
    pub conversation_users: u64,
    pub insight_users: u64,
    pub avg_conversations_per_user: f64,
    pub avg_topics_per_user: f64,
    pub avg_conversations_per_topic: f64,
    #[serde(rename = "retention1Day")]
    pub retention_1_day: f64,
    #[serde(rename = "retention7Day")]
    pub retention_7_day: f64,
    #[serde(rename = "retention30Day")]
    pub retention_30_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCost {
    pub chat: f64,
    pub insight: f64,
    pub evaluation: f64,
    pub recommendation: f64,
    pub prompt_platform: f64,
}

impl ApiCost {
    pub fn total(&self) -> f64 {
        self.chat + self.insight + self.evaluation + self.recommendation + self.prompt_platform
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageCost {
    pub database: f64,
    pub object_storage: f64,
}

impl StorageCost {
    pub fn total(&self) -> f64 {
        self.database + self.object_storage
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfrastructureCost {
    pub server: f64,
    pub bandwidth: f64,
    pub other: f64,
}

impl InfrastructureCost {
    pub fn total(&self) -> f64 {
        self.server + self.bandwidth + self.other
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostData {
    pub month: String,
    pub total_cost: f64,
    pub active_users: u64,
    pub cost_per_user_year: f64,
    pub variable_cost: f64,
    pub fixed_cost: f64,
    pub api_cost: ApiCost,
    pub storage_cost: StorageCost,
    pub infrastructure_cost: InfrastructureCost,
    pub cost_per_active_user: f64,
    pub cost_per_insight: f64,
    pub cost_per_five_star: f64,
    pub five_star_count: u64,
    pub social_value: u64,
    pub social_value_multiple: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialValueSummary {
    pub total_five_stars: u64,
    pub total_social_value: u64,
    pub total_cost: f64,
    pub total_multiple: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceData {
    pub month: String,
    pub availability: f64,
    /// Minutes of unavailability in a 30-day month.
    pub downtime: u64,
    pub total_conversations: u64,
    pub success_count: u64,
    pub failure_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyPoint {
    pub time: String,
    pub failure_rate: f64,
    pub availability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Normal,
    Warning,
    Critical,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlertLevel::Normal => "normal",
            AlertLevel::Warning => "warning",
            AlertLevel::Critical => "critical",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRecord {
    #[serde(serialize_with = "serialize_hour")]
    pub time: NaiveDateTime,
    #[serde(rename = "type")]
    pub severity: AlertLevel,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStatus {
    pub status: AlertLevel,
    pub failure_rate: f64,
    pub availability: f64,
    /// Newest first.
    pub alerts: Vec<AlertRecord>,
}

pub const HOUR_LABEL_FORMAT: &str = "%Y-%m-%d %H:00";

fn serialize_hour<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&time.format(HOUR_LABEL_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_fields_keep_dashboard_names() {
        let record = UserUsageData {
            date: NaiveDate::from_ymd_opt(2025, 1, 10).expect("valid date"),
            total_users: 15_080,
            new_users: 80,
            active_users: 500,
            total_conversations: 3000,
            historical_conversations: 503_000,
            conversation_users: 425,
            insight_users: 300,
            avg_conversations_per_user: 6.5,
            avg_topics_per_user: 2.3,
            avg_conversations_per_topic: 2.8,
            retention_1_day: 45.0,
            retention_7_day: 25.0,
            retention_30_day: 12.0,
        };
        let json = serde_json::to_value(&record).expect("serializes");
        assert_eq!(json["date"], "2025-01-10");
        assert_eq!(json["historicalConversations"], 503_000);
        assert_eq!(json["retention1Day"], 45.0);
        assert_eq!(json["retention30Day"], 12.0);
    }

    #[test]
    fn alert_record_serializes_hour_label_and_type() {
        let record = AlertRecord {
            time: NaiveDate::from_ymd_opt(2025, 1, 10)
                .and_then(|d| d.and_hms_opt(14, 0, 0))
                .expect("valid time"),
            severity: AlertLevel::Critical,
            message: "system unavailable (server restart)",
        };
        let json = serde_json::to_value(&record).expect("serializes");
        assert_eq!(json["time"], "2025-01-10 14:00");
        assert_eq!(json["type"], "critical");
    }

    #[test]
    fn cost_components_sum() {
        let api = ApiCost {
            chat: 800.0,
            insight: 300.0,
            evaluation: 150.0,
            recommendation: 80.0,
            prompt_platform: 50.0,
        };
        assert_eq!(api.total(), 1380.0);
        let json = serde_json::to_value(&api).expect("serializes");
        assert_eq!(json["promptPlatform"], 50.0);
    }

    #[test]
    fn unflagged_messages_omit_dislike_marker() {
        let message = ChatMessage {
            role: ChatRole::Ai,
            content: "hello",
            is_disliked: false,
        };
        let json = serde_json::to_value(message).expect("serializes");
        assert_eq!(json["role"], "ai");
        assert!(json.get("isDisliked").is_none());
    }
}
