use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use uuid::Uuid;

use crate::config::GeneratorConfig;
use crate::cost;
use crate::models::{
    ABTestData, AlertStatus, CostData, CrossAnalysisRow, DailyAIEvaluation, DailyUserRating,
    DislikeConversation, EvaluatorVersion, HourlyPoint, PerformanceData, SocialValueSummary,
    UserUsageData,
};
use crate::performance;
use crate::rating;
use crate::usage;

/// Every series the dashboard shows, generated once per run and only read afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub run_id: Uuid,
    pub seed: u64,
    pub generated_at: NaiveDateTime,
    pub evaluator_version: EvaluatorVersion,
    pub user_ratings: Vec<DailyUserRating>,
    pub ai_evaluations: Vec<DailyAIEvaluation>,
    pub cross_analysis: Vec<CrossAnalysisRow>,
    pub ab_trend: Vec<ABTestData>,
    pub dislike_samples: &'static [DislikeConversation],
    pub usage: Vec<UserUsageData>,
    pub costs: Vec<CostData>,
    pub social_value: SocialValueSummary,
    pub performance: Vec<PerformanceData>,
    pub hourly: Vec<HourlyPoint>,
    pub alert_status: AlertStatus,
}

impl DashboardSnapshot {
    pub fn generate(config: &GeneratorConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        Self::generate_with(config, &mut rng)
    }

    pub fn generate_with<R: Rng>(config: &GeneratorConfig, rng: &mut R) -> Self {
        let run_id = uuid::Builder::from_random_bytes(rng.random()).into_uuid();
        let today = config.today;

        let user_ratings = rating::generate_user_rating_data(rng, today, config.days);
        let ai_evaluations = rating::generate_ai_evaluation_data(rng, today, config.days);
        let cross_analysis = rating::generate_cross_analysis_data(rng);
        let ab_trend = rating::generate_ab_trend_data(rng, today, config.days);
        let usage = usage::generate_user_usage_data(rng, today, config.days);
        let costs = cost::generate_cost_data(rng, today, config.months);
        let social_value = cost::cumulative_social_value(&costs);
        let performance = performance::generate_performance_data(rng, today, config.months);
        let hourly = performance::generate_hourly_data(rng, config.now);
        let alert_status = performance::generate_alert_status(rng, config.now);

        tracing::debug!(
            days = config.days,
            months = config.months,
            ab_days = ab_trend.len(),
            hourly_points = hourly.len(),
            alerts = alert_status.alerts.len(),
            "generated dashboard series"
        );

        Self {
            run_id,
            seed: config.seed,
            generated_at: config.now,
            evaluator_version: rating::EVALUATOR_VERSION,
            user_ratings,
            ai_evaluations,
            cross_analysis,
            ab_trend,
            dislike_samples: rating::SAMPLE_DISLIKE_CONVERSATIONS,
            usage,
            costs,
            social_value,
            performance,
            hourly,
            alert_status,
        }
    }
}
