use chrono::NaiveDate;
use rand::Rng;

use crate::calendar;
use crate::jitter::{jitter_count, jitter_float, ratio, round_to, share_of};
use crate::models::{ApiCost, CostData, InfrastructureCost, SocialValueSummary, StorageCost};

pub const CURRENCY_DECIMALS: u32 = 2;
pub const MULTIPLE_DECIMALS: u32 = 1;

/// Value assigned to one five-star insight.
pub const FIVE_STAR_VALUE: u64 = 300;

/// Cost component whose base grows by `growth` per month of history.
#[derive(Debug, Clone, Copy)]
struct Component {
    base: f64,
    growth: f64,
    variance: f64,
}

impl Component {
    const fn growing(base: f64, growth: f64, variance: f64) -> Self {
        Self {
            base,
            growth,
            variance,
        }
    }

    const fn flat(base: f64, variance: f64) -> Self {
        Self::growing(base, 0.0, variance)
    }

    fn sample<R: Rng>(&self, rng: &mut R, month_index: usize) -> f64 {
        let base = self.base + self.growth * month_index as f64;
        jitter_float(rng, base, self.variance, CURRENCY_DECIMALS)
    }
}

const ACTIVE_USERS: Component = Component::growing(3000.0, 200.0, 200.0);

const CHAT: Component = Component::growing(800.0, 30.0, 100.0);
const INSIGHT: Component = Component::growing(300.0, 15.0, 50.0);
const EVALUATION: Component = Component::growing(150.0, 8.0, 30.0);
const RECOMMENDATION: Component = Component::growing(80.0, 5.0, 20.0);
const PROMPT_PLATFORM: Component = Component::growing(50.0, 3.0, 15.0);

const DATABASE: Component = Component::growing(200.0, 10.0, 30.0);
const OBJECT_STORAGE: Component = Component::growing(100.0, 5.0, 20.0);

const SERVER: Component = Component::flat(500.0, 50.0);
const BANDWIDTH: Component = Component::flat(150.0, 30.0);
const OTHER: Component = Component::flat(50.0, 15.0);

const INSIGHTS_PER_USER: f64 = 15.0;
const INSIGHT_VARIANCE: f64 = 500.0;
const FIVE_STAR_SHARE: f64 = 0.35;
const FIVE_STAR_VARIANCE: f64 = 100.0;

fn currency(value: f64) -> f64 {
    round_to(value, CURRENCY_DECIMALS)
}

pub fn cost_for_month<R: Rng>(rng: &mut R, month: String, month_index: usize) -> CostData {
    let active_base = ACTIVE_USERS.base + ACTIVE_USERS.growth * month_index as f64;
    let active_users = jitter_count(rng, active_base, ACTIVE_USERS.variance);

    let api_cost = ApiCost {
        chat: CHAT.sample(rng, month_index),
        insight: INSIGHT.sample(rng, month_index),
        evaluation: EVALUATION.sample(rng, month_index),
        recommendation: RECOMMENDATION.sample(rng, month_index),
        prompt_platform: PROMPT_PLATFORM.sample(rng, month_index),
    };
    let storage_cost = StorageCost {
        database: DATABASE.sample(rng, month_index),
        object_storage: OBJECT_STORAGE.sample(rng, month_index),
    };
    let infrastructure_cost = InfrastructureCost {
        server: SERVER.sample(rng, month_index),
        bandwidth: BANDWIDTH.sample(rng, month_index),
        other: OTHER.sample(rng, month_index),
    };

    let variable_cost = currency(api_cost.total());
    let fixed_cost = currency(storage_cost.total() + infrastructure_cost.total());
    let total_cost = currency(variable_cost + fixed_cost);

    let cost_per_user_month = ratio(total_cost, active_users as f64);
    let insight_count = jitter_count(
        rng,
        active_users as f64 * INSIGHTS_PER_USER,
        INSIGHT_VARIANCE,
    );
    let five_star_count = jitter_count(
        rng,
        share_of(insight_count, FIVE_STAR_SHARE),
        FIVE_STAR_VARIANCE,
    );
    let social_value = five_star_count * FIVE_STAR_VALUE;

    CostData {
        month,
        total_cost,
        active_users,
        cost_per_user_year: currency(cost_per_user_month * 12.0),
        variable_cost,
        fixed_cost,
        api_cost,
        storage_cost,
        infrastructure_cost,
        cost_per_active_user: currency(cost_per_user_month),
        cost_per_insight: currency(ratio(total_cost, insight_count as f64)),
        cost_per_five_star: currency(ratio(total_cost, five_star_count as f64)),
        five_star_count,
        social_value,
        social_value_multiple: round_to(
            ratio(social_value as f64, total_cost),
            MULTIPLE_DECIMALS,
        ),
    }
}

/// One record per month, oldest first, with variable costs growing over the window.
pub fn generate_cost_data<R: Rng>(rng: &mut R, today: NaiveDate, months: usize) -> Vec<CostData> {
    calendar::generate_months(today, months)
        .into_iter()
        .enumerate()
        .map(|(index, month)| cost_for_month(rng, month, index))
        .collect()
}

pub fn cumulative_social_value(data: &[CostData]) -> SocialValueSummary {
    let (total_five_stars, total_cost) = data.iter().fold((0u64, 0.0f64), |(stars, cost), item| {
        (stars + item.five_star_count, cost + item.total_cost)
    });
    let total_social_value = total_five_stars * FIVE_STAR_VALUE;

    SocialValueSummary {
        total_five_stars,
        total_social_value,
        total_cost: currency(total_cost),
        total_multiple: round_to(
            ratio(total_social_value as f64, total_cost),
            MULTIPLE_DECIMALS,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date")
    }

    fn with_totals(total_cost: f64, five_star_count: u64) -> CostData {
        let mut rng = StdRng::seed_from_u64(0);
        CostData {
            total_cost,
            five_star_count,
            ..cost_for_month(&mut rng, "2025-01".to_string(), 0)
        }
    }

    #[test]
    fn months_are_labeled_and_ordered() {
        let mut rng = StdRng::seed_from_u64(6);
        let data = generate_cost_data(&mut rng, today(), 12);
        assert_eq!(data.len(), 12);
        assert_eq!(data[0].month, "2024-02");
        assert_eq!(data[11].month, "2025-01");
    }

    #[test]
    fn cost_roll_ups_add_up() {
        let mut rng = StdRng::seed_from_u64(13);
        for record in generate_cost_data(&mut rng, today(), 24) {
            assert!((record.variable_cost - record.api_cost.total()).abs() <= 0.01);
            let fixed = record.storage_cost.total() + record.infrastructure_cost.total();
            assert!((record.fixed_cost - fixed).abs() <= 0.01);
            assert!(
                (record.total_cost - (record.variable_cost + record.fixed_cost)).abs() <= 0.01
            );
            assert_eq!(record.social_value, record.five_star_count * FIVE_STAR_VALUE);
        }
    }

    #[test]
    fn unit_economics_follow_total_cost() {
        let mut rng = StdRng::seed_from_u64(17);
        for record in generate_cost_data(&mut rng, today(), 12) {
            let per_user = record.total_cost / record.active_users as f64;
            assert!((record.cost_per_active_user - per_user).abs() <= 0.01);
            assert!((record.cost_per_user_year - per_user * 12.0).abs() <= 0.05);
            let multiple = record.social_value as f64 / record.total_cost;
            assert!((record.social_value_multiple - multiple).abs() <= 0.06);
        }
    }

    #[test]
    fn currency_components_use_two_decimals() {
        let mut rng = StdRng::seed_from_u64(23);
        let record = cost_for_month(&mut rng, "2025-01".to_string(), 3);
        for value in [
            record.api_cost.chat,
            record.storage_cost.database,
            record.infrastructure_cost.server,
            record.total_cost,
            record.cost_per_insight,
        ] {
            assert_eq!(round_to(value, 2), value);
        }
        assert_eq!(round_to(record.social_value_multiple, 1), record.social_value_multiple);
    }

    #[test]
    fn cumulative_social_value_sums_months() {
        let data = vec![with_totals(100.0, 1), with_totals(200.0, 2)];
        let summary = cumulative_social_value(&data);
        assert_eq!(summary.total_five_stars, 3);
        assert_eq!(summary.total_cost, 300.0);
        assert_eq!(summary.total_social_value, 900);
        assert_eq!(summary.total_multiple, 3.0);
    }

    #[test]
    fn cumulative_social_value_is_a_pure_fold() {
        let mut rng = StdRng::seed_from_u64(31);
        let data = generate_cost_data(&mut rng, today(), 12);
        assert_eq!(cumulative_social_value(&data), cumulative_social_value(&data));
    }

    #[test]
    fn empty_cost_history_has_zero_multiple() {
        let summary = cumulative_social_value(&[]);
        assert_eq!(summary.total_five_stars, 0);
        assert_eq!(summary.total_cost, 0.0);
        assert_eq!(summary.total_multiple, 0.0);
    }
}
