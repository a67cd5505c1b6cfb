use chrono::NaiveDate;
use rand::Rng;

use crate::calendar;
use crate::jitter::{jitter_count, jitter_float, sample_count, sample_float, share_of, Spread};
use crate::models::UserUsageData;

pub const USAGE_DECIMALS: u32 = 1;
pub const REGISTERED_USERS_BASELINE: u64 = 15_000;
pub const HISTORICAL_CONVERSATIONS_BASELINE: u64 = 500_000;

const NEW_USERS: Spread = Spread::new(80.0, 30.0);
const ACTIVE_USERS: Spread = Spread::new(500.0, 100.0);
const CONVERSATIONS: Spread = Spread::new(3000.0, 500.0);
const CONVERSATION_USER_SHARE: f64 = 0.85;
const CONVERSATION_USER_VARIANCE: f64 = 30.0;
const INSIGHT_USER_SHARE: f64 = 0.6;
const INSIGHT_USER_VARIANCE: f64 = 40.0;

const CONVERSATIONS_PER_USER: Spread = Spread::new(6.5, 1.5);
const TOPICS_PER_USER: Spread = Spread::new(2.3, 0.5);
const CONVERSATIONS_PER_TOPIC: Spread = Spread::new(2.8, 0.6);

/// Retention drifts along a sine wave so trend charts read as a smooth curve.
#[derive(Debug, Clone, Copy)]
struct RetentionWave {
    center: f64,
    amplitude: f64,
    period: f64,
    variance: f64,
}

impl RetentionWave {
    fn sample<R: Rng>(&self, rng: &mut R, day_index: usize) -> f64 {
        let base = self.center + (day_index as f64 / self.period).sin() * self.amplitude;
        jitter_float(rng, base, self.variance, USAGE_DECIMALS)
    }
}

const RETENTION_1_DAY: RetentionWave = RetentionWave {
    center: 45.0,
    amplitude: 5.0,
    period: 5.0,
    variance: 5.0,
};
const RETENTION_7_DAY: RetentionWave = RetentionWave {
    center: 25.0,
    amplitude: 3.0,
    period: 7.0,
    variance: 3.0,
};
const RETENTION_30_DAY: RetentionWave = RetentionWave {
    center: 12.0,
    amplitude: 2.0,
    period: 10.0,
    variance: 2.0,
};

/// Registrations and historical conversations accumulate from fixed baselines
/// in day order.
pub fn generate_user_usage_data<R: Rng>(
    rng: &mut R,
    today: NaiveDate,
    days: usize,
) -> Vec<UserUsageData> {
    let mut total_users = REGISTERED_USERS_BASELINE;
    let mut historical_conversations = HISTORICAL_CONVERSATIONS_BASELINE;

    calendar::generate_dates(today, days)
        .into_iter()
        .enumerate()
        .map(|(index, date)| {
            let new_users = sample_count(rng, NEW_USERS);
            total_users += new_users;

            let active_users = sample_count(rng, ACTIVE_USERS);
            let total_conversations = sample_count(rng, CONVERSATIONS);
            historical_conversations += total_conversations;

            let conversation_users = jitter_count(
                rng,
                share_of(active_users, CONVERSATION_USER_SHARE),
                CONVERSATION_USER_VARIANCE,
            );
            let insight_users = jitter_count(
                rng,
                share_of(active_users, INSIGHT_USER_SHARE),
                INSIGHT_USER_VARIANCE,
            );

            UserUsageData {
                date,
                total_users,
                new_users,
                active_users,
                total_conversations,
                historical_conversations,
                conversation_users,
                insight_users,
                avg_conversations_per_user: sample_float(rng, CONVERSATIONS_PER_USER, USAGE_DECIMALS),
                avg_topics_per_user: sample_float(rng, TOPICS_PER_USER, USAGE_DECIMALS),
                avg_conversations_per_topic: sample_float(
                    rng,
                    CONVERSATIONS_PER_TOPIC,
                    USAGE_DECIMALS,
                ),
                retention_1_day: RETENTION_1_DAY.sample(rng, index),
                retention_7_day: RETENTION_7_DAY.sample(rng, index),
                retention_30_day: RETENTION_30_DAY.sample(rng, index),
            }
        })
        .collect()
}
