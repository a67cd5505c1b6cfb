use chrono::NaiveDate;
use rand::Rng;

use crate::calendar;
use crate::jitter::{jitter_count, ratio, round_to, sample_count, sample_float, share_of, Spread};
use crate::models::{
    ABTestData, ChangelogEntry, ChatMessage, ChatRole, CrossAnalysisRow, DailyAIEvaluation,
    DailyUserRating, DislikeConversation, EvaluatorVersion, RatingBucket, RatingDistribution,
    VersionData,
};

pub const SCORE_DECIMALS: u32 = 1;
pub const CUMULATIVE_DISLIKE_BASELINE: u64 = 5000;
pub const VERSION_A_DISLIKE_BASELINE: u64 = 2500;
pub const VERSION_B_DISLIKE_BASELINE: u64 = 2800;

/// A share of a parent count plus the jitter applied to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Share {
    pub fraction: f64,
    pub variance: f64,
}

impl Share {
    pub const fn new(fraction: f64, variance: f64) -> Self {
        Self { fraction, variance }
    }

    fn sample<R: Rng>(&self, rng: &mut R, parent: u64) -> u64 {
        jitter_count(rng, share_of(parent, self.fraction), self.variance)
    }
}

/// Base rates for one day of rating activity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingProfile {
    pub active_users: Spread,
    pub insight_users: Share,
    pub rated_users: Share,
    /// Five stars down to one star.
    pub stars: [Share; 5],
    pub conversations: Spread,
    pub dislikes: Share,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreProfile {
    pub empathy: Spread,
    pub positive_attention: Spread,
    pub alliance: Spread,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VersionProfile {
    pub rating: RatingProfile,
    pub scores: ScoreProfile,
}

pub const DAILY_RATING: RatingProfile = RatingProfile {
    active_users: Spread::new(500.0, 100.0),
    insight_users: Share::new(0.6, 50.0),
    rated_users: Share::new(0.7, 30.0),
    stars: [
        Share::new(0.35, 20.0),
        Share::new(0.25, 15.0),
        Share::new(0.15, 10.0),
        Share::new(0.10, 5.0),
        Share::new(0.05, 3.0),
    ],
    conversations: Spread::new(3000.0, 500.0),
    dislikes: Share::new(0.005, 5.0),
};

pub const DAILY_SCORES: ScoreProfile = ScoreProfile {
    empathy: Spread::new(75.0, 8.0),
    positive_attention: Spread::new(78.0, 7.0),
    alliance: Spread::new(72.0, 9.0),
};

/// Counseling-style replies. Tuned to beat [`VERSION_B`] on every axis.
pub const VERSION_A: VersionProfile = VersionProfile {
    rating: RatingProfile {
        active_users: Spread::new(250.0, 50.0),
        insight_users: Share::new(0.62, 25.0),
        rated_users: Share::new(0.72, 15.0),
        stars: [
            Share::new(0.38, 10.0),
            Share::new(0.26, 8.0),
            Share::new(0.15, 5.0),
            Share::new(0.08, 3.0),
            Share::new(0.03, 2.0),
        ],
        conversations: Spread::new(1500.0, 250.0),
        dislikes: Share::new(0.004, 3.0),
    },
    scores: ScoreProfile {
        empathy: Spread::new(77.0, 5.0),
        positive_attention: Spread::new(80.0, 4.0),
        alliance: Spread::new(74.0, 5.0),
    },
};

/// Coaching-style replies.
pub const VERSION_B: VersionProfile = VersionProfile {
    rating: RatingProfile {
        active_users: Spread::new(250.0, 50.0),
        insight_users: Share::new(0.58, 25.0),
        rated_users: Share::new(0.68, 15.0),
        stars: [
            Share::new(0.32, 10.0),
            Share::new(0.24, 8.0),
            Share::new(0.18, 5.0),
            Share::new(0.12, 3.0),
            Share::new(0.06, 2.0),
        ],
        conversations: Spread::new(1500.0, 250.0),
        dislikes: Share::new(0.006, 3.0),
    },
    scores: ScoreProfile {
        empathy: Spread::new(73.0, 5.0),
        positive_attention: Spread::new(76.0, 4.0),
        alliance: Spread::new(70.0, 5.0),
    },
};

struct CrossAnalysisBase {
    bucket: RatingBucket,
    topics: Spread,
    scores: ScoreProfile,
}

const fn cross_row(
    bucket: RatingBucket,
    topics: (f64, f64),
    empathy: (f64, f64),
    positive_attention: (f64, f64),
    alliance: (f64, f64),
) -> CrossAnalysisBase {
    CrossAnalysisBase {
        bucket,
        topics: Spread::new(topics.0, topics.1),
        scores: ScoreProfile {
            empathy: Spread::new(empathy.0, empathy.1),
            positive_attention: Spread::new(positive_attention.0, positive_attention.1),
            alliance: Spread::new(alliance.0, alliance.1),
        },
    }
}

const CROSS_ANALYSIS: [CrossAnalysisBase; 6] = [
    cross_row(RatingBucket::Five, (150.0, 30.0), (82.0, 5.0), (85.0, 4.0), (80.0, 5.0)),
    cross_row(RatingBucket::Four, (100.0, 20.0), (76.0, 5.0), (78.0, 5.0), (74.0, 5.0)),
    cross_row(RatingBucket::Three, (60.0, 15.0), (68.0, 6.0), (70.0, 6.0), (66.0, 6.0)),
    cross_row(RatingBucket::Two, (30.0, 10.0), (58.0, 7.0), (60.0, 7.0), (55.0, 7.0)),
    cross_row(RatingBucket::One, (15.0, 5.0), (45.0, 8.0), (48.0, 8.0), (42.0, 8.0)),
    cross_row(RatingBucket::Unrated, (80.0, 20.0), (70.0, 6.0), (72.0, 6.0), (68.0, 6.0)),
];

pub const EVALUATOR_VERSION: EvaluatorVersion = EvaluatorVersion {
    version: "v1.2.0",
    last_update: "2025-01-10",
    changelog: &[
        ChangelogEntry {
            version: "v1.2.0",
            date: "2025-01-10",
            changes: &[
                "Refined the empathy scoring rubric",
                "Rebalanced the therapeutic alliance weight",
            ],
        },
        ChangelogEntry {
            version: "v1.1.0",
            date: "2024-12-20",
            changes: &[
                "Added evaluation of responses to silence",
                "Corrected bias in positive attention scoring",
            ],
        },
        ChangelogEntry {
            version: "v1.0.0",
            date: "2024-12-01",
            changes: &["Initial release"],
        },
    ],
};

/// Rates one day and advances the running dislike total by that day's dislikes.
pub fn rate_day<R: Rng>(
    rng: &mut R,
    date: NaiveDate,
    profile: &RatingProfile,
    previous_cumulative: u64,
) -> DailyUserRating {
    let active_users = sample_count(rng, profile.active_users);
    let insight_users = profile.insight_users.sample(rng, active_users);
    let total_rated_users = profile.rated_users.sample(rng, insight_users);

    let [five, four, three, two, one] = profile.stars;
    let rating5 = five.sample(rng, total_rated_users);
    let rating4 = four.sample(rng, total_rated_users);
    let rating3 = three.sample(rng, total_rated_users);
    let rating2 = two.sample(rng, total_rated_users);
    let rating1 = one.sample(rng, total_rated_users);

    let total_conversations = sample_count(rng, profile.conversations);
    let dislike_count = profile.dislikes.sample(rng, total_conversations);
    let dislike_rate = round_to(
        ratio(dislike_count as f64, total_conversations as f64) * 100.0,
        2,
    );

    DailyUserRating {
        date,
        five_star_count: rating5,
        four_five_star_count: rating5 + rating4,
        total_rated_users,
        insight_users,
        active_users,
        total_conversations,
        distribution: RatingDistribution {
            rating1,
            rating2,
            rating3,
            rating4,
            rating5,
            unrated: insight_users.saturating_sub(total_rated_users),
        },
        dislike_count,
        dislike_rate,
        cumulative_dislike_count: previous_cumulative + dislike_count,
    }
}

pub fn score_day<R: Rng>(rng: &mut R, date: NaiveDate, profile: &ScoreProfile) -> DailyAIEvaluation {
    DailyAIEvaluation {
        date,
        empathy_score: sample_float(rng, profile.empathy, SCORE_DECIMALS),
        positive_attention_score: sample_float(rng, profile.positive_attention, SCORE_DECIMALS),
        alliance_score: sample_float(rng, profile.alliance, SCORE_DECIMALS),
    }
}

/// Days are generated in order; each carries the previous day's dislike total forward.
pub fn generate_user_rating_data<R: Rng>(
    rng: &mut R,
    today: NaiveDate,
    days: usize,
) -> Vec<DailyUserRating> {
    let mut cumulative = CUMULATIVE_DISLIKE_BASELINE;
    calendar::generate_dates(today, days)
        .into_iter()
        .map(|date| {
            let record = rate_day(rng, date, &DAILY_RATING, cumulative);
            cumulative = record.cumulative_dislike_count;
            record
        })
        .collect()
}

pub fn generate_ai_evaluation_data<R: Rng>(
    rng: &mut R,
    today: NaiveDate,
    days: usize,
) -> Vec<DailyAIEvaluation> {
    calendar::generate_dates(today, days)
        .into_iter()
        .map(|date| score_day(rng, date, &DAILY_SCORES))
        .collect()
}

pub fn generate_cross_analysis_data<R: Rng>(rng: &mut R) -> Vec<CrossAnalysisRow> {
    CROSS_ANALYSIS
        .iter()
        .map(|base| CrossAnalysisRow {
            user_rating: base.bucket,
            topic_count: sample_count(rng, base.topics),
            empathy_avg: sample_float(rng, base.scores.empathy, SCORE_DECIMALS),
            positive_attention_avg: sample_float(
                rng,
                base.scores.positive_attention,
                SCORE_DECIMALS,
            ),
            alliance_avg: sample_float(rng, base.scores.alliance, SCORE_DECIMALS),
        })
        .collect()
}

fn generate_version<R: Rng>(
    rng: &mut R,
    date: NaiveDate,
    profile: &VersionProfile,
    previous_cumulative: u64,
) -> VersionData {
    VersionData {
        user_rating: rate_day(rng, date, &profile.rating, previous_cumulative),
        ai_evaluation: score_day(rng, date, &profile.scores),
        cross_analysis: generate_cross_analysis_data(rng),
    }
}

pub fn generate_ab_test_data<R: Rng>(
    rng: &mut R,
    date: NaiveDate,
    a_cumulative_dislike: u64,
    b_cumulative_dislike: u64,
) -> ABTestData {
    ABTestData {
        version_a: generate_version(rng, date, &VERSION_A, a_cumulative_dislike),
        version_b: generate_version(rng, date, &VERSION_B, b_cumulative_dislike),
    }
}

/// One A/B pair per day, threading each version's dislike total through the sequence.
pub fn generate_ab_trend_data<R: Rng>(rng: &mut R, today: NaiveDate, days: usize) -> Vec<ABTestData> {
    let mut a_cumulative = VERSION_A_DISLIKE_BASELINE;
    let mut b_cumulative = VERSION_B_DISLIKE_BASELINE;
    calendar::generate_dates(today, days)
        .into_iter()
        .map(|date| {
            let pair = generate_ab_test_data(rng, date, a_cumulative, b_cumulative);
            a_cumulative = pair.version_a.user_rating.cumulative_dislike_count;
            b_cumulative = pair.version_b.user_rating.cumulative_dislike_count;
            pair
        })
        .collect()
}

const fn user(content: &'static str) -> ChatMessage {
    ChatMessage {
        role: ChatRole::User,
        content,
        is_disliked: false,
    }
}

const fn ai(content: &'static str) -> ChatMessage {
    ChatMessage {
        role: ChatRole::Ai,
        content,
        is_disliked: false,
    }
}

const fn disliked(content: &'static str) -> ChatMessage {
    ChatMessage {
        role: ChatRole::Ai,
        content,
        is_disliked: true,
    }
}

pub const SAMPLE_DISLIKE_CONVERSATIONS: &[DislikeConversation] = &[
    DislikeConversation {
        topic_id: "12345",
        dislike_time: "2025-01-13 14:30",
        topic: "My child's schoolwork",
        messages: &[
            user("My son has lost interest in studying lately."),
            ai("That's quite normal, teenagers go through phases like this."),
            user("But I'm worried his grades will drop."),
            disliked("Don't worry, grades aren't important."),
            user("But the college entrance exam really matters."),
            ai("I understand your concern, the exam is an important milestone. Let's explore together how to help him find his motivation again..."),
        ],
    },
    DislikeConversation {
        topic_id: "12346",
        dislike_time: "2025-01-13 11:20",
        topic: "Relationship with my mother-in-law",
        messages: &[
            user("My mother-in-law keeps interfering in our life."),
            ai("In-law relationships are a challenge many families face."),
            user("She always says I don't know how to raise my child."),
            disliked("You should listen to her, she has experience."),
            user("But I think her methods are outdated."),
            ai("I understand how you feel. Every generation has its own ideas about parenting, what matters is finding a balance..."),
        ],
    },
    DislikeConversation {
        topic_id: "12347",
        dislike_time: "2025-01-12 16:45",
        topic: "Work pressure",
        messages: &[
            user("Work has been really stressful, I'm always working overtime."),
            ai("Heavy work pressure really does affect your wellbeing."),
            user("I feel like I can't hold on much longer."),
            disliked("Then just quit."),
            user("But I still have a mortgage to pay."),
            ai("I understand the bind you're in. Let's think about ways to relieve the pressure without quitting..."),
        ],
    },
    DislikeConversation {
        topic_id: "12348",
        dislike_time: "2025-01-12 09:15",
        topic: "Communication with my husband",
        messages: &[
            user("My husband never listens to me."),
            ai("Communication is a very important part of a marriage."),
            user("Every time I want to talk, he plays on his phone."),
            disliked("Men are all like that, you'll get used to it."),
            user("I feel like he doesn't care about me."),
            ai("Your feelings matter. Maybe we can explore how to find a way of talking that works for both of you..."),
        ],
    },
    DislikeConversation {
        topic_id: "12349",
        dislike_time: "2025-01-11 20:30",
        topic: "Parent-child relationship",
        messages: &[
            user("My daughter said she hates me."),
            ai("Hearing that from your child must hurt a lot."),
            user("I don't know what I did wrong."),
            disliked("You must have done something badly for her to say that."),
            user("I've been trying so hard."),
            ai("I can feel your effort and your confusion. When a child says \"hate\" it is sometimes just an expression of emotion, let's look at it together..."),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date")
    }

    fn mean(trend: &[ABTestData], metric: impl Fn(&ABTestData) -> f64) -> f64 {
        trend.iter().map(metric).sum::<f64>() / trend.len() as f64
    }

    #[test]
    fn rating_series_is_dated_and_sized() {
        let mut rng = StdRng::seed_from_u64(3);
        let data = generate_user_rating_data(&mut rng, today(), 30);
        assert_eq!(data.len(), 30);
        assert_eq!(data.last().map(|r| r.date), Some(today()));
        for pair in data.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn rating_records_hold_derived_relations() {
        let mut rng = StdRng::seed_from_u64(11);
        for record in generate_user_rating_data(&mut rng, today(), 60) {
            let d = &record.distribution;
            assert_eq!(record.five_star_count, d.rating5);
            assert_eq!(record.four_five_star_count, d.rating5 + d.rating4);
            assert_eq!(
                d.unrated,
                record.insight_users.saturating_sub(record.total_rated_users)
            );
            let expected_rate = round_to(
                ratio(record.dislike_count as f64, record.total_conversations as f64) * 100.0,
                2,
            );
            assert_eq!(record.dislike_rate, expected_rate);
        }
    }

    #[test]
    fn cumulative_dislikes_start_from_baseline() {
        let mut rng = StdRng::seed_from_u64(5);
        let data = generate_user_rating_data(&mut rng, today(), 10);
        assert_eq!(
            data[0].cumulative_dislike_count,
            CUMULATIVE_DISLIKE_BASELINE + data[0].dislike_count
        );
        for pair in data.windows(2) {
            assert_eq!(
                pair[1].cumulative_dislike_count,
                pair[0].cumulative_dislike_count + pair[1].dislike_count
            );
        }
    }

    #[test]
    fn empty_conversations_give_zero_dislike_rate() {
        let mut rng = StdRng::seed_from_u64(1);
        let silent = RatingProfile {
            conversations: Spread::new(0.0, 0.0),
            ..DAILY_RATING
        };
        let record = rate_day(&mut rng, today(), &silent, 10);
        assert_eq!(record.total_conversations, 0);
        assert_eq!(record.dislike_rate, 0.0);
        assert!(record.dislike_rate.is_finite());
    }

    #[test]
    fn evaluation_scores_use_one_decimal() {
        let mut rng = StdRng::seed_from_u64(8);
        for day in generate_ai_evaluation_data(&mut rng, today(), 30) {
            for score in [day.empathy_score, day.positive_attention_score, day.alliance_score] {
                assert_eq!(round_to(score, 1), score);
                assert!((0.0..=100.0).contains(&score));
            }
        }
    }

    #[test]
    fn cross_analysis_has_fixed_rows() {
        let mut rng = StdRng::seed_from_u64(2);
        let rows = generate_cross_analysis_data(&mut rng);
        let buckets: Vec<RatingBucket> = rows.iter().map(|r| r.user_rating).collect();
        assert_eq!(
            buckets,
            vec![
                RatingBucket::Five,
                RatingBucket::Four,
                RatingBucket::Three,
                RatingBucket::Two,
                RatingBucket::One,
                RatingBucket::Unrated,
            ]
        );
    }

    #[test]
    fn ab_pair_seeds_cumulative_dislikes() {
        let mut rng = StdRng::seed_from_u64(4);
        let pair = generate_ab_test_data(&mut rng, today(), 100, 200);
        let a = &pair.version_a.user_rating;
        let b = &pair.version_b.user_rating;
        assert_eq!(a.cumulative_dislike_count, 100 + a.dislike_count);
        assert_eq!(b.cumulative_dislike_count, 200 + b.dislike_count);
        assert_eq!(a.date, today());
        assert_eq!(pair.version_b.ai_evaluation.date, today());
    }

    #[test]
    fn ab_trend_threads_each_version_independently() {
        let mut rng = StdRng::seed_from_u64(21);
        let trend = generate_ab_trend_data(&mut rng, today(), 14);
        assert_eq!(trend.len(), 14);
        let first = &trend[0];
        assert_eq!(
            first.version_a.user_rating.cumulative_dislike_count,
            VERSION_A_DISLIKE_BASELINE + first.version_a.user_rating.dislike_count
        );
        assert_eq!(
            first.version_b.user_rating.cumulative_dislike_count,
            VERSION_B_DISLIKE_BASELINE + first.version_b.user_rating.dislike_count
        );
        for pair in trend.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            assert_eq!(
                next.version_a.user_rating.cumulative_dislike_count,
                prev.version_a.user_rating.cumulative_dislike_count
                    + next.version_a.user_rating.dislike_count
            );
            assert_eq!(
                next.version_b.user_rating.cumulative_dislike_count,
                prev.version_b.user_rating.cumulative_dislike_count
                    + next.version_b.user_rating.dislike_count
            );
        }
    }

    #[test]
    fn version_a_outperforms_version_b_on_average() {
        let mut rng = StdRng::seed_from_u64(99);
        let trend = generate_ab_trend_data(&mut rng, today(), 1000);
        let a_dislikes = mean(&trend, |p| p.version_a.user_rating.dislike_count as f64);
        let b_dislikes = mean(&trend, |p| p.version_b.user_rating.dislike_count as f64);
        let a_empathy = mean(&trend, |p| p.version_a.ai_evaluation.empathy_score);
        let b_empathy = mean(&trend, |p| p.version_b.ai_evaluation.empathy_score);
        let a_five = mean(&trend, |p| p.version_a.user_rating.five_star_count as f64);
        let b_five = mean(&trend, |p| p.version_b.user_rating.five_star_count as f64);
        assert!(a_dislikes < b_dislikes);
        assert!(a_empathy > b_empathy);
        assert!(a_five > b_five);
    }

    #[test]
    fn version_profiles_favor_a() {
        let (a, b) = (VERSION_A.rating, VERSION_B.rating);
        assert!(a.insight_users.fraction > b.insight_users.fraction);
        assert!(a.rated_users.fraction > b.rated_users.fraction);
        assert!(a.stars[0].fraction > b.stars[0].fraction);
        assert!(a.stars[4].fraction < b.stars[4].fraction);
        assert!(a.dislikes.fraction < b.dislikes.fraction);
        assert!(VERSION_A.scores.alliance.base > VERSION_B.scores.alliance.base);
    }

    #[test]
    fn changelog_is_newest_first() {
        let entries = EVALUATOR_VERSION.changelog;
        assert_eq!(entries[0].version, EVALUATOR_VERSION.version);
        assert_eq!(entries[0].date, EVALUATOR_VERSION.last_update);
        for pair in entries.windows(2) {
            assert!(pair[0].date > pair[1].date);
        }
    }

    #[test]
    fn every_sample_conversation_flags_one_ai_reply() {
        for conversation in SAMPLE_DISLIKE_CONVERSATIONS {
            let flagged: Vec<&ChatMessage> =
                conversation.messages.iter().filter(|m| m.is_disliked).collect();
            assert_eq!(flagged.len(), 1, "topic {}", conversation.topic_id);
            assert_eq!(flagged[0].role, ChatRole::Ai);
        }
    }

    proptest! {
        #[test]
        fn four_five_star_never_below_five_star(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let record = rate_day(&mut rng, today(), &DAILY_RATING, 0);
            prop_assert!(record.four_five_star_count >= record.five_star_count);
            prop_assert_eq!(record.cumulative_dislike_count, record.dislike_count);
        }
    }
}
