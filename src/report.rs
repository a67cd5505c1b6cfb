use std::fmt::Write;

use crate::error::DashboardError;
use crate::models::{AlertStatus, VersionData, HOUR_LABEL_FORMAT};
use crate::selection::DateSelection;
use crate::snapshot::DashboardSnapshot;

fn percent(part: u64, whole: u64) -> f64 {
    crate::jitter::ratio(part as f64, whole as f64) * 100.0
}

fn write_version(output: &mut String, label: &str, version: &VersionData) {
    let rating = &version.user_rating;
    let scores = &version.ai_evaluation;
    let _ = writeln!(
        output,
        "- {}: {} five-star ({:.1}% of rated), {} rated of {} insight users, dislike rate {:.2}% ({} total)",
        label,
        rating.five_star_count,
        percent(rating.five_star_count, rating.total_rated_users),
        rating.total_rated_users,
        rating.insight_users,
        rating.dislike_rate,
        rating.cumulative_dislike_count
    );
    let _ = writeln!(
        output,
        "  empathy {:.1}, positive attention {:.1}, alliance {:.1}",
        scores.empathy_score, scores.positive_attention_score, scores.alliance_score
    );
}

pub fn write_alerts(output: &mut String, status: &AlertStatus) {
    let _ = writeln!(
        output,
        "Status {} (failure rate {:.2}%, availability {:.2}%)",
        status.status, status.failure_rate, status.availability
    );
    if status.alerts.is_empty() {
        let _ = writeln!(output, "No alerts recorded.");
        return;
    }
    for alert in &status.alerts {
        let _ = writeln!(
            output,
            "- {} [{}] {}",
            alert.time.format(HOUR_LABEL_FORMAT),
            alert.severity,
            alert.message
        );
    }
}

pub fn build_report(
    snapshot: &DashboardSnapshot,
    selection: &DateSelection,
) -> Result<String, DashboardError> {
    let rating = selection.lookup(&snapshot.user_ratings, "user rating")?;
    let evaluation = selection.lookup(&snapshot.ai_evaluations, "AI evaluation")?;
    let ab = selection.lookup(&snapshot.ab_trend, "A/B test")?;
    let usage = selection.lookup(&snapshot.usage, "usage")?;
    let cost = snapshot
        .costs
        .last()
        .ok_or(DashboardError::EmptySeries("cost"))?;
    let performance = snapshot
        .performance
        .last()
        .ok_or(DashboardError::EmptySeries("performance"))?;

    let mut output = String::new();

    let _ = writeln!(output, "# Counseling Dashboard Report");
    let _ = writeln!(
        output,
        "Generated for {} (run {}, seed {})",
        selection.selected(),
        snapshot.run_id,
        snapshot.seed
    );
    let _ = writeln!(output);

    let _ = writeln!(output, "## User Ratings ({})", rating.date);
    let _ = writeln!(
        output,
        "- Five-star: {} ({:.1}% of rated users)",
        rating.five_star_count,
        percent(rating.five_star_count, rating.total_rated_users)
    );
    let _ = writeln!(
        output,
        "- Four or five stars: {} ({:.1}%)",
        rating.four_five_star_count,
        percent(rating.four_five_star_count, rating.total_rated_users)
    );
    let _ = writeln!(
        output,
        "- Rated {} / insight {} / active {}",
        rating.total_rated_users, rating.insight_users, rating.active_users
    );
    let d = &rating.distribution;
    let _ = writeln!(
        output,
        "- Distribution: 5★ {} · 4★ {} · 3★ {} · 2★ {} · 1★ {} · unrated {}",
        d.rating5, d.rating4, d.rating3, d.rating2, d.rating1, d.unrated
    );
    let _ = writeln!(
        output,
        "- Dislikes: {} of {} conversations ({:.2}%), {} cumulative",
        rating.dislike_count,
        rating.total_conversations,
        rating.dislike_rate,
        rating.cumulative_dislike_count
    );

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## AI Evaluation (evaluator {}, updated {})",
        snapshot.evaluator_version.version, snapshot.evaluator_version.last_update
    );
    let _ = writeln!(
        output,
        "- Empathy {:.1}, positive attention {:.1}, alliance {:.1}",
        evaluation.empathy_score, evaluation.positive_attention_score, evaluation.alliance_score
    );
    for row in &snapshot.cross_analysis {
        let _ = writeln!(
            output,
            "- {}: {} topics, empathy {:.1}, positive attention {:.1}, alliance {:.1}",
            row.user_rating,
            row.topic_count,
            row.empathy_avg,
            row.positive_attention_avg,
            row.alliance_avg
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## A/B Comparison");
    write_version(&mut output, "Version A", &ab.version_a);
    write_version(&mut output, "Version B", &ab.version_b);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Disliked Replies");
    for sample in snapshot.dislike_samples {
        if let Some(reply) = sample.messages.iter().find(|message| message.is_disliked) {
            let _ = writeln!(
                output,
                "- #{} {} ({}): \"{}\"",
                sample.topic_id, sample.topic, sample.dislike_time, reply.content
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Usage");
    let _ = writeln!(
        output,
        "- Registered {} (+{}), active {}, conversations {} ({} all time)",
        usage.total_users,
        usage.new_users,
        usage.active_users,
        usage.total_conversations,
        usage.historical_conversations
    );
    let _ = writeln!(
        output,
        "- Retention: next day {:.1}%, 7 days {:.1}%, 30 days {:.1}%",
        usage.retention_1_day, usage.retention_7_day, usage.retention_30_day
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Cost and Social Value ({})", cost.month);
    let _ = writeln!(
        output,
        "- Total {:.2} (variable {:.2}, fixed {:.2}), {:.2} per active user, {:.2} per user-year",
        cost.total_cost,
        cost.variable_cost,
        cost.fixed_cost,
        cost.cost_per_active_user,
        cost.cost_per_user_year
    );
    let _ = writeln!(
        output,
        "- Social value {} from {} five-star insights ({:.1}x cost)",
        cost.social_value, cost.five_star_count, cost.social_value_multiple
    );
    let summary = &snapshot.social_value;
    let _ = writeln!(
        output,
        "- Across {} months: {} five-star insights, social value {}, cost {:.2} ({:.1}x)",
        snapshot.costs.len(),
        summary.total_five_stars,
        summary.total_social_value,
        summary.total_cost,
        summary.total_multiple
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Performance ({})", performance.month);
    let _ = writeln!(
        output,
        "- Availability {:.2}% ({} minutes down), {} of {} replies failed",
        performance.availability,
        performance.downtime,
        performance.failure_count,
        performance.total_conversations
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Alerts");
    write_alerts(&mut output, &snapshot.alert_status);

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use chrono::NaiveDate;

    fn snapshot() -> DashboardSnapshot {
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date");
        let config = GeneratorConfig::new(30, 12, Some(7), Some(today)).expect("valid config");
        DashboardSnapshot::generate(&config)
    }

    #[test]
    fn report_covers_every_section() {
        let snapshot = snapshot();
        let selection = DateSelection::new(snapshot.generated_at.date());
        let report = build_report(&snapshot, &selection).expect("report");
        for heading in [
            "# Counseling Dashboard Report",
            "## User Ratings (2025-01-15)",
            "## AI Evaluation (evaluator v1.2.0",
            "## A/B Comparison",
            "## Disliked Replies",
            "## Usage",
            "## Cost and Social Value (2025-01)",
            "## Performance (2025-01)",
            "## Alerts",
        ] {
            assert!(report.contains(heading), "missing {heading}");
        }
    }

    #[test]
    fn report_uses_selected_day() {
        let snapshot = snapshot();
        let mut selection = DateSelection::new(snapshot.generated_at.date());
        let day = NaiveDate::from_ymd_opt(2025, 1, 3).expect("valid date");
        selection.select(day);
        let report = build_report(&snapshot, &selection).expect("report");
        assert!(report.contains("## User Ratings (2025-01-03)"));
    }

    #[test]
    fn report_falls_back_to_latest_day() {
        let snapshot = snapshot();
        let selection = DateSelection::new(NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date"));
        let report = build_report(&snapshot, &selection).expect("report");
        assert!(report.contains("## User Ratings (2025-01-15)"));
    }

    #[test]
    fn alert_section_lists_feed() {
        let snapshot = snapshot();
        let mut output = String::new();
        write_alerts(&mut output, &snapshot.alert_status);
        assert!(output.starts_with("Status "));
        assert_eq!(output.lines().count(), 1 + snapshot.alert_status.alerts.len());
    }
}
