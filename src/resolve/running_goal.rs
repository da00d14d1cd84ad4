use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::utils::dates;

/// Fixed monthly running distance target, in kilometers.
pub const MONTHLY_GOAL_KM: f64 = 100.0;

const RUNNING_TYPES: [&str; 3] = ["running", "trail_running", "treadmill_running"];

#[derive(Debug, Clone, Serialize)]
pub struct RunDetail {
    pub date: String,
    pub distance_km: f64,
    pub duration_seconds: i64,
    pub calories: i64,
    pub avg_hr: Option<i64>,
    pub avg_pace_min_km: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunningGoal {
    pub goal_km: f64,
    pub total_km: f64,
    pub remaining_km: f64,
    pub days_elapsed: i64,
    pub days_remaining: i64,
    pub days_in_month: i64,
    pub km_per_day_needed: f64,
    pub runs_count: usize,
    pub total_duration_seconds: i64,
    pub total_calories: i64,
    pub on_track: bool,
    pub avg_km_per_run: f64,
    pub runs: Vec<RunDetail>,
}

/// Project the month-to-date running distance against the fixed goal.
///
/// `activities` is the raw activity list for the first of the month through
/// `today` inclusive. Recomputed fresh on every call, never persisted.
pub fn project(activities: &[Value], today: NaiveDate) -> RunningGoal {
    let month_start = dates::month_start(today);
    let days_in_month = dates::days_in_month(today);

    let mut runs = Vec::new();
    let mut total_distance_m = 0.0;
    let mut total_duration_s = 0.0;
    let mut total_calories = 0i64;

    for activity in activities {
        if !is_running(activity) {
            continue;
        }
        let distance = activity.get("distance").and_then(Value::as_f64).unwrap_or(0.0);
        let duration = activity
            .get("duration")
            .and_then(Value::as_f64)
            .or_else(|| activity.get("elapsedDuration").and_then(Value::as_f64))
            .unwrap_or(0.0);
        let calories = activity.get("calories").and_then(Value::as_f64).unwrap_or(0.0) as i64;

        total_distance_m += distance;
        total_duration_s += duration;
        total_calories += calories;

        let distance_km = distance / 1000.0;
        runs.push(RunDetail {
            date: activity
                .get("startTimeLocal")
                .and_then(Value::as_str)
                .map(|s| s.chars().take(10).collect())
                .unwrap_or_default(),
            distance_km: round2(distance_km),
            duration_seconds: duration.round() as i64,
            calories,
            avg_hr: activity
                .get("averageHR")
                .and_then(Value::as_f64)
                .map(|hr| hr.round() as i64),
            avg_pace_min_km: (distance_km > 0.0)
                .then(|| round2(duration / 60.0 / distance_km)),
        });
    }

    let total_km = round2(total_distance_m / 1000.0);
    let remaining_km = (MONTHLY_GOAL_KM - total_km).max(0.0);
    let days_elapsed = (today - month_start).num_days() + 1;
    let days_remaining = (days_in_month - days_elapsed).max(0);
    let km_per_day_needed = if days_remaining > 0 {
        round2(remaining_km / days_remaining as f64)
    } else {
        0.0
    };

    RunningGoal {
        goal_km: MONTHLY_GOAL_KM,
        total_km,
        remaining_km: round2(remaining_km),
        days_elapsed,
        days_remaining,
        days_in_month,
        km_per_day_needed,
        runs_count: runs.len(),
        total_duration_seconds: total_duration_s.round() as i64,
        total_calories,
        on_track: total_km >= (MONTHLY_GOAL_KM / days_in_month as f64) * days_elapsed as f64,
        avg_km_per_run: if runs.is_empty() {
            0.0
        } else {
            round2(total_km / runs.len() as f64)
        },
        runs,
    }
}

fn is_running(activity: &Value) -> bool {
    activity
        .get("activityType")
        .and_then(|t| t.get("typeKey"))
        .and_then(Value::as_str)
        .is_some_and(|key| RUNNING_TYPES.contains(&key))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
