// SPDX-License-Identifier: MIT

//! The progress engine: pure state computation for a challenge record.
//!
//! Every operation takes the current instant as an explicit parameter so
//! the engine is deterministic and clock-free. Callers read the record
//! from the store, run a transition here, and write the result back;
//! concurrent writes for the same user are last-write-wins.

use chrono::{DateTime, FixedOffset};

use crate::config::RestartPolicy;
use crate::error::{AppError, Result};
use crate::models::{
    ChallengeView, HistoryEntry, StatsView, StatusView, TaskCatalog, TaskView, TodayView,
    UserChallenge,
};
use crate::time_utils;

/// Completions needed per level beyond the first.
const COMPLETIONS_PER_LEVEL: u64 = 5;

/// Rank thresholds on lifetime average completion, evaluated high to low.
/// First match wins; below the lowest threshold the rank is "F".
const RANK_THRESHOLDS: [(f64, &str); 7] = [
    (97.0, "1%"),
    (90.0, "S"),
    (85.0, "A"),
    (75.0, "B"),
    (65.0, "C"),
    (50.0, "D"),
    (30.0, "E"),
];

/// Compute the full status view for a user's record.
///
/// Fails with `MalformedState` if the stored start date does not parse;
/// defaulting it would silently corrupt the day counter.
pub fn status(
    record: &UserChallenge,
    catalog: &TaskCatalog,
    now: DateTime<FixedOffset>,
) -> Result<StatusView> {
    let start_date = record.parsed_start_date()?;

    let today = time_utils::date_key(now);
    let day_of_week = time_utils::weekday_name(now);
    let is_sunday = time_utils::is_sunday(now);

    // The day counter never drops below 1, even if the clock reads
    // earlier than the stored start date.
    let current_day = (time_utils::days_since(start_date.date_naive(), now) + 1).max(1);

    let completed_today = record.history.get(&today);
    let tasks = catalog
        .tasks()
        .iter()
        .enumerate()
        .map(|(idx, task)| TaskView {
            label: task.label.clone(),
            scheduled_time: task.scheduled_time.clone(),
            duration_minutes: task.duration_minutes,
            completed: completed_today.is_some_and(|set| set.contains(&(idx as u32))),
        })
        .collect();

    // Sunday is the rest day: the live view always shows it fully
    // complete, whatever was actually ticked.
    let completion_percentage = if is_sunday {
        100.0
    } else {
        percentage(completed_today.map_or(0, |set| set.len()), catalog.len())
    };

    let total = record.total_completions();

    Ok(StatusView {
        active: record.active,
        challenge: Some(ChallengeView {
            current_day,
            current_rank: rank_for(average_completion(record, catalog.len())).to_string(),
            current_level: level_for(total),
            stats: stats_for(total),
            start_date: record.start_date.clone(),
        }),
        today: Some(TodayView {
            day_number: current_day,
            date: today,
            day_of_week,
            tasks,
            completion_percentage,
            is_sunday,
        }),
    })
}

/// Start (or re-affirm) a challenge for a user.
///
/// - No record: create one starting now, with empty history.
/// - Inactive record: reactivate; `policy` decides whether the start date
///   is preserved or reset.
/// - Active record: no-op success, returned unchanged.
pub fn start(
    existing: Option<UserChallenge>,
    user_id: &str,
    policy: RestartPolicy,
    now: DateTime<FixedOffset>,
) -> UserChallenge {
    match existing {
        None => UserChallenge::new(user_id, now),
        Some(mut record) => {
            if !record.active {
                record.active = true;
                if policy == RestartPolicy::ResetStartDate {
                    record.start_date = now.to_rfc3339();
                }
            }
            record
        }
    }
}

/// Mark a task complete or incomplete in today's bucket.
///
/// Idempotent in both directions: re-adding a present index or removing
/// an absent one changes nothing. Only today's bucket is ever touched;
/// past days cannot be edited retroactively.
///
/// Returns today's raw completion percentage after the change (the Sunday
/// rest-day override is a live display rule and does not apply here).
pub fn toggle_task(
    record: &mut UserChallenge,
    catalog_len: usize,
    task_index: u32,
    completed: bool,
    now: DateTime<FixedOffset>,
) -> Result<f64> {
    if task_index as usize >= catalog_len {
        return Err(AppError::BadRequest(format!(
            "task_index {} out of range for a catalog of {} tasks",
            task_index, catalog_len
        )));
    }

    let today = time_utils::date_key(now);
    let bucket = record.history.entry(today).or_default();

    if completed {
        bucket.insert(task_index);
    } else {
        bucket.remove(&task_index);
    }

    Ok(percentage(bucket.len(), catalog_len))
}

/// Per-date completion report, ascending by date, truncated to the most
/// recent `days` entries.
///
/// Reports raw percentages only: a historical Sunday with nothing ticked
/// is 0%, not 100%. The rest-day override belongs to the live view.
pub fn history_report(
    record: &UserChallenge,
    catalog_len: usize,
    days: usize,
) -> Vec<HistoryEntry> {
    let skip = record.history.len().saturating_sub(days);
    record
        .history
        .iter()
        .skip(skip)
        .map(|(date, set)| HistoryEntry {
            date: date.clone(),
            completion_percentage: percentage(set.len(), catalog_len),
        })
        .collect()
}

/// Lifetime average completion percentage across all active days.
pub fn average_completion(record: &UserChallenge, catalog_len: usize) -> f64 {
    let possible = record.active_day_count() * catalog_len.max(1) as u64;
    100.0 * record.total_completions() as f64 / possible as f64
}

/// Rank letter for a lifetime average completion percentage.
pub fn rank_for(average: f64) -> &'static str {
    for (threshold, rank) in RANK_THRESHOLDS {
        if average >= threshold {
            return rank;
        }
    }
    "F"
}

/// Level from lifetime completions: level 1 at zero, +1 per 5 completions.
pub fn level_for(total_completions: u64) -> u64 {
    1 + total_completions / COMPLETIONS_PER_LEVEL
}

/// Gamification stats from lifetime completions. All start at 10 and grow
/// monotonically; the multipliers are flavor, nothing consumes them.
pub fn stats_for(total_completions: u64) -> StatsView {
    let scaled = |factor: f64| 10 + (total_completions as f64 * factor).floor() as u64;
    StatsView {
        strength: scaled(1.5),
        vitality: scaled(1.2),
        agility: scaled(1.0),
        recovery: scaled(0.8),
    }
}

fn percentage(completed: usize, catalog_len: usize) -> f64 {
    100.0 * completed as f64 / catalog_len.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_utils::civil_offset;
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    fn civil(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        civil_offset().with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn catalog() -> TaskCatalog {
        TaskCatalog::default() // four tasks
    }

    fn record_starting(now: DateTime<FixedOffset>) -> UserChallenge {
        UserChallenge::new("tester", now)
    }

    // ─── Status ──────────────────────────────────────────────────

    #[test]
    fn test_status_day_one() {
        // 2026-03-02 is a Monday
        let start = civil(2026, 3, 2, 6);
        let record = record_starting(start);
        let view = status(&record, &catalog(), start).unwrap();

        assert!(view.active);
        let challenge = view.challenge.unwrap();
        let today = view.today.unwrap();
        assert_eq!(challenge.current_day, 1);
        assert_eq!(challenge.current_rank, "F");
        assert_eq!(challenge.current_level, 1);
        assert_eq!(today.day_number, 1);
        assert_eq!(today.date, "2026-03-02");
        assert_eq!(today.day_of_week, "Monday");
        assert!(!today.is_sunday);
        assert_eq!(today.completion_percentage, 0.0);
        assert_eq!(today.tasks.len(), 4);
        assert!(today.tasks.iter().all(|t| !t.completed));
    }

    #[test]
    fn test_status_marks_completed_tasks() {
        let start = civil(2026, 3, 2, 6);
        let mut record = record_starting(start);
        record
            .history
            .insert("2026-03-02".to_string(), BTreeSet::from([1, 3]));

        let view = status(&record, &catalog(), civil(2026, 3, 2, 22)).unwrap();
        let today = view.today.unwrap();

        let completed: Vec<bool> = today.tasks.iter().map(|t| t.completed).collect();
        assert_eq!(completed, vec![false, true, false, true]);
        assert_eq!(today.completion_percentage, 50.0);
    }

    #[test]
    fn test_day_counter_advances_and_floors_at_one() {
        let start = civil(2026, 3, 2, 6);
        let record = record_starting(start);

        let day = |now| {
            status(&record, &catalog(), now)
                .unwrap()
                .challenge
                .unwrap()
                .current_day
        };

        assert_eq!(day(civil(2026, 3, 2, 23)), 1);
        assert_eq!(day(civil(2026, 3, 3, 0)), 2);
        assert_eq!(day(civil(2026, 3, 15, 12)), 14);
        // Clock skew: now before the stored start date
        assert_eq!(day(civil(2026, 2, 27, 12)), 1);
    }

    #[test]
    fn test_sunday_pins_completion_to_hundred() {
        // 2026-03-08 is a Sunday; nothing ticked
        let start = civil(2026, 3, 2, 6);
        let record = record_starting(start);
        let view = status(&record, &catalog(), civil(2026, 3, 8, 12)).unwrap();
        let today = view.today.unwrap();

        assert!(today.is_sunday);
        assert_eq!(today.day_of_week, "Sunday");
        assert_eq!(today.completion_percentage, 100.0);
        // The per-task flags still reflect reality
        assert!(today.tasks.iter().all(|t| !t.completed));
    }

    #[test]
    fn test_status_malformed_start_date_fails() {
        let mut record = record_starting(civil(2026, 3, 2, 6));
        record.start_date = "yesterday-ish".to_string();

        let err = status(&record, &catalog(), civil(2026, 3, 2, 12)).unwrap_err();
        assert!(matches!(err, AppError::MalformedState(_)));
    }

    #[test]
    fn test_completion_percentage_bounds() {
        let start = civil(2026, 3, 2, 6);
        let mut record = record_starting(start);

        for n in 0..=4u32 {
            record.history.insert(
                "2026-03-02".to_string(),
                (0..n).collect::<BTreeSet<u32>>(),
            );
            let pct = status(&record, &catalog(), civil(2026, 3, 2, 12))
                .unwrap()
                .today
                .unwrap()
                .completion_percentage;
            assert!((0.0..=100.0).contains(&pct));
        }
    }

    // ─── Rank / level / stats derivation ─────────────────────────

    #[test]
    fn test_rank_boundaries_are_inclusive() {
        assert_eq!(rank_for(96.9), "S");
        assert_eq!(rank_for(97.0), "1%");
        assert_eq!(rank_for(97.1), "1%");
    }

    #[test]
    fn test_rank_step_function() {
        assert_eq!(rank_for(100.0), "1%");
        assert_eq!(rank_for(90.0), "S");
        assert_eq!(rank_for(89.9), "A");
        assert_eq!(rank_for(85.0), "A");
        assert_eq!(rank_for(75.0), "B");
        assert_eq!(rank_for(65.0), "C");
        assert_eq!(rank_for(50.0), "D");
        assert_eq!(rank_for(30.0), "E");
        assert_eq!(rank_for(29.9), "F");
        assert_eq!(rank_for(0.0), "F");
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(4), 1);
        assert_eq!(level_for(5), 2);
        assert_eq!(level_for(9), 2);
        assert_eq!(level_for(10), 3);
    }

    #[test]
    fn test_stats_baseline_and_growth() {
        assert_eq!(
            stats_for(0),
            StatsView {
                strength: 10,
                vitality: 10,
                agility: 10,
                recovery: 10
            }
        );
        assert_eq!(
            stats_for(10),
            StatsView {
                strength: 25,
                vitality: 22,
                agility: 20,
                recovery: 18
            }
        );
        // Monotone in lifetime completions
        let mut prev = stats_for(0);
        for t in 1..50 {
            let next = stats_for(t);
            assert!(next.strength >= prev.strength);
            assert!(next.vitality >= prev.vitality);
            assert!(next.agility >= prev.agility);
            assert!(next.recovery >= prev.recovery);
            prev = next;
        }
    }

    #[test]
    fn test_average_completion_empty_history() {
        let record = record_starting(civil(2026, 3, 2, 6));
        assert_eq!(average_completion(&record, 4), 0.0);
    }

    #[test]
    fn test_average_completion_over_active_days() {
        let mut record = record_starting(civil(2026, 3, 2, 6));
        // 4 of 4, then 2 of 4: average 75%
        record
            .history
            .insert("2026-03-02".to_string(), BTreeSet::from([0, 1, 2, 3]));
        record
            .history
            .insert("2026-03-03".to_string(), BTreeSet::from([0, 1]));

        assert_eq!(average_completion(&record, 4), 75.0);
        let view = status(&record, &catalog(), civil(2026, 3, 4, 12)).unwrap();
        assert_eq!(view.challenge.unwrap().current_rank, "B");
    }

    // ─── Start transition ────────────────────────────────────────

    #[test]
    fn test_start_creates_fresh_record() {
        let now = civil(2026, 3, 2, 6);
        let record = start(None, "alice", RestartPolicy::PreserveStartDate, now);

        assert_eq!(record.user_id, "alice");
        assert!(record.active);
        assert!(record.history.is_empty());
        assert_eq!(record.parsed_start_date().unwrap(), now);
    }

    #[test]
    fn test_start_on_active_record_is_noop() {
        let started = civil(2026, 3, 2, 6);
        let existing = record_starting(started);
        let original_start = existing.start_date.clone();

        let record = start(
            Some(existing),
            "tester",
            RestartPolicy::ResetStartDate,
            civil(2026, 3, 10, 9),
        );

        assert!(record.active);
        assert_eq!(record.start_date, original_start);
    }

    #[test]
    fn test_restart_preserve_keeps_start_date() {
        let mut existing = record_starting(civil(2026, 3, 2, 6));
        existing.active = false;
        let original_start = existing.start_date.clone();

        let record = start(
            Some(existing),
            "tester",
            RestartPolicy::PreserveStartDate,
            civil(2026, 4, 1, 9),
        );

        assert!(record.active);
        assert_eq!(record.start_date, original_start);
    }

    #[test]
    fn test_restart_reset_moves_start_date() {
        let mut existing = record_starting(civil(2026, 3, 2, 6));
        existing.active = false;
        let restart = civil(2026, 4, 1, 9);

        let record = start(
            Some(existing),
            "tester",
            RestartPolicy::ResetStartDate,
            restart,
        );

        assert!(record.active);
        assert_eq!(record.parsed_start_date().unwrap(), restart);
    }

    // ─── Toggle transition ───────────────────────────────────────

    #[test]
    fn test_toggle_scenario_single_task() {
        let start_at = civil(2026, 3, 2, 6);
        let mut record = record_starting(start_at);
        let now = civil(2026, 3, 2, 18);

        let pct = toggle_task(&mut record, 4, 1, true, now).unwrap();
        assert_eq!(pct, 25.0);
        assert_eq!(
            record.history.get("2026-03-02"),
            Some(&BTreeSet::from([1]))
        );

        let view = status(&record, &catalog(), now).unwrap();
        assert_eq!(view.today.unwrap().completion_percentage, 25.0);
        assert_eq!(view.challenge.unwrap().current_day, 1);

        let pct = toggle_task(&mut record, 4, 1, false, now).unwrap();
        assert_eq!(pct, 0.0);
        let view = status(&record, &catalog(), now).unwrap();
        assert_eq!(view.today.unwrap().completion_percentage, 0.0);
    }

    #[test]
    fn test_toggle_is_idempotent() {
        let mut record = record_starting(civil(2026, 3, 2, 6));
        let now = civil(2026, 3, 2, 18);

        toggle_task(&mut record, 4, 2, true, now).unwrap();
        toggle_task(&mut record, 4, 2, true, now).unwrap();
        assert_eq!(
            record.history.get("2026-03-02"),
            Some(&BTreeSet::from([2]))
        );

        toggle_task(&mut record, 4, 2, false, now).unwrap();
        toggle_task(&mut record, 4, 2, false, now).unwrap();
        assert_eq!(record.history.get("2026-03-02"), Some(&BTreeSet::new()));
    }

    #[test]
    fn test_toggle_rejects_out_of_range_index() {
        let mut record = record_starting(civil(2026, 3, 2, 6));
        let now = civil(2026, 3, 2, 18);

        let err = toggle_task(&mut record, 4, 4, true, now).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(record.history.is_empty());
    }

    #[test]
    fn test_toggle_only_touches_today() {
        let mut record = record_starting(civil(2026, 3, 2, 6));
        record
            .history
            .insert("2026-03-02".to_string(), BTreeSet::from([0, 1]));

        toggle_task(&mut record, 4, 3, true, civil(2026, 3, 5, 10)).unwrap();

        assert_eq!(
            record.history.get("2026-03-02"),
            Some(&BTreeSet::from([0, 1]))
        );
        assert_eq!(
            record.history.get("2026-03-05"),
            Some(&BTreeSet::from([3]))
        );
    }

    // ─── History report ──────────────────────────────────────────

    #[test]
    fn test_history_report_ascending_and_truncated() {
        let mut record = record_starting(civil(2026, 3, 1, 6));
        record
            .history
            .insert("2026-03-01".to_string(), BTreeSet::from([0]));
        record
            .history
            .insert("2026-03-02".to_string(), BTreeSet::from([0, 1]));
        record
            .history
            .insert("2026-03-03".to_string(), BTreeSet::from([0, 1, 2, 3]));

        let all = history_report(&record, 4, 30);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].date, "2026-03-01");
        assert_eq!(all[0].completion_percentage, 25.0);
        assert_eq!(all[2].date, "2026-03-03");
        assert_eq!(all[2].completion_percentage, 100.0);

        let last_two = history_report(&record, 4, 2);
        assert_eq!(last_two.len(), 2);
        assert_eq!(last_two[0].date, "2026-03-02");
        assert_eq!(last_two[1].date, "2026-03-03");
    }

    #[test]
    fn test_history_report_ignores_sunday_override() {
        // 2026-03-08 is a Sunday stored with zero completions
        let mut record = record_starting(civil(2026, 3, 2, 6));
        record
            .history
            .insert("2026-03-08".to_string(), BTreeSet::new());

        let report = history_report(&record, 4, 30);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].completion_percentage, 0.0);

        // while the live view on that same Sunday says 100
        let view = status(&record, &catalog(), civil(2026, 3, 8, 12)).unwrap();
        assert_eq!(view.today.unwrap().completion_percentage, 100.0);
    }

    #[test]
    fn test_history_report_empty_record() {
        let record = record_starting(civil(2026, 3, 2, 6));
        assert!(history_report(&record, 4, 30).is_empty());
    }
}
