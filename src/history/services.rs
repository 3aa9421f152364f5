use std::collections::BTreeMap;

use time::{Date, UtcOffset};

use super::dto::{DayOverview, ExerciseSummary, MealSummary};
use crate::exercise::repo_types::ExerciseLog;
use crate::nutrition::repo_types::DietaryLogRow;

/// Groups logs by calendar day, newest day first. Exercise timestamps are
/// placed on the day they fall on in `offset`.
pub fn group_by_day(
    logs: Vec<DietaryLogRow>,
    exercises: Vec<ExerciseLog>,
    offset: UtcOffset,
) -> Vec<DayOverview> {
    let mut days: BTreeMap<Date, DayOverview> = BTreeMap::new();

    for log in logs {
        day(&mut days, log.log_date).dietary_logs.push(MealSummary {
            id: log.id,
            meal_type: log.meal_type,
            total_calories: log.total_calories,
        });
    }
    for ex in exercises {
        day(&mut days, ex.date.to_offset(offset).date())
            .exercise_logs
            .push(ExerciseSummary {
                id: ex.id,
                exercise_type: ex.exercise_type,
                duration: ex.duration,
                calories_burned: ex.calories_burned,
            });
    }

    days.into_values().rev().collect()
}

fn day(days: &mut BTreeMap<Date, DayOverview>, date: Date) -> &mut DayOverview {
    days.entry(date).or_insert_with(|| DayOverview {
        date,
        dietary_logs: Vec::new(),
        exercise_logs: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime, offset};
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;

    fn log(day: Date, meal: &str, kcal: i32) -> DietaryLogRow {
        let start = day.midnight().assume_utc();
        DietaryLogRow {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            meal_type: meal.into(),
            log_date: day,
            date: start,
            total_calories: kcal,
            notes: None,
            created_at: start,
            updated_at: start,
        }
    }

    fn exercise(at: OffsetDateTime, minutes: i32) -> ExerciseLog {
        ExerciseLog {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            exercise_type: "cycling".into(),
            duration: minutes,
            intensity: "MODERATE".into(),
            calories_burned: None,
            notes: None,
            date: at,
            created_at: at,
        }
    }

    #[test]
    fn days_are_newest_first() {
        let out = group_by_day(
            vec![
                log(date!(2024-03-01), "BREAKFAST", 300),
                log(date!(2024-03-03), "LUNCH", 700),
                log(date!(2024-03-01), "DINNER", 650),
            ],
            vec![exercise(datetime!(2024-03-02 18:00 UTC), 45)],
            UtcOffset::UTC,
        );
        let dates: Vec<_> = out.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date!(2024-03-03), date!(2024-03-02), date!(2024-03-01)]);
        assert_eq!(out[2].dietary_logs.len(), 2);
        assert!(out[1].dietary_logs.is_empty());
        assert_eq!(out[1].exercise_logs[0].duration, 45);
    }

    #[test]
    fn exercise_day_follows_offset() {
        let out = group_by_day(
            vec![],
            vec![exercise(datetime!(2024-03-02 23:30 UTC), 20)],
            offset!(+2),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date, date!(2024-03-03));
    }

    #[test]
    fn empty_history_is_empty() {
        assert!(group_by_day(vec![], vec![], UtcOffset::UTC).is_empty());
    }
}
