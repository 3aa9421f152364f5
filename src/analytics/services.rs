//! Aggregations behind the analytics endpoints.

use std::collections::{BTreeMap, HashMap};

use time::{Date, UtcOffset};
use uuid::Uuid;

use super::dto::{DietPoint, ExercisePoint};
use crate::exercise::repo_types::ExerciseLog;
use crate::nutrition::record::round_grams;
use crate::nutrition::repo_types::{DietaryLogRow, FoodEntryRow};

/// One point per log, in the order given, with its items' macros summed.
pub fn diet_points(logs: Vec<DietaryLogRow>, entries: &[FoodEntryRow]) -> Vec<DietPoint> {
    let mut sums: HashMap<Uuid, (i64, f64, f64, f64)> = HashMap::new();
    for e in entries {
        let s = sums.entry(e.dietary_log_id).or_default();
        s.0 += i64::from(e.calories);
        s.1 += e.protein;
        s.2 += e.carbs;
        s.3 += e.fats;
    }
    logs.into_iter()
        .map(|log| {
            let (calories, protein, carbs, fats) = sums.remove(&log.id).unwrap_or_default();
            DietPoint {
                id: log.id,
                date: log.date,
                meal_type: log.meal_type,
                calories,
                protein: round_grams(protein),
                carbs: round_grams(carbs),
                fats: round_grams(fats),
            }
        })
        .collect()
}

/// Per-day totals, oldest day first; a missing calorie figure counts as 0.
pub fn exercise_points(logs: &[ExerciseLog], offset: UtcOffset) -> Vec<ExercisePoint> {
    let mut days: BTreeMap<Date, ExercisePoint> = BTreeMap::new();
    for log in logs {
        let date = log.date.to_offset(offset).date();
        let p = days.entry(date).or_insert(ExercisePoint {
            date,
            calories_burned: 0,
            duration: 0,
        });
        p.calories_burned += i64::from(log.calories_burned.unwrap_or(0));
        p.duration += i64::from(log.duration);
    }
    days.into_values().collect()
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};
    use time::OffsetDateTime;

    use super::*;

    fn log(at: OffsetDateTime, meal: &str) -> DietaryLogRow {
        DietaryLogRow {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            meal_type: meal.into(),
            log_date: at.date(),
            date: at,
            total_calories: 0,
            notes: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn item(log_id: Uuid, kcal: i32, p: f64, c: f64, f: f64) -> FoodEntryRow {
        FoodEntryRow {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            dietary_log_id: log_id,
            food_name: "x".into(),
            calories: kcal,
            protein: p,
            carbs: c,
            fats: f,
            serving_size: "1".into(),
            image_url: None,
            ai_predicted: true,
            source: "predicted".into(),
            meal_type: "LUNCH".into(),
            created_at: datetime!(2024-01-01 12:00 UTC),
        }
    }

    fn exercise(at: OffsetDateTime, minutes: i32, kcal: Option<i32>) -> ExerciseLog {
        ExerciseLog {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            exercise_type: "run".into(),
            duration: minutes,
            intensity: "HIGH".into(),
            calories_burned: kcal,
            notes: None,
            date: at,
            created_at: at,
        }
    }

    #[test]
    fn diet_points_sum_items_per_log() {
        let lunch = log(datetime!(2024-01-01 00:00 UTC), "LUNCH");
        let dinner = log(datetime!(2024-01-02 00:00 UTC), "DINNER");
        let entries = vec![
            item(lunch.id, 300, 10.1, 40.0, 5.0),
            item(lunch.id, 200, 4.2, 20.0, 7.5),
            item(dinner.id, 650, 30.0, 70.0, 20.0),
        ];
        let (lunch_id, dinner_id) = (lunch.id, dinner.id);

        let out = diet_points(vec![lunch, dinner], &entries);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, lunch_id);
        assert_eq!(out[0].calories, 500);
        assert_eq!(out[0].protein, 14.3);
        assert_eq!(out[0].fats, 12.5);
        assert_eq!(out[1].id, dinner_id);
        assert_eq!(out[1].calories, 650);
    }

    #[test]
    fn log_without_items_is_zero() {
        let out = diet_points(vec![log(datetime!(2024-01-01 00:00 UTC), "SNACK")], &[]);
        assert_eq!(out[0].calories, 0);
        assert_eq!(out[0].carbs, 0.0);
    }

    #[test]
    fn exercise_totals_exceed_i32_without_overflow() {
        let at = datetime!(2024-01-05 09:00 UTC);
        let out = exercise_points(
            &[
                exercise(at, i32::MAX, Some(2_000_000_000)),
                exercise(at, i32::MAX, Some(2_000_000_000)),
            ],
            UtcOffset::UTC,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].calories_burned, 4_000_000_000);
        assert_eq!(out[0].duration, 2 * i64::from(i32::MAX));
    }

    #[test]
    fn exercise_points_total_by_day_ascending() {
        let out = exercise_points(
            &[
                exercise(datetime!(2024-01-02 08:00 UTC), 30, Some(250)),
                exercise(datetime!(2024-01-01 18:00 UTC), 20, None),
                exercise(datetime!(2024-01-02 19:00 UTC), 15, Some(100)),
            ],
            UtcOffset::UTC,
        );
        assert_eq!(
            out,
            vec![
                ExercisePoint {
                    date: date!(2024-01-01),
                    calories_burned: 0,
                    duration: 20
                },
                ExercisePoint {
                    date: date!(2024-01-02),
                    calories_burned: 350,
                    duration: 45
                },
            ]
        );
    }
}
