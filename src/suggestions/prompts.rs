//! Coaching prompts built from a user's profile and recent activity.

use std::fmt::Write;

use super::services::{Habits, WeightDirection};
use crate::exercise::repo_types::ExerciseLog;
use crate::nutrition::repo_types::DietaryLog;
use crate::profile::repo_types::HealthProfile;

fn or_unknown<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "not specified".into())
}

fn profile_block(out: &mut String, p: &HealthProfile) {
    let _ = writeln!(out, "Health Profile:");
    let _ = writeln!(out, "- Age: {}", p.age);
    let _ = writeln!(out, "- Gender: {}", or_unknown(p.gender.as_deref()));
    let _ = writeln!(out, "- Height: {} cm", p.height);
    let _ = writeln!(out, "- Weight: {} kg", p.weight);
    let _ = writeln!(out, "- Activity Level: {}", p.activity_level);
    let _ = writeln!(out, "- Weekly Exercise: {} times", p.weekly_exercise);
    let _ = writeln!(out, "- Health Goals: {}", p.health_goals.join(", "));
}

fn exercise_block(out: &mut String, logs: &[ExerciseLog], with_calories: bool) {
    for log in logs {
        let _ = writeln!(out, "  Date: {}", log.date.date());
        let _ = writeln!(out, "  Type: {}", log.exercise_type);
        let _ = writeln!(out, "  Duration: {} minutes", log.duration);
        let _ = writeln!(out, "  Intensity: {}", log.intensity);
        if with_calories {
            let _ = writeln!(out, "  Calories Burned: {}", or_unknown(log.calories_burned));
        }
        out.push('\n');
    }
}

pub fn weight_plan(
    goal: WeightDirection,
    profile: &HealthProfile,
    habits: &Habits,
    diet: &[DietaryLog],
    exercise: &[ExerciseLog],
) -> String {
    let mut out = format!(
        "As a professional nutritionist and fitness coach, provide personalized suggestions \
         for a user who wants to {} weight. Use the following detailed information:\n\n",
        goal.as_str()
    );
    profile_block(&mut out, profile);
    let _ = writeln!(out, "- Target Weight: {} kg", or_unknown(profile.target_weight));
    let _ = writeln!(out, "- Calculated BMR: {} calories/day\n", habits.bmr);

    let _ = writeln!(out, "Current Habits (7-Day Average):");
    let _ = writeln!(out, "- Daily Calorie Intake: {} calories", habits.avg_intake);
    let _ = writeln!(out, "- Daily Calories Burned: {} calories\n", habits.avg_burned);

    let _ = writeln!(out, "Recent Diet Patterns:");
    for log in diet {
        let items: Vec<String> = log
            .food_items
            .iter()
            .map(|i| format!("{} ({} cal)", i.food_name, i.calories))
            .collect();
        let _ = writeln!(out, "  Date: {}", log.log.log_date);
        let _ = writeln!(out, "  Total Calories: {}", log.log.total_calories);
        let _ = writeln!(out, "  Food Items: {}\n", items.join(", "));
    }

    let _ = writeln!(out, "Exercise History:");
    exercise_block(&mut out, exercise, true);

    let _ = write!(
        out,
        "Please provide a comprehensive plan including:
1. Specific calorie targets for {}
2. Macro-nutrient distribution (protein, carbs, fats)
3. Meal timing and frequency recommendations
4. Specific food suggestions based on their current diet
5. Exercise routine adjustments (frequency, intensity, types)
6. Recovery and rest recommendations
7. Progress tracking metrics
8. Potential challenges and solutions

Format the response in clear sections with bullet points for easy reading.",
        goal.target_label()
    );
    out
}

pub fn strength_training(profile: &HealthProfile, exercise: &[ExerciseLog]) -> String {
    let mut out = String::from(
        "Based on the following user data, provide a personalized strength training recommendation:\n",
    );
    profile_block(&mut out, profile);
    let _ = writeln!(out, "\nRecent Exercise History:");
    exercise_block(&mut out, exercise, false);
    out.push_str(
        "Focus on strength training exercises and provide specific, actionable recommendations including:
1. Specific strength exercises or routines
2. Sets, reps, and rest periods
3. Progressive overload suggestions
4. Safety considerations
Keep the response concise and well-formatted.",
    );
    out
}

pub fn cardio_and_flexibility(profile: &HealthProfile) -> String {
    let mut out = String::from(
        "Based on the same user profile and exercise history, provide a cardio and flexibility focused recommendation:\n",
    );
    profile_block(&mut out, profile);
    out.push_str(
        "\nFocus on cardio and flexibility exercises and provide specific, actionable recommendations including:
1. Cardio workout types and durations
2. Heart rate zones and intensity levels
3. Stretching routines
4. Recovery tips
Keep the response concise and well-formatted.",
    );
    out
}
