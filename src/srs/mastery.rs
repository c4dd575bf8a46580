use chrono::NaiveDate;

use crate::constants::{
    MASTERY_ACCURACY_THRESHOLD, MASTERY_EASINESS_THRESHOLD, MASTERY_MIN_REPETITIONS,
};

/// An item is due once its scheduled date is today or in the past.
pub fn is_due(next_review_date: NaiveDate, today: NaiveDate) -> bool {
    next_review_date <= today
}

fn success_rate(correct: u32, incorrect: u32) -> f64 {
    let attempts = correct + incorrect;
    if attempts == 0 {
        0.0
    } else {
        f64::from(correct) / f64::from(attempts)
    }
}

/// Mastery percentage in `[0, 100]`.
///
/// 正确率占 70%，重复次数（10 次封顶）占 30%。
pub fn mastery_percent(correct: u32, incorrect: u32, repetitions: u32) -> f64 {
    let rate = success_rate(correct, incorrect);
    let rep_factor = (f64::from(repetitions) / 10.0).min(1.0);
    ((rate * 0.7 + rep_factor * 0.3) * 100.0).min(100.0)
}

/// Full mastery gate: enough repetitions, high accuracy, and an easiness
/// factor that shows the item stopped being hard. Zero attempts never pass.
pub fn is_mastered(repetitions: u32, easiness: f64, correct: u32, incorrect: u32) -> bool {
    if correct + incorrect == 0 {
        return false;
    }
    repetitions >= MASTERY_MIN_REPETITIONS
        && success_rate(correct, incorrect) > MASTERY_ACCURACY_THRESHOLD
        && easiness > MASTERY_EASINESS_THRESHOLD
}
