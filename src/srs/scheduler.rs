use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::{MIN_EASINESS, QUALITY_PASS_THRESHOLD};

/// Scheduling parameters produced by a single SM-2 review step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSchedule {
    pub easiness: f64,
    pub interval_days: u32,
    pub repetitions: u32,
    pub next_review_date: NaiveDate,
}

/// SM-2 next-review computation.
///
/// Pure and deterministic: `today` is passed in explicitly so callers decide
/// which local calendar day the review happened on. `quality` above 5 is
/// clamped to 5.
pub fn compute_next_review(
    quality: u8,
    prev_easiness: f64,
    prev_interval: u32,
    prev_repetitions: u32,
    today: NaiveDate,
) -> ReviewSchedule {
    let quality = quality.min(5);
    let miss = f64::from(5 - quality);
    let easiness = (prev_easiness + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASINESS);

    let (repetitions, interval_days) = if quality < QUALITY_PASS_THRESHOLD {
        (0, 1)
    } else {
        let repetitions = prev_repetitions + 1;
        let interval = match repetitions {
            1 => 1,
            2 => 6,
            // f64::round 对正数即四舍五入
            _ => (f64::from(prev_interval) * easiness).round().max(1.0) as u32,
        };
        (repetitions, interval)
    };

    ReviewSchedule {
        easiness,
        interval_days,
        repetitions,
        next_review_date: today + Duration::days(i64::from(interval_days)),
    }
}

#[cfg(test)]
mod tests {
    use crate::constants::DEFAULT_EASINESS;

    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn failure_resets_repetitions_and_interval() {
        for quality in 0..QUALITY_PASS_THRESHOLD {
            let s = compute_next_review(quality, 2.5, 30, 7, day());
            assert_eq!(s.repetitions, 0);
            assert_eq!(s.interval_days, 1);
            assert_eq!(s.next_review_date, day() + Duration::days(1));
        }
    }

    #[test]
    fn success_progression_is_1_6_then_scaled() {
        let s1 = compute_next_review(5, DEFAULT_EASINESS, 0, 0, day());
        assert_eq!((s1.repetitions, s1.interval_days), (1, 1));

        let s2 = compute_next_review(5, s1.easiness, s1.interval_days, s1.repetitions, day());
        assert_eq!((s2.repetitions, s2.interval_days), (2, 6));

        let s3 = compute_next_review(5, s2.easiness, s2.interval_days, s2.repetitions, day());
        assert_eq!(s3.repetitions, 3);
        assert_eq!(
            s3.interval_days,
            (6.0 * s3.easiness).round() as u32,
            "third interval scales the previous one by the new easiness"
        );
    }

    #[test]
    fn easiness_never_drops_below_floor() {
        let mut easiness = MIN_EASINESS;
        for _ in 0..10 {
            let s = compute_next_review(0, easiness, 1, 0, day());
            assert!(s.easiness >= MIN_EASINESS);
            easiness = s.easiness;
        }
    }

    #[test]
    fn quality_five_raises_easiness() {
        let s = compute_next_review(5, 2.5, 1, 1, day());
        assert!(s.easiness > 2.5);
    }

    #[test]
    fn end_to_end_quality_sequence() {
        // good, good, then a lapse
        let s1 = compute_next_review(4, DEFAULT_EASINESS, 0, 0, day());
        assert_eq!((s1.repetitions, s1.interval_days), (1, 1));
        let s2 = compute_next_review(4, s1.easiness, s1.interval_days, s1.repetitions, day());
        assert_eq!((s2.repetitions, s2.interval_days), (2, 6));
        let s3 = compute_next_review(2, s2.easiness, s2.interval_days, s2.repetitions, day());
        assert_eq!((s3.repetitions, s3.interval_days), (0, 1));
    }

    #[test]
    fn oversized_quality_is_clamped() {
        let a = compute_next_review(9, 2.5, 6, 2, day());
        let b = compute_next_review(5, 2.5, 6, 2, day());
        assert_eq!(a, b);
    }
}
