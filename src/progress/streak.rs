//! Daily streak accounting

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::state::Streak;

/// Count a committed attempt at `now` towards the daily streak
///
/// Days are calendar days in `now`'s time zone. The day after the last
/// attempt extends the streak, a longer gap restarts it at 1, and another
/// attempt on the same day leaves it as it is. `last` always moves to `now`.
pub fn apply_daily_streak<Tz: TimeZone>(streak: &mut Streak, now: &DateTime<Tz>) {
    let today = now.date_naive();

    match streak.last.and_then(|ms| local_day(ms, &now.timezone())) {
        None => streak.days = 1,
        Some(last) => match (today - last).num_days() {
            1 => streak.days += 1,
            gap if gap > 1 => streak.days = 1,
            _ => {}
        },
    }

    streak.last = Some(now.timestamp_millis());
}

/// Calendar day of an epoch-millisecond timestamp in `tz`
fn local_day<Tz: TimeZone>(ms: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(ms).map(|utc| utc.with_timezone(tz).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
        // UTC-5 so that late-evening local times fall on the next UTC day
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, day, hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn first_attempt_starts_streak() {
        let mut streak = Streak::default();
        let now = at(10, 9, 0);
        apply_daily_streak(&mut streak, &now);

        assert_eq!(streak.days, 1);
        assert_eq!(streak.last, Some(now.timestamp_millis()));
    }

    #[test]
    fn next_calendar_day_extends_streak() {
        let mut streak = Streak::default();
        apply_daily_streak(&mut streak, &at(10, 23, 50));
        apply_daily_streak(&mut streak, &at(11, 0, 5));
        assert_eq!(streak.days, 2);
    }

    #[test]
    fn gap_of_two_days_resets() {
        let mut streak = Streak { days: 6, last: None };
        apply_daily_streak(&mut streak, &at(10, 12, 0));
        streak.days = 6;
        apply_daily_streak(&mut streak, &at(12, 8, 0));
        assert_eq!(streak.days, 1);
    }

    #[test]
    fn same_day_leaves_count_but_moves_last() {
        let mut streak = Streak::default();
        apply_daily_streak(&mut streak, &at(10, 8, 0));
        apply_daily_streak(&mut streak, &at(11, 8, 0));

        let later = at(11, 21, 30);
        apply_daily_streak(&mut streak, &later);
        assert_eq!(streak.days, 2);
        assert_eq!(streak.last, Some(later.timestamp_millis()));
    }

    #[test]
    fn clock_moving_backwards_leaves_count() {
        let mut streak = Streak::default();
        apply_daily_streak(&mut streak, &at(15, 8, 0));
        apply_daily_streak(&mut streak, &at(13, 8, 0));
        assert_eq!(streak.days, 1);
    }
}
