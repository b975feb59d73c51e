//! Tick timing derived from score
//!
//! The rules engine never reads a speed value. The session computes
//! `speed = start_speed + score / 10` after every command and picks the
//! interval between automatic `MoveDown` ticks from a table.

use std::time::Duration;

/// Points needed per speed step
pub const SCORE_PER_SPEED_STEP: u32 = 10;

/// Tick interval by speed (milliseconds per row)
///
/// Index 0 = speed 0 (slow), index 10 = speed 10 (fast)
pub const TICK_INTERVALS_MS: [u64; 11] = [1000, 800, 650, 500, 400, 320, 250, 200, 160, 140, 120];

/// Interval used for every speed beyond the table
pub const TICK_INTERVAL_MIN_MS: u64 = 100;

/// Speed reached from `start_speed` after scoring `score`
pub fn speed_for_score(start_speed: u32, score: u32) -> u32 {
    start_speed.saturating_add(score / SCORE_PER_SPEED_STEP)
}

/// Get tick interval for a speed (in milliseconds)
pub fn tick_interval_ms(speed: u32) -> u64 {
    TICK_INTERVALS_MS
        .get(speed as usize)
        .copied()
        .unwrap_or(TICK_INTERVAL_MIN_MS)
}

pub fn tick_interval(speed: u32) -> Duration {
    Duration::from_millis(tick_interval_ms(speed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_steps_every_ten_points() {
        assert_eq!(speed_for_score(0, 0), 0);
        assert_eq!(speed_for_score(0, 9), 0);
        assert_eq!(speed_for_score(0, 10), 1);
        assert_eq!(speed_for_score(3, 27), 5);
        assert_eq!(speed_for_score(u32::MAX, 100), u32::MAX);
    }

    #[test]
    fn test_tick_intervals() {
        assert_eq!(tick_interval_ms(0), 1000);
        assert_eq!(tick_interval_ms(10), 120);
        assert_eq!(tick_interval_ms(11), 100);
        assert_eq!(tick_interval_ms(500), 100);
    }

    #[test]
    fn test_intervals_never_increase_with_speed() {
        let mut prev = u64::MAX;
        for speed in 0..20 {
            let interval = tick_interval_ms(speed);
            assert!(interval <= prev);
            prev = interval;
        }
    }
}
