/// Retry backoff for unanswered calls.
///
/// Attempt 1: immediate (0m)
/// Attempt 2: base
/// Attempt 3: 2 x base
/// Attempt n: base x 2^(n-2), capped at one hour
pub fn retry_backoff_minutes(attempt_number: u32, base_mins: u32) -> u32 {
    match attempt_number {
        0 | 1 => 0,
        n => {
            let factor = 1u32.checked_shl(n - 2).unwrap_or(u32::MAX);
            base_mins.saturating_mul(factor).min(MAX_BACKOFF_MINS)
        }
    }
}

pub const MAX_BACKOFF_MINS: u32 = 60;

/// Offsets (minutes after the first dial) at which each retry fires.
pub fn retry_schedule(retry_attempts: u32, base_mins: u32) -> Vec<u32> {
    let mut at = 0u32;
    (2..=retry_attempts + 1)
        .map(|attempt| {
            at = at.saturating_add(retry_backoff_minutes(attempt, base_mins));
            at
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_from_base() {
        assert_eq!(retry_backoff_minutes(1, 5), 0);
        assert_eq!(retry_backoff_minutes(2, 5), 5);
        assert_eq!(retry_backoff_minutes(3, 5), 10);
        assert_eq!(retry_backoff_minutes(4, 5), 20);
        assert_eq!(retry_backoff_minutes(5, 5), 40);
        assert_eq!(retry_backoff_minutes(6, 5), 60);
        assert_eq!(retry_backoff_minutes(40, 5), 60);
    }

    #[test]
    fn schedule_accumulates_offsets() {
        assert_eq!(retry_schedule(3, 5), vec![5, 15, 35]);
        assert!(retry_schedule(0, 5).is_empty());
    }
}
