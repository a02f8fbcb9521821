use crate::model::{FundingObservation, FundingStats};
use crate::{TimeStampMs, MILLISECONDS_PER_HOUR};

/// Reduces a funding history to its summary statistics. Pure function of the
/// history and `now_ms`; an empty history has no stats.
///
/// The 1/3/7/30-day fields are sums of every observation inside the trailing
/// window measured from `now_ms`. Average, extrema and count cover the entire
/// series. Rates stay fractional; rounding is left to presentation.
pub fn summarize(history: &[FundingObservation], now_ms: TimeStampMs) -> Option<FundingStats> {
    if history.is_empty() {
        return None;
    }

    let mut sorted = history.to_vec();
    sorted.sort_by_key(|obs| std::cmp::Reverse(obs.time));
    let current_rate = sorted[0].rate;

    let sum_hours = |hours: i64| {
        let cutoff = now_ms - hours * MILLISECONDS_PER_HOUR;
        sorted
            .iter()
            .filter(|obs| obs.time >= cutoff)
            .map(|obs| obs.rate)
            .sum::<f64>()
    };

    let count = sorted.len();
    let total: f64 = sorted.iter().map(|obs| obs.rate).sum();
    let max = sorted.iter().map(|obs| obs.rate).fold(f64::MIN, f64::max);
    let min = sorted.iter().map(|obs| obs.rate).fold(f64::MAX, f64::min);

    Some(FundingStats {
        current_rate,
        sum_1d: sum_hours(24),
        sum_3d: sum_hours(72),
        sum_7d: sum_hours(168),
        sum_30d: sum_hours(720),
        avg: total / count as f64,
        max,
        min,
        count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MILLISECONDS_PER_DAY;
    use float_eq::assert_float_eq;

    fn obs(time: TimeStampMs, rate: f64) -> FundingObservation {
        FundingObservation { time, rate }
    }

    #[test]
    fn test_empty_history_has_no_stats() {
        assert!(summarize(&[], 1_000).is_none());
    }

    #[test]
    fn test_three_observation_scenario() {
        // unsorted on purpose: ordering is established here, not upstream
        let history = vec![obs(1, -0.0002), obs(0, 0.0001), obs(2, 0.0003)];
        let stats = summarize(&history, 1_000).unwrap();

        assert_float_eq!(stats.current_rate, 0.0003, abs <= 1e-12);
        assert_float_eq!(stats.sum_1d, 0.0002, abs <= 1e-12);
        assert_float_eq!(stats.avg, (0.0001 - 0.0002 + 0.0003) / 3.0, abs <= 1e-12);
        assert_float_eq!(stats.max, 0.0003, abs <= 1e-12);
        assert_float_eq!(stats.min, -0.0002, abs <= 1e-12);
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn test_count_and_ordering_invariants() {
        let now = 100 * MILLISECONDS_PER_DAY;
        let history: Vec<_> = (0..200i64)
            .map(|i| obs(now - i * MILLISECONDS_PER_HOUR, (i as f64 - 100.0) * 1e-5))
            .collect();
        let stats = summarize(&history, now).unwrap();
        assert_eq!(stats.count, history.len());
        assert!(stats.min <= stats.avg && stats.avg <= stats.max);
    }

    #[test]
    fn test_windowed_sums_are_nested() {
        // every observation counted in a shorter window is also in the longer
        let now = 40 * MILLISECONDS_PER_DAY;
        let history: Vec<_> = (0..35i64)
            .map(|day| obs(now - day * MILLISECONDS_PER_DAY, 0.0001))
            .collect();
        let stats = summarize(&history, now).unwrap();
        assert!(stats.sum_1d <= stats.sum_3d);
        assert!(stats.sum_3d <= stats.sum_7d);
        assert!(stats.sum_7d <= stats.sum_30d);
        // 30d window keeps days 0..=30 (cutoff inclusive), dropping the 4 oldest
        assert_float_eq!(stats.sum_30d, 31.0 * 0.0001, abs <= 1e-12);
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let history = vec![obs(10, 0.0004), obs(20, -0.0001), obs(30, 0.0002)];
        let now = 1_000_000;
        assert_eq!(summarize(&history, now), summarize(&history, now));
        // and it does not mutate its input
        assert_eq!(history[0].time, 10);
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let now = 2 * MILLISECONDS_PER_DAY;
        let history = vec![obs(now - 24 * MILLISECONDS_PER_HOUR, 0.0005)];
        let stats = summarize(&history, now).unwrap();
        assert_float_eq!(stats.sum_1d, 0.0005, abs <= 1e-12);
    }
}
