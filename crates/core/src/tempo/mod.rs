use std::collections::VecDeque;

/// Derives a tempo in BPM from recorded beat timestamps (milliseconds).
///
/// With fewer than `min_samples` timestamps the fallback is returned
/// unchanged. Otherwise the consecutive inter-beat intervals are sorted and
/// the element at index `len / 2` is taken as the median; the index-based
/// pick (rather than an interpolated median) keeps the estimate bit-exact
/// across implementations. A zero median, which can occur when the clock
/// resolution collapses two beats onto one timestamp, also yields the
/// fallback.
pub fn estimate_bpm(history: &VecDeque<f64>, fallback_bpm: u32, min_samples: usize) -> u32 {
    if history.len() < min_samples.max(2) {
        return fallback_bpm;
    }

    let mut intervals: Vec<f64> = history
        .iter()
        .zip(history.iter().skip(1))
        .map(|(earlier, later)| later - earlier)
        .collect();
    intervals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let median = intervals[intervals.len() / 2];
    if median <= f64::EPSILON {
        return fallback_bpm;
    }

    (60_000.0 / median).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(timestamps: &[f64]) -> VecDeque<f64> {
        timestamps.iter().copied().collect()
    }

    #[test]
    fn falls_back_below_the_sample_floor() {
        assert_eq!(estimate_bpm(&history(&[]), 120, 5), 120);
        assert_eq!(estimate_bpm(&history(&[0.0, 500.0, 1000.0, 1500.0]), 97, 5), 97);
    }

    #[test]
    fn steady_half_second_intervals_read_as_120_bpm() {
        let beats = history(&[0.0, 500.0, 1000.0, 1500.0, 2000.0]);
        assert_eq!(estimate_bpm(&beats, 60, 5), 120);
    }

    #[test]
    fn median_rejects_a_single_outlier_interval() {
        // One 100 ms stumble among 500 ms intervals; the sorted pick at
        // index len / 2 still lands on 500 ms.
        let beats = history(&[0.0, 100.0, 600.0, 1100.0, 1600.0]);
        assert_eq!(estimate_bpm(&beats, 60, 5), 120);
    }

    #[test]
    fn zero_median_interval_falls_back() {
        let beats = history(&[100.0, 100.0, 100.0, 100.0, 100.0]);
        assert_eq!(estimate_bpm(&beats, 120, 5), 120);
    }

    #[test]
    fn rounds_to_the_nearest_integer_bpm() {
        // 450 ms intervals give 133.33 BPM.
        let beats = history(&[0.0, 450.0, 900.0, 1350.0, 1800.0]);
        assert_eq!(estimate_bpm(&beats, 60, 5), 133);
    }
}
