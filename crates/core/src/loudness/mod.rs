/// Tracks overall loudness as an exponentially smoothed RMS.
///
/// The raw RMS of each snapshot is folded into a single-pole moving average,
/// `new = prev + (raw - prev) * smoothing`, which damps per-frame jitter
/// without behaving like a peak detector. The value before the most recent
/// update is retained because the beat detector compares against the
/// pre-update loudness level.
#[derive(Debug, Clone)]
pub struct LoudnessTracker {
    smoothing: f32,
    full_scale: f32,
    smoothed: f32,
    previous: f32,
}

impl LoudnessTracker {
    pub fn new(smoothing: f32, full_scale: f32) -> Self {
        Self {
            smoothing,
            full_scale,
            smoothed: 0.0,
            previous: 0.0,
        }
    }

    /// Folds one snapshot into the moving average and returns the new value.
    pub fn update(&mut self, snapshot: &[f32]) -> f32 {
        let raw = raw_rms(snapshot, self.full_scale);
        self.previous = self.smoothed;
        self.smoothed += (raw - self.smoothed) * self.smoothing;
        self.smoothed
    }

    /// Smoothed RMS after the most recent update.
    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }

    /// Smoothed RMS as it was before the most recent update.
    pub fn previous(&self) -> f32 {
        self.previous
    }

    /// Clears the accumulated loudness without touching the tunables.
    pub fn reset(&mut self) {
        self.smoothed = 0.0;
        self.previous = 0.0;
    }
}

fn raw_rms(snapshot: &[f32], full_scale: f32) -> f32 {
    if snapshot.is_empty() {
        return 0.0;
    }

    let sum: f32 = snapshot
        .iter()
        .map(|value| {
            let normalised = value / full_scale;
            normalised * normalised
        })
        .sum();
    (sum / snapshot.len() as f32).sqrt().clamp(0.0, 1.0)
}
