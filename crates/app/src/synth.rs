use std::sync::Arc;

use beatscope_core::{BeatscopeError, Result};
use realfft::{num_complex::Complex32, RealFftPlanner, RealToComplex};

/// Stand-in for the capture subsystem: renders a synthetic kick-plus-tone
/// signal and converts each analysis block into a magnitude snapshot using
/// the same 0..=255 convention a real capture path would deliver.
pub struct SnapshotSynth {
    sample_rate: f32,
    bins: usize,
    plan: Arc<dyn RealToComplex<f32>>,
    input: Vec<f32>,
    spectrum: Vec<Complex32>,
    scratch: Vec<Complex32>,
}

impl SnapshotSynth {
    pub fn new(sample_rate: f32, bins: usize) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let plan = planner.plan_fft_forward(bins * 2);
        let input = plan.make_input_vec();
        let spectrum = plan.make_output_vec();
        let scratch = plan.make_scratch_vec();
        Self {
            sample_rate,
            bins,
            plan,
            input,
            spectrum,
            scratch,
        }
    }

    pub fn nyquist_hz(&self) -> f32 {
        self.sample_rate * 0.5
    }

    /// Renders the block starting at `time_s` and returns its snapshot.
    pub fn snapshot_at(&mut self, time_s: f32, beat_period_s: f32) -> Result<Vec<f32>> {
        let len = self.input.len();
        for (index, slot) in self.input.iter_mut().enumerate() {
            let t = time_s + index as f32 / self.sample_rate;
            *slot = sample(t, beat_period_s) * hann_value(index, len);
        }

        self.plan
            .process_with_scratch(&mut self.input, &mut self.spectrum, &mut self.scratch)
            .map_err(|err| BeatscopeError::msg(err.to_string()))?;

        let scale = 255.0 * 4.0 / len as f32;
        Ok(self
            .spectrum
            .iter()
            .take(self.bins)
            .map(|bin| (bin.norm() * scale).min(255.0))
            .collect())
    }
}

/// A decaying 55 Hz kick at every beat boundary over a quiet 440 Hz tone.
fn sample(t: f32, beat_period_s: f32) -> f32 {
    use std::f32::consts::TAU;

    let since_kick = t.rem_euclid(beat_period_s);
    let kick = (TAU * 55.0 * t).sin() * (-since_kick * 18.0).exp();
    let tone = (TAU * 440.0 * t).sin() * 0.15;
    kick + tone
}

fn hann_value(index: usize, len: usize) -> f32 {
    use std::f32::consts::PI;

    if len <= 1 {
        return 1.0;
    }

    0.5 - 0.5 * ((2.0 * PI * index as f32) / (len as f32 - 1.0)).cos()
}
