use serde::{Deserialize, Serialize};

use crate::EngineConfig;

/// Normalised energy of the three perceptual frequency bands.
///
/// Each field is the mean magnitude of a contiguous bin range divided by the
/// configured full scale, so every value lies in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BandEnergy {
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
}

/// Splits a frequency snapshot into bass/mid/treble energies.
///
/// Pure and total: an empty snapshot, a non-positive Nyquist frequency or an
/// empty band partition all yield zero energy rather than an error. Bin
/// boundaries follow `floor(cutoff / nyquist * n)` with the cutoffs taken
/// from the configuration (250 Hz and 4 kHz by default).
pub fn extract_band_energy(snapshot: &[f32], nyquist_hz: f32, config: &EngineConfig) -> BandEnergy {
    let n = snapshot.len();
    if n == 0 || nyquist_hz <= 0.0 {
        return BandEnergy::default();
    }

    let bass_end = ((config.bass_end_hz / nyquist_hz) * n as f32).floor() as usize;
    let bass_end = bass_end.min(n);
    let mid_end = ((config.mid_end_hz / nyquist_hz) * n as f32).floor() as usize;
    let mid_end = mid_end.clamp(bass_end, n);

    BandEnergy {
        bass: mean_energy(&snapshot[..bass_end], config.magnitude_full_scale),
        mid: mean_energy(&snapshot[bass_end..mid_end], config.magnitude_full_scale),
        treble: mean_energy(&snapshot[mid_end..], config.magnitude_full_scale),
    }
}

fn mean_energy(bins: &[f32], full_scale: f32) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }

    let sum: f32 = bins.iter().sum();
    (sum / (bins.len() as f32 * full_scale)).clamp(0.0, 1.0)
}
