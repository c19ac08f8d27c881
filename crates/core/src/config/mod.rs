use serde::{Deserialize, Serialize};

use crate::{BeatscopeError, Result};

/// Snapshot resolutions the capture side may deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Bins128,
    Bins256,
    Bins512,
}

impl Resolution {
    /// Number of frequency bins in a snapshot at this resolution.
    pub fn bins(self) -> usize {
        match self {
            Resolution::Bins128 => 128,
            Resolution::Bins256 => 256,
            Resolution::Bins512 => 512,
        }
    }

    /// Looks up the resolution matching a bin count, if it is a supported one.
    pub fn from_bins(bins: usize) -> Option<Self> {
        match bins {
            128 => Some(Resolution::Bins128),
            256 => Some(Resolution::Bins256),
            512 => Some(Resolution::Bins512),
            _ => None,
        }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::Bins256
    }
}

/// Policy for the very first tick of a session.
///
/// With [`ColdStart::FireImmediately`] no beat has ever been recorded, so the
/// refractory checks are trivially satisfied and a qualifying first frame may
/// beat straight away. [`ColdStart::HoldRefractory`] instead measures the
/// refractory windows from time zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColdStart {
    FireImmediately,
    HoldRefractory,
}

/// What happens to accumulated analysis state when the snapshot resolution
/// changes mid-session.
///
/// [`ResetPolicy::ResetAnalysis`] clears the loudness tracker, beat history
/// and held tempo so that statistics gathered at different bin resolutions
/// are never mixed. [`ResetPolicy::Preserve`] keeps everything, for hosts
/// that resample seamlessly across the switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetPolicy {
    ResetAnalysis,
    Preserve,
}

/// Fixed tunables supplied at engine initialisation or reconfiguration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub resolution: Resolution,
    /// Full-scale magnitude of a snapshot bin; energies are normalised
    /// against it.
    pub magnitude_full_scale: f32,
    /// Single-pole smoothing factor applied to the raw RMS.
    pub smoothing: f32,
    pub bass_end_hz: f32,
    pub mid_end_hz: f32,
    pub bass_threshold: f32,
    pub bass_refractory_ms: f64,
    /// Loudness-jump heuristic fires when the smoothed RMS exceeds the
    /// previous value by this ratio.
    pub rms_jump_ratio: f32,
    pub rms_floor: f32,
    pub rms_refractory_ms: f64,
    pub beat_history_capacity: usize,
    /// Minimum number of recorded beats before the tempo estimate replaces
    /// the fallback.
    pub min_tempo_samples: usize,
    pub fallback_bpm: u32,
    pub cold_start: ColdStart,
    pub reset_policy: ResetPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            magnitude_full_scale: 255.0,
            smoothing: 0.1,
            bass_end_hz: 250.0,
            mid_end_hz: 4000.0,
            bass_threshold: 0.7,
            bass_refractory_ms: 200.0,
            rms_jump_ratio: 1.2,
            rms_floor: 0.1,
            rms_refractory_ms: 150.0,
            beat_history_capacity: 20,
            min_tempo_samples: 5,
            fallback_bpm: 120,
            cold_start: ColdStart::FireImmediately,
            reset_policy: ResetPolicy::ResetAnalysis,
        }
    }
}

impl EngineConfig {
    /// Checks the tunables for internal consistency.
    pub fn validate(&self) -> Result<()> {
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(BeatscopeError::Config(format!(
                "smoothing must lie in (0, 1], got {}",
                self.smoothing
            )));
        }
        if self.magnitude_full_scale <= 0.0 {
            return Err(BeatscopeError::Config(format!(
                "magnitude full scale must be positive, got {}",
                self.magnitude_full_scale
            )));
        }
        if self.bass_end_hz <= 0.0 || self.mid_end_hz <= self.bass_end_hz {
            return Err(BeatscopeError::Config(format!(
                "band cutoffs must satisfy 0 < bass ({}) < mid ({})",
                self.bass_end_hz, self.mid_end_hz
            )));
        }
        if self.beat_history_capacity == 0 {
            return Err(BeatscopeError::Config(
                "beat history capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
