//! Core library for the Beatscope engine.
//!
//! Beatscope turns a per-frame frequency-magnitude snapshot into perceptual
//! features for a downstream visual renderer: bass/mid/treble band energies,
//! a smoothed loudness value, beat events and a tempo estimate. The crate is
//! a pure, resettable streaming transform — no device I/O, no rendering, no
//! persistence. Hosts drive [`AnalysisEngine::tick`] once per frame from
//! their own scheduler and consume the [`AnalysisFrame`] it returns.

pub mod bands;
pub mod beat;
pub mod config;
pub mod engine;
pub mod error;
pub mod loudness;
pub mod tempo;

pub use bands::{extract_band_energy, BandEnergy};
pub use beat::BeatState;
pub use config::{ColdStart, EngineConfig, ResetPolicy, Resolution};
pub use engine::{AnalysisEngine, AnalysisFrame};
pub use error::{BeatscopeError, Result};
pub use loudness::LoudnessTracker;
pub use tempo::estimate_bpm;
