//! Platform abstraction for audio output
//!
//! Connects the tremolo kernel to a real-time output backend (CPAL on
//! native). The kernel itself stays host-agnostic; this module is the
//! collaborator that owns devices, streams and threading and calls into the
//! kernel from the audio callback.

use std::sync::{Arc, Mutex};

use crate::effects::tremolo::Tremolo;
use crate::gen::waveform::Waveform;

/// Trait for platform-specific audio output implementations
pub trait AudioOutput {
    /// Initialize the audio output with the given sample rate
    fn initialize(&mut self, sample_rate: f32) -> Result<(), anyhow::Error>;

    /// Start the audio stream
    fn start(&mut self) -> Result<(), anyhow::Error>;

    /// Stop the audio stream
    fn stop(&mut self) -> Result<(), anyhow::Error>;

    /// Get the current sample rate
    fn sample_rate(&self) -> f32;

    /// Check if the audio output is active
    fn is_active(&self) -> bool;
}

/// Shared handle that lets a control thread steer the kernel while an audio
/// callback processes with it.
///
/// The kernel sits behind a mutex because `process` and `reset` need
/// `&mut`; the callback locks once per block. Waveform switches go through
/// the kernel's own pending slot, so they still only take effect at block
/// boundaries.
pub struct TremoloRig {
    tremolo: Arc<Mutex<Tremolo>>,
    carrier_hz: f32,
    sample_rate: f32,
}

impl TremoloRig {
    /// Create a rig around a fresh kernel.
    ///
    /// `carrier_hz` is the test tone the demo feeds through the kernel.
    pub fn new(sample_rate: f32, carrier_hz: f32) -> Self {
        Self {
            tremolo: Arc::new(Mutex::new(Tremolo::new())),
            carrier_hz,
            sample_rate,
        }
    }

    /// Handle for the audio output to process with.
    pub fn tremolo(&self) -> Arc<Mutex<Tremolo>> {
        self.tremolo.clone()
    }

    /// Select the modulation waveform; picked up at the next processed block.
    pub fn set_waveform(&self, waveform: Waveform) {
        self.tremolo.lock().unwrap().set_waveform(waveform);
    }

    /// Zero the oscillator phase, as on a transport restart.
    pub fn reset(&self) {
        self.tremolo.lock().unwrap().reset();
    }

    /// Get the configured sample rate
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Get the demo carrier frequency
    pub fn carrier_hz(&self) -> f32 {
        self.carrier_hz
    }
}

// Platform-specific implementations
#[cfg(feature = "native")]
pub mod cpal_output;

#[cfg(feature = "native")]
pub use self::cpal_output::CpalOutput;
