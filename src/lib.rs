//! LFO-driven amplitude modulation (tremolo) kernel for embedding in audio hosts.
//!
//! The kernel itself is [`Tremolo`] in [`effects`]; everything else is the
//! surface a host or demo reaches it through: C bindings in [`ffi`], audio
//! output plumbing in [`platform`], offline WAV rendering in [`bounce`].

pub mod effects;
pub mod ffi;
pub mod gen;
pub mod utils;

// Platform abstraction layer
pub mod platform;

#[cfg(feature = "bounce")]
pub mod bounce;

pub use effects::tremolo::{Tremolo, DEFAULT_RATE_HZ, MODULATION_DEPTH};
pub use gen::waveform::Waveform;
