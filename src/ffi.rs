//! C FFI bindings for the tremolo kernel
//!
//! This module exposes the kernel to plugin shells written in C, C++ or
//! Swift via C-compatible functions. The host owns the instance through an
//! opaque pointer and drives the same prepare/process/reset lifecycle as the
//! Rust API. The generated header lands in `include/tremolo.h`.

use std::slice;

use crate::effects::tremolo::Tremolo;
use crate::gen::waveform::Waveform;

// =============================================================================
// Waveform selectors (must match the host's enum)
// =============================================================================

/// Waveform selector: sine.
pub const TREMOLO_WAVEFORM_SINE: u32 = 0;
/// Waveform selector: triangle.
pub const TREMOLO_WAVEFORM_TRIANGLE: u32 = 1;

// =============================================================================
// Kernel lifecycle
// =============================================================================

/// Create a new tremolo kernel
///
/// The instance is unusable until `tremolo_prepare` has been called.
///
/// # Safety
/// The returned pointer must be freed with `tremolo_free` to avoid memory
/// leaks.
#[no_mangle]
pub extern "C" fn tremolo_new() -> *mut Tremolo {
    Box::into_raw(Box::new(Tremolo::new()))
}

/// Free a tremolo kernel
///
/// # Safety
/// `tremolo` must be a valid pointer returned by `tremolo_new`, or null.
/// After calling this function, the pointer is invalid and must not be used.
#[no_mangle]
pub unsafe extern "C" fn tremolo_free(tremolo: *mut Tremolo) {
    if !tremolo.is_null() {
        drop(Box::from_raw(tremolo));
    }
}

/// Configure the kernel for the host's sample rate
///
/// Call once before the first `tremolo_process` and again whenever the host
/// sample rate changes, while the audio callback is not running.
///
/// # Arguments
/// * `sample_rate` - Audio sample rate in Hz, must be positive
/// * `max_frames_per_block` - Host upper bound on block length, must be positive
///
/// # Safety
/// `tremolo` must be a valid pointer returned by `tremolo_new`.
#[no_mangle]
pub unsafe extern "C" fn tremolo_prepare(
    tremolo: *mut Tremolo,
    sample_rate: f32,
    max_frames_per_block: u32,
) {
    if let Some(tremolo) = tremolo.as_mut() {
        tremolo.prepare(sample_rate, max_frames_per_block as usize);
    }
}

// =============================================================================
// Control
// =============================================================================

/// Select the modulation waveform
///
/// Safe to call from a control thread while audio is running; the selection
/// is picked up at the start of the next `tremolo_process` call. Unknown
/// selectors are ignored.
///
/// # Safety
/// `tremolo` must be a valid pointer returned by `tremolo_new`.
#[no_mangle]
pub unsafe extern "C" fn tremolo_set_waveform(tremolo: *mut Tremolo, waveform: u32) {
    if let Some(tremolo) = tremolo.as_ref() {
        if let Some(waveform) = Waveform::from_index(waveform as usize) {
            tremolo.set_waveform(waveform);
        }
    }
}

/// Reset every generator's phase
///
/// Call on transport restarts and seeks, while the audio callback is not
/// running.
///
/// # Safety
/// `tremolo` must be a valid pointer returned by `tremolo_new`.
#[no_mangle]
pub unsafe extern "C" fn tremolo_reset(tremolo: *mut Tremolo) {
    if let Some(tremolo) = tremolo.as_mut() {
        tremolo.reset();
    }
}

// =============================================================================
// Audio processing
// =============================================================================

/// Render the gain envelope over a channel-major block, in place
///
/// This is the audio-thread entry point; call it once per block.
///
/// # Arguments
/// * `tremolo` - Pointer to a kernel instance
/// * `channels` - Array of `num_channels` pointers, each to `num_frames` floats
/// * `num_channels` - Number of channel buffers
/// * `num_frames` - Frames in every channel buffer
///
/// # Safety
/// - `tremolo` must be a valid pointer returned by `tremolo_new`
/// - `channels` must point to `num_channels` valid, non-aliasing channel
///   buffers of at least `num_frames` floats each
#[no_mangle]
pub unsafe extern "C" fn tremolo_process(
    tremolo: *mut Tremolo,
    channels: *const *mut f32,
    num_channels: u32,
    num_frames: u32,
) {
    if tremolo.is_null() || channels.is_null() {
        return;
    }

    let tremolo = &mut *tremolo;
    let pointers = slice::from_raw_parts(channels, num_channels as usize);
    let mut channels: Vec<&mut [f32]> = pointers
        .iter()
        .map(|&pointer| slice::from_raw_parts_mut(pointer, num_frames as usize))
        .collect();

    tremolo.process(&mut channels);
}
