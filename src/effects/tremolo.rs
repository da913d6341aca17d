//! Tremolo — periodic amplitude modulation driven by a low frequency oscillator.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::gen::lfo::Lfo;
use crate::gen::waveform::Waveform;

/// Frequency of the modulation LFOs, in Hz.
pub const DEFAULT_RATE_HZ: f32 = 5.0;

/// Fraction of full-scale gain swing applied by the modulation.
/// The emitted gain envelope spans `[1.0 - MODULATION_DEPTH, 1.0]`.
pub const MODULATION_DEPTH: f32 = 0.4;

/// Amplitude modulation kernel for a host audio plugin.
///
/// Owns one [`Lfo`] per supported [`Waveform`]. [`process`](Self::process)
/// advances the active generator sample by sample and writes the resulting
/// gain envelope into every channel of the block, in place. Call
/// [`prepare`](Self::prepare) before the first `process` and again whenever
/// the host sample rate changes; call [`reset`](Self::reset) when the
/// transport restarts or seeks.
///
/// [`set_waveform`](Self::set_waveform) takes `&self` and is safe to call
/// from a control thread while the audio callback runs: the selection lands
/// in an atomic slot and is latched once at the start of the next `process`
/// call, never mid-block.
pub struct Tremolo {
    lfos: [Lfo; Waveform::COUNT],
    active: Waveform,
    // Waveform index written by the control side, read once per block.
    pending: AtomicU8,
}

impl Tremolo {
    pub fn new() -> Self {
        Self {
            lfos: Waveform::ALL.map(|waveform| Lfo::new(waveform, DEFAULT_RATE_HZ)),
            active: Waveform::Sine,
            pending: AtomicU8::new(Waveform::Sine.index() as u8),
        }
    }

    /// Configure every generator for the host's sample rate.
    ///
    /// `max_frames_per_block` is the host's upper bound on block length,
    /// accepted for pre-allocation purposes; the kernel keeps no internal
    /// buffers, so only its positivity contract is checked.
    pub fn prepare(&mut self, sample_rate: f32, max_frames_per_block: usize) {
        assert!(sample_rate > 0.0, "sample rate must be positive");
        assert!(max_frames_per_block > 0, "block size must be positive");

        for lfo in &mut self.lfos {
            lfo.prepare(sample_rate);
        }
    }

    /// Select the waveform driving the modulation.
    ///
    /// Has no audible effect until the next [`process`](Self::process) call
    /// latches it, so a block already being rendered is never torn.
    pub fn set_waveform(&self, waveform: Waveform) {
        self.pending.store(waveform.index() as u8, Ordering::Release);
    }

    /// The waveform in use by the processing side.
    pub fn waveform(&self) -> Waveform {
        self.active
    }

    /// Render the gain envelope over a channel-major block, in place.
    ///
    /// Every channel slice must have the same length. The envelope replaces
    /// the buffer contents outright; the input signal is deliberately not
    /// scaled.
    pub fn process<C: AsMut<[f32]>>(&mut self, channels: &mut [C]) {
        let frames = match channels.first_mut() {
            Some(first) => first.as_mut().len(),
            None => return,
        };
        if frames == 0 {
            return;
        }
        for channel in channels.iter_mut() {
            debug_assert_eq!(channel.as_mut().len(), frames, "channel length mismatch");
        }

        // Latch the control-side selection once per block.
        let pending = self.pending.load(Ordering::Acquire) as usize;
        self.active = Waveform::from_index(pending).expect("waveform index out of range");

        let lfo = &mut self.lfos[self.active.index()];
        for frame in 0..frames {
            let value = lfo.tick();
            let gain = 0.5 * (value + 1.0);
            let out = (1.0 - MODULATION_DEPTH) + MODULATION_DEPTH * gain;

            for channel in channels.iter_mut() {
                channel.as_mut()[frame] = out;
            }
        }
    }

    /// Zero every generator's phase, keeping frequency and sample rate.
    ///
    /// Hosts call this on transport restarts and seeks so the modulation
    /// does not continue from a phase unrelated to the new position.
    pub fn reset(&mut self) {
        for lfo in &mut self.lfos {
            lfo.reset();
        }
    }
}

impl Default for Tremolo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAIN_FLOOR: f32 = 1.0 - MODULATION_DEPTH;

    fn prepared(sample_rate: f32) -> Tremolo {
        let mut tremolo = Tremolo::new();
        tremolo.prepare(sample_rate, 512);
        tremolo
    }

    fn block(channels: usize, frames: usize) -> Vec<Vec<f32>> {
        // Non-trivial content, to catch any dependence on the input signal
        (0..channels)
            .map(|channel| {
                (0..frames)
                    .map(|frame| ((frame + channel) as f32 * 0.37).sin())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn output_stays_within_the_gain_envelope_bounds() {
        let mut tremolo = prepared(48000.0);
        let mut buffer = block(2, 512);
        tremolo.process(&mut buffer);

        for channel in &buffer {
            for &sample in channel {
                assert!(
                    (GAIN_FLOOR - 1e-6..=1.0 + 1e-6).contains(&sample),
                    "envelope out of bounds: {}",
                    sample
                );
            }
        }
    }

    #[test]
    fn block_shape_is_preserved() {
        let mut tremolo = prepared(44100.0);
        let mut buffer = block(3, 333);
        tremolo.process(&mut buffer);

        assert_eq!(buffer.len(), 3);
        assert!(buffer.iter().all(|channel| channel.len() == 333));
    }

    #[test]
    fn channels_share_the_frame_envelope() {
        let mut tremolo = prepared(44100.0);
        let mut buffer = block(4, 256);
        tremolo.process(&mut buffer);

        for frame in 0..256 {
            for channel in &buffer[1..] {
                assert_eq!(channel[frame], buffer[0][frame]);
            }
        }
    }

    #[test]
    fn envelope_tracks_the_lfo_landmarks() {
        // 5 Hz at 8 kHz: quarter cycle every 400 frames.
        let mut tremolo = prepared(8000.0);
        let mut buffer = vec![vec![0.0f32; 1601]];
        tremolo.process(&mut buffer);

        let samples = &buffer[0];
        assert!((samples[0] - 0.8).abs() < 1e-3, "mid at phase 0: {}", samples[0]);
        assert!((samples[400] - 1.0).abs() < 1e-3, "peak: {}", samples[400]);
        assert!((samples[800] - 0.8).abs() < 1e-3, "mid: {}", samples[800]);
        assert!((samples[1200] - GAIN_FLOOR).abs() < 1e-3, "trough: {}", samples[1200]);
    }

    #[test]
    fn sine_envelope_repeats_every_period() {
        // 5 Hz at 8 kHz: one cycle is exactly 1600 frames.
        let mut tremolo = prepared(8000.0);
        let mut buffer = vec![vec![0.0f32; 3200]];
        tremolo.process(&mut buffer);

        let samples = &buffer[0];
        for i in 0..1600 {
            assert!(
                (samples[i] - samples[i + 1600]).abs() < 5e-3,
                "frame {} drifted across the period",
                i
            );
        }
    }

    #[test]
    fn waveform_switch_waits_for_the_next_block() {
        let mut switched = prepared(44100.0);
        let mut steady = prepared(44100.0);

        let mut first = block(1, 256);
        let mut steady_first = block(1, 256);
        switched.process(&mut first);
        steady.process(&mut steady_first);
        assert_eq!(first, steady_first);

        switched.set_waveform(Waveform::Triangle);
        assert_eq!(switched.waveform(), Waveform::Sine);

        // A kernel that was triangle from the start; its generator is at the
        // same phase as the switched kernel's never-advanced triangle LFO.
        let mut fresh = prepared(44100.0);
        fresh.set_waveform(Waveform::Triangle);
        let mut fresh_block = block(1, 256);
        fresh.process(&mut fresh_block);

        let mut second = block(1, 256);
        switched.process(&mut second);
        assert_eq!(switched.waveform(), Waveform::Triangle);
        assert_eq!(second, fresh_block);
    }

    #[test]
    fn reset_restores_the_opening_envelope() {
        let mut tremolo = prepared(44100.0);
        let mut opening = block(1, 512);
        tremolo.process(&mut opening);

        tremolo.reset();
        let mut after_reset = block(1, 512);
        tremolo.process(&mut after_reset);

        assert_eq!(opening, after_reset);
    }

    #[test]
    fn reset_twice_behaves_like_reset_once() {
        let mut tremolo = prepared(44100.0);
        let mut scratch = block(2, 512);
        tremolo.process(&mut scratch);

        tremolo.reset();
        let mut once = block(2, 512);
        tremolo.process(&mut once);

        tremolo.reset();
        tremolo.reset();
        let mut twice = block(2, 512);
        tremolo.process(&mut twice);

        assert_eq!(once, twice);
    }

    #[test]
    fn an_empty_channel_list_is_a_no_op() {
        let mut tremolo = prepared(44100.0);
        let mut buffer: Vec<Vec<f32>> = Vec::new();
        tremolo.process(&mut buffer);
        assert!(buffer.is_empty());
    }

    #[test]
    fn a_zero_frame_block_does_not_latch_or_advance() {
        let mut tremolo = prepared(44100.0);
        tremolo.set_waveform(Waveform::Triangle);

        let mut empty = vec![Vec::<f32>::new(); 2];
        tremolo.process(&mut empty);
        assert_eq!(tremolo.waveform(), Waveform::Sine);
    }

    #[test]
    #[should_panic(expected = "sample rate must be positive")]
    fn prepare_rejects_a_non_positive_sample_rate() {
        let mut tremolo = Tremolo::new();
        tremolo.prepare(-44100.0, 512);
    }

    #[test]
    #[should_panic(expected = "block size must be positive")]
    fn prepare_rejects_a_zero_block_size() {
        let mut tremolo = Tremolo::new();
        tremolo.prepare(44100.0, 0);
    }
}
