use crate::gen::waveform::Waveform;

/// Low frequency oscillator driving the amplitude modulation.
///
/// Constructed with a shape and frequency but no sample rate; the owner must
/// call [`prepare`](Self::prepare) before the first [`tick`](Self::tick).
pub struct Lfo {
    waveform: Waveform,
    frequency: f32,
    // Normalized phase, wraps in 0.0..1.0
    phase: f32,
    // 0.0 until prepare() assigns the host rate
    sample_rate: f32,
}

impl Lfo {
    pub fn new(waveform: Waveform, frequency: f32) -> Self {
        assert!(frequency > 0.0, "LFO frequency must be positive");
        Self {
            waveform,
            frequency,
            phase: 0.0,
            sample_rate: 0.0,
        }
    }

    /// Assign the sample rate. Call before the first tick and again whenever
    /// the host rate changes; the phase is left where it is.
    pub fn prepare(&mut self, sample_rate: f32) {
        assert!(sample_rate > 0.0, "sample rate must be positive");
        self.sample_rate = sample_rate;
    }

    /// Set the frequency in Hz
    pub fn set_frequency(&mut self, frequency: f32) {
        assert!(frequency > 0.0, "LFO frequency must be positive");
        self.frequency = frequency;
    }

    /// Get the current frequency
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Get the shape this generator produces
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Get the current phase (0.0 to 1.0)
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Generate one sample and advance the phase.
    /// Returns a value from -1.0 to 1.0.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        debug_assert!(self.sample_rate > 0.0, "tick before prepare");

        let value = self.waveform.value(self.phase);

        self.phase += self.frequency / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        value
    }

    /// Reset the phase to 0, keeping frequency and sample rate.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_repeats_after_one_period() {
        // 5 Hz at 8 kHz: one cycle is exactly 1600 samples.
        let mut lfo = Lfo::new(Waveform::Sine, 5.0);
        lfo.prepare(8000.0);

        let samples: Vec<f32> = (0..3200).map(|_| lfo.tick()).collect();
        for i in 0..1600 {
            assert!(
                (samples[i] - samples[i + 1600]).abs() < 5e-3,
                "sample {} drifted across the period: {} vs {}",
                i,
                samples[i],
                samples[i + 1600]
            );
        }
    }

    #[test]
    fn reset_restores_the_opening_samples() {
        let mut lfo = Lfo::new(Waveform::Triangle, 5.0);
        lfo.prepare(44100.0);

        let first: Vec<f32> = (0..64).map(|_| lfo.tick()).collect();
        lfo.reset();
        let again: Vec<f32> = (0..64).map(|_| lfo.tick()).collect();

        assert_eq!(first, again);
    }

    #[test]
    fn output_stays_in_range() {
        let mut lfo = Lfo::new(Waveform::Sine, 5.0);
        lfo.prepare(44100.0);
        for _ in 0..44100 {
            let value = lfo.tick();
            assert!((-1.0..=1.0).contains(&value), "out of range: {}", value);
        }
    }

    #[test]
    fn prepare_keeps_the_phase() {
        let mut lfo = Lfo::new(Waveform::Sine, 5.0);
        lfo.prepare(44100.0);
        for _ in 0..100 {
            lfo.tick();
        }
        let phase = lfo.phase();
        lfo.prepare(48000.0);
        assert_eq!(lfo.phase(), phase);
    }

    #[test]
    #[should_panic(expected = "sample rate must be positive")]
    fn prepare_rejects_a_zero_sample_rate() {
        let mut lfo = Lfo::new(Waveform::Sine, 5.0);
        lfo.prepare(0.0);
    }
}
