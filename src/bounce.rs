//! Offline bounce of the tremolo output to a WAV file
//!
//! Renders the kernel block by block, the way a host callback would, and
//! writes the result as 32-bit float stereo WAV. Useful for inspecting the
//! gain envelope in an editor without a live audio device.

use std::f32::consts::TAU;
use std::path::Path;

use anyhow::{Context, Result};

use crate::effects::tremolo::Tremolo;
use crate::gen::waveform::Waveform;

/// Frames rendered per processing call.
const BLOCK_FRAMES: usize = 512;
/// Channels in the rendered file.
const CHANNELS: usize = 2;

/// Render `seconds` of tremolo output at `sample_rate` into a stereo WAV.
///
/// A `carrier_hz` test tone is fed through the kernel exactly as a live
/// host would; what lands in the file is the kernel's gain envelope.
pub fn bounce_to_wav(
    path: &Path,
    seconds: f32,
    sample_rate: u32,
    waveform: Waveform,
    carrier_hz: f32,
) -> Result<()> {
    let spec = hound::WavSpec {
        channels: CHANNELS as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut tremolo = Tremolo::new();
    tremolo.prepare(sample_rate as f32, BLOCK_FRAMES);
    tremolo.set_waveform(waveform);

    let mut block = vec![vec![0.0f32; BLOCK_FRAMES]; CHANNELS];
    let mut carrier_phase = 0.0f32;
    let mut remaining = (seconds * sample_rate as f32) as usize;

    while remaining > 0 {
        let frames = remaining.min(BLOCK_FRAMES);
        for channel in block.iter_mut() {
            channel.resize(frames, 0.0);
        }

        for frame in 0..frames {
            let sample = (carrier_phase * TAU).sin() * 0.25;
            carrier_phase += carrier_hz / sample_rate as f32;
            if carrier_phase >= 1.0 {
                carrier_phase -= 1.0;
            }
            for channel in block.iter_mut() {
                channel[frame] = sample;
            }
        }

        tremolo.process(&mut block);

        for frame in 0..frames {
            for channel in &block {
                writer.write_sample(channel[frame])?;
            }
        }

        remaining -= frames;
    }

    writer.finalize().context("finalizing the WAV file")?;
    log::info!(
        "Bounced {:.1}s of {:?} tremolo to {}",
        seconds,
        waveform,
        path.display()
    );

    Ok(())
}
