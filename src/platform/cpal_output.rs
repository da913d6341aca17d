#[cfg(feature = "native")]
use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Device, FromSample, SizedSample, Stream, StreamConfig,
};

use super::AudioOutput;
use crate::effects::tremolo::Tremolo;
use std::f32::consts::TAU;
use std::sync::{Arc, Mutex};

/// Block length passed to `prepare` and used to size the scratch block.
/// Devices that hand out larger callbacks grow the block once.
const EXPECTED_MAX_FRAMES_PER_BLOCK: usize = 4096;

#[cfg(feature = "native")]
pub struct CpalOutput {
    stream: Option<Stream>,
    device: Option<Device>,
    config: Option<StreamConfig>,
    sample_rate: f32,
    is_active: bool,
}

#[cfg(feature = "native")]
impl CpalOutput {
    pub fn new() -> Self {
        Self {
            stream: None,
            device: None,
            config: None,
            sample_rate: 44100.0,
            is_active: false,
        }
    }

    /// Build the output stream that renders the kernel's envelope.
    ///
    /// Prepares the kernel for the device sample rate, so call this after
    /// `initialize` and before `start`.
    pub fn create_stream(
        &mut self,
        tremolo: Arc<Mutex<Tremolo>>,
        carrier_hz: f32,
    ) -> Result<(), anyhow::Error> {
        let device = self
            .device
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Device not initialized"))?;
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Config not initialized"))?;

        let supported_config = device.default_output_config()?;
        let stream = match supported_config.sample_format() {
            cpal::SampleFormat::I8 => Self::make_stream::<i8>(device, config, tremolo, carrier_hz)?,
            cpal::SampleFormat::I16 => Self::make_stream::<i16>(device, config, tremolo, carrier_hz)?,
            cpal::SampleFormat::I32 => Self::make_stream::<i32>(device, config, tremolo, carrier_hz)?,
            cpal::SampleFormat::I64 => Self::make_stream::<i64>(device, config, tremolo, carrier_hz)?,
            cpal::SampleFormat::U8 => Self::make_stream::<u8>(device, config, tremolo, carrier_hz)?,
            cpal::SampleFormat::U16 => Self::make_stream::<u16>(device, config, tremolo, carrier_hz)?,
            cpal::SampleFormat::U32 => Self::make_stream::<u32>(device, config, tremolo, carrier_hz)?,
            cpal::SampleFormat::U64 => Self::make_stream::<u64>(device, config, tremolo, carrier_hz)?,
            cpal::SampleFormat::F32 => Self::make_stream::<f32>(device, config, tremolo, carrier_hz)?,
            cpal::SampleFormat::F64 => Self::make_stream::<f64>(device, config, tremolo, carrier_hz)?,
            sample_format => {
                return Err(anyhow::anyhow!(
                    "Unsupported sample format '{}'",
                    sample_format
                ))
            }
        };

        self.stream = Some(stream);
        Ok(())
    }

    /// Setup the CPAL host and device
    fn setup_host_device(&mut self) -> Result<(), anyhow::Error> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow::anyhow!("Default output device is not available"))?;

        log::info!("Output device: {}", device.name()?);

        let config = device.default_output_config()?;
        log::info!("Default output config: {:?}", config);

        self.sample_rate = config.sample_rate().0 as f32;
        self.device = Some(device);
        self.config = Some(config.into());

        Ok(())
    }

    /// Create a typed stream for the given sample format
    fn make_stream<T>(
        device: &Device,
        config: &StreamConfig,
        tremolo: Arc<Mutex<Tremolo>>,
        carrier_hz: f32,
    ) -> Result<Stream, anyhow::Error>
    where
        T: SizedSample + FromSample<f32>,
    {
        let num_channels = config.channels as usize;
        let sample_rate = config.sample_rate.0 as f32;

        tremolo
            .lock()
            .unwrap()
            .prepare(sample_rate, EXPECTED_MAX_FRAMES_PER_BLOCK);

        // Channel-major scratch block the callback fills and processes.
        let mut block: Vec<Vec<f32>> =
            vec![vec![0.0; EXPECTED_MAX_FRAMES_PER_BLOCK]; num_channels];
        let mut carrier_phase = 0.0f32;

        let err_fn = |err| log::error!("output stream error: {}", err);

        let stream = device.build_output_stream(
            config,
            move |output: &mut [T], _: &cpal::OutputCallbackInfo| {
                let frames = output.len() / num_channels.max(1);
                for channel in block.iter_mut() {
                    channel.resize(frames, 0.0);
                }

                // Test tone into every channel; the kernel overwrites it
                // with its gain envelope.
                for frame in 0..frames {
                    let sample = (carrier_phase * TAU).sin() * 0.25;
                    carrier_phase += carrier_hz / sample_rate;
                    if carrier_phase >= 1.0 {
                        carrier_phase -= 1.0;
                    }
                    for channel in block.iter_mut() {
                        channel[frame] = sample;
                    }
                }

                tremolo.lock().unwrap().process(&mut block);

                for (frame_index, frame) in output.chunks_mut(num_channels).enumerate() {
                    for (channel_index, sample) in frame.iter_mut().enumerate() {
                        *sample = T::from_sample(block[channel_index][frame_index]);
                    }
                }
            },
            err_fn,
            None,
        )?;

        Ok(stream)
    }
}

#[cfg(feature = "native")]
impl AudioOutput for CpalOutput {
    fn initialize(&mut self, sample_rate: f32) -> Result<(), anyhow::Error> {
        self.sample_rate = sample_rate;
        self.setup_host_device()?;
        Ok(())
    }

    fn start(&mut self) -> Result<(), anyhow::Error> {
        if let Some(stream) = &self.stream {
            stream.play()?;
            self.is_active = true;
            log::info!("Audio stream started at sample rate: {}", self.sample_rate);
        } else {
            return Err(anyhow::anyhow!(
                "Stream not created. Call create_stream first."
            ));
        }

        Ok(())
    }

    fn stop(&mut self) -> Result<(), anyhow::Error> {
        if let Some(stream) = &self.stream {
            stream.pause()?;
            self.is_active = false;
            log::info!("Audio stream stopped");
        }

        Ok(())
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}
