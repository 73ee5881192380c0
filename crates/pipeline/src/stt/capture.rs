//! Microphone capture
//!
//! One call records one phrase: the ambient level is sampled first, then
//! audio is collected from the first chunk louder than the calibrated
//! threshold until a pause or the phrase time limit.

use std::sync::mpsc;
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};

use crate::audio::{downmix, rms};
use crate::PipelineError;

/// Lowest threshold used regardless of how quiet the room is
const ENERGY_FLOOR: f32 = 0.01;
/// Threshold = ambient level times this factor
const AMBIENT_FACTOR: f32 = 1.5;
/// Trailing silence that ends a phrase
const PAUSE: Duration = Duration::from_millis(800);
/// Give up when nobody speaks for this long
const MAX_WAIT_FOR_SPEECH: Duration = Duration::from_secs(20);
/// A device that delivers nothing for this long is considered stalled
const CHUNK_TIMEOUT: Duration = Duration::from_secs(2);

/// Mono audio as captured
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Utterance {
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate.max(1) as f64)
    }
}

/// Source of recorded phrases
#[async_trait]
pub trait AudioCapture: Send + Sync + 'static {
    async fn record_phrase(&self) -> Result<Utterance, PipelineError>;
}

/// Timing parameters of phrase detection
#[derive(Debug, Clone, Copy)]
pub struct PhraseLimits {
    pub calibration: Duration,
    pub phrase_limit: Duration,
    pub pause: Duration,
    pub max_wait: Duration,
}

impl PhraseLimits {
    pub fn new(calibration: Duration, phrase_limit: Duration) -> Self {
        Self {
            calibration,
            phrase_limit,
            pause: PAUSE,
            max_wait: MAX_WAIT_FOR_SPEECH,
        }
    }
}

enum Phase {
    Calibrating { sum_sq: f64, seen: usize },
    Waiting { threshold: f32, waited: usize },
    Recording { threshold: f32, silent_run: usize },
}

pub(crate) enum Progress {
    Pending,
    Complete(Vec<f32>),
}

/// Incremental calibrate / wait / record state machine over mono chunks
pub(crate) struct PhraseDetector {
    phase: Phase,
    recorded: Vec<f32>,
    calibration_samples: usize,
    phrase_samples: usize,
    pause_samples: usize,
    wait_samples: usize,
}

fn samples_for(duration: Duration, sample_rate: u32) -> usize {
    (duration.as_secs_f64() * sample_rate as f64) as usize
}

impl PhraseDetector {
    pub(crate) fn new(limits: PhraseLimits, sample_rate: u32) -> Self {
        Self {
            phase: Phase::Calibrating {
                sum_sq: 0.0,
                seen: 0,
            },
            recorded: Vec::new(),
            calibration_samples: samples_for(limits.calibration, sample_rate),
            phrase_samples: samples_for(limits.phrase_limit, sample_rate).max(1),
            pause_samples: samples_for(limits.pause, sample_rate).max(1),
            wait_samples: samples_for(limits.max_wait, sample_rate),
        }
    }

    pub(crate) fn feed(&mut self, chunk: &[f32]) -> Result<Progress, PipelineError> {
        match &mut self.phase {
            Phase::Calibrating { sum_sq, seen } => {
                *sum_sq += chunk.iter().map(|s| (*s as f64) * (*s as f64)).sum::<f64>();
                *seen += chunk.len();
                if *seen >= self.calibration_samples {
                    let ambient = if *seen == 0 {
                        0.0
                    } else {
                        (*sum_sq / *seen as f64).sqrt() as f32
                    };
                    let threshold = (ambient * AMBIENT_FACTOR).max(ENERGY_FLOOR);
                    tracing::debug!(ambient, threshold, "Microphone calibrated");
                    self.phase = Phase::Waiting {
                        threshold,
                        waited: 0,
                    };
                }
                Ok(Progress::Pending)
            }
            Phase::Waiting { threshold, waited } => {
                if rms(chunk) > *threshold {
                    let threshold = *threshold;
                    self.phase = Phase::Recording {
                        threshold,
                        silent_run: 0,
                    };
                    return self.record(chunk);
                }
                *waited += chunk.len();
                if *waited >= self.wait_samples {
                    return Err(PipelineError::Audio("No speech detected".to_string()));
                }
                Ok(Progress::Pending)
            }
            Phase::Recording { .. } => self.record(chunk),
        }
    }

    fn record(&mut self, chunk: &[f32]) -> Result<Progress, PipelineError> {
        let Phase::Recording {
            threshold,
            silent_run,
        } = &mut self.phase
        else {
            return Ok(Progress::Pending);
        };

        let room = self.phrase_samples.saturating_sub(self.recorded.len());
        let take = chunk.len().min(room);
        self.recorded.extend_from_slice(&chunk[..take]);

        if rms(chunk) > *threshold {
            *silent_run = 0;
        } else {
            *silent_run += chunk.len();
        }

        if self.recorded.len() >= self.phrase_samples || *silent_run >= self.pause_samples {
            return Ok(Progress::Complete(std::mem::take(&mut self.recorded)));
        }
        Ok(Progress::Pending)
    }
}

/// Captures from a cpal input device on a blocking thread
pub struct CpalCapture {
    device_name: Option<String>,
    limits: PhraseLimits,
}

impl CpalCapture {
    pub fn new(device_name: Option<String>, limits: PhraseLimits) -> Self {
        Self {
            device_name,
            limits,
        }
    }
}

#[async_trait]
impl AudioCapture for CpalCapture {
    async fn record_phrase(&self) -> Result<Utterance, PipelineError> {
        let device_name = self.device_name.clone();
        let limits = self.limits;
        tokio::task::spawn_blocking(move || record_blocking(device_name.as_deref(), limits))
            .await
            .map_err(|e| PipelineError::Audio(format!("Capture task failed: {}", e)))?
    }
}

fn select_input(name: Option<&str>) -> Result<Device, PipelineError> {
    let host = cpal::default_host();
    tracing::debug!(host = ?host.id(), "Audio host");

    match name {
        None => host
            .default_input_device()
            .ok_or_else(|| PipelineError::Device("No default input device".to_string())),
        Some(target) => host
            .input_devices()
            .map_err(|e| PipelineError::Device(e.to_string()))?
            .find(|d| d.name().is_ok_and(|n| n == target))
            .ok_or_else(|| PipelineError::Device(format!("Input device not found: {}", target))),
    }
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    tx: mpsc::Sender<Vec<f32>>,
) -> Result<Stream, PipelineError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = config.channels as usize;
    let data_fn = move |data: &[T], _: &cpal::InputCallbackInfo| {
        let samples: Vec<f32> = data.iter().map(|s| f32::from_sample(*s)).collect();
        // Receiver gone means capture is over
        let _ = tx.send(downmix(&samples, channels));
    };

    device
        .build_input_stream(
            config,
            data_fn,
            move |err| tracing::error!("An error occurred on input stream: {}", err),
            None,
        )
        .map_err(|e| PipelineError::Device(format!("Failed to open input stream: {}", e)))
}

fn record_blocking(device_name: Option<&str>, limits: PhraseLimits) -> Result<Utterance, PipelineError> {
    let device = select_input(device_name)?;
    let supported = device
        .default_input_config()
        .map_err(|e| PipelineError::Device(e.to_string()))?;
    let sample_format = supported.sample_format();
    let config: StreamConfig = supported.config();
    let sample_rate = config.sample_rate.0;
    tracing::debug!(?config, ?sample_format, "Input stream config");

    let (tx, rx) = mpsc::channel();
    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, tx)?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config, tx)?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config, tx)?,
        other => {
            return Err(PipelineError::Device(format!(
                "Unsupported sample format: {:?}",
                other
            )))
        }
    };
    stream
        .play()
        .map_err(|e| PipelineError::Device(format!("Failed to start input stream: {}", e)))?;

    let mut detector = PhraseDetector::new(limits, sample_rate);
    let samples = loop {
        let chunk = rx
            .recv_timeout(CHUNK_TIMEOUT)
            .map_err(|_| PipelineError::Device("Input device stopped delivering audio".to_string()))?;
        if let Progress::Complete(samples) = detector.feed(&chunk)? {
            break samples;
        }
    };
    drop(stream);

    let utterance = Utterance {
        samples,
        sample_rate,
    };
    tracing::info!(secs = utterance.duration().as_secs_f32(), "Captured phrase");
    Ok(utterance)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 1_000;

    fn limits() -> PhraseLimits {
        PhraseLimits {
            calibration: Duration::from_millis(100),
            phrase_limit: Duration::from_secs(1),
            pause: Duration::from_millis(200),
            max_wait: Duration::from_millis(500),
        }
    }

    fn chunk(level: f32) -> Vec<f32> {
        // 50 ms of a square wave at the given level
        (0..50).map(|i| if i % 2 == 0 { level } else { -level }).collect()
    }

    fn run(detector: &mut PhraseDetector, chunks: &[Vec<f32>]) -> Option<Vec<f32>> {
        for c in chunks {
            if let Progress::Complete(samples) = detector.feed(c).unwrap() {
                return Some(samples);
            }
        }
        None
    }

    #[test]
    fn test_phrase_ends_on_pause() {
        let mut detector = PhraseDetector::new(limits(), RATE);
        let mut chunks = vec![chunk(0.02), chunk(0.02)]; // calibration, ambient 0.02
        chunks.extend(std::iter::repeat(chunk(0.2)).take(6)); // 300 ms speech
        chunks.extend(std::iter::repeat(chunk(0.0)).take(10)); // silence

        let samples = run(&mut detector, &chunks).unwrap();
        // speech plus 200 ms of trailing pause
        assert_eq!(samples.len(), 300 + 200);
    }

    #[test]
    fn test_phrase_time_limit() {
        let mut detector = PhraseDetector::new(limits(), RATE);
        let mut chunks = vec![chunk(0.0), chunk(0.0)];
        chunks.extend(std::iter::repeat(chunk(0.5)).take(40));

        let samples = run(&mut detector, &chunks).unwrap();
        assert_eq!(samples.len(), 1_000);
    }

    #[test]
    fn test_ambient_noise_raises_threshold() {
        let mut detector = PhraseDetector::new(limits(), RATE);
        // Loud room: 0.1 ambient gives a 0.15 threshold, so 0.12 is not speech
        let mut chunks = vec![chunk(0.1), chunk(0.1)];
        chunks.extend(std::iter::repeat(chunk(0.12)).take(5));
        assert!(run(&mut detector, &chunks).is_none());
    }

    #[test]
    fn test_gives_up_without_speech() {
        let mut detector = PhraseDetector::new(limits(), RATE);
        let quiet = chunk(0.0);
        let mut result = Ok(Progress::Pending);
        for _ in 0..20 {
            result = detector.feed(&quiet);
            if result.is_err() {
                break;
            }
        }
        assert!(matches!(result, Err(PipelineError::Audio(_))));
    }
}
