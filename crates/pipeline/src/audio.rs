//! Sample-level helpers: down-mixing, levels, resampling and WAV encoding

use std::io::Cursor;

use rubato::{FftFixedIn, Resampler};

use crate::PipelineError;

/// Rate recognisers receive audio at
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

const RESAMPLE_CHUNK: usize = 1024;

/// Average interleaved frames into a single channel
pub fn downmix(data: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return data.to_vec();
    }
    data.chunks(channels)
        .map(|c| c.iter().sum::<f32>() / c.len() as f32)
        .collect()
}

/// Root-mean-square level
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Split into fixed-size chunks, zero-padding the last one
fn split_for_chunks(samples: &[f32], chunk_size: usize) -> Vec<Vec<f32>> {
    samples
        .chunks(chunk_size)
        .map(|chunk| {
            let mut chunk = chunk.to_vec();
            chunk.resize(chunk_size, 0.0);
            chunk
        })
        .collect()
}

/// Resample a mono clip
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, PipelineError> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let mut resampler =
        FftFixedIn::<f32>::new(from_rate as usize, to_rate as usize, RESAMPLE_CHUNK, 2, 1)
            .map_err(|e| PipelineError::Audio(format!("Failed to create resampler: {}", e)))?;

    let expected = (samples.len() as u64 * to_rate as u64 / from_rate as u64) as usize;
    let delay = resampler.output_delay();

    let mut chunks = split_for_chunks(samples, RESAMPLE_CHUNK);
    // One silent chunk flushes the resampler delay
    chunks.push(vec![0.0; RESAMPLE_CHUNK]);

    let mut output = Vec::with_capacity(expected + delay);
    for chunk in chunks {
        let frames = resampler
            .process(&[chunk], None)
            .map_err(|e| PipelineError::Audio(format!("Resampling failed: {}", e)))?;
        if let Some(channel) = frames.into_iter().next() {
            output.extend(channel);
        }
    }

    Ok(output.into_iter().skip(delay).take(expected).collect())
}

/// Encode mono samples as 16-bit PCM WAV
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, PipelineError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| PipelineError::Audio(format!("Failed to start WAV: {}", e)))?;
        for &sample in samples {
            let pcm = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(pcm)
                .map_err(|e| PipelineError::Audio(format!("Failed to write WAV: {}", e)))?;
        }
        writer
            .finalize()
            .map_err(|e| PipelineError::Audio(format!("Failed to finish WAV: {}", e)))?;
    }
    Ok(cursor.into_inner())
}

/// Sine tone with short linear fades
pub fn sine_tone(frequency: f32, duration_ms: u32, sample_rate: u32) -> Vec<f32> {
    let total = (sample_rate as u64 * duration_ms as u64 / 1000) as usize;
    let fade = (total / 10).max(1);
    (0..total)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let envelope = if i < fade {
                i as f32 / fade as f32
            } else if i + fade > total {
                (total - i) as f32 / fade as f32
            } else {
                1.0
            };
            0.4 * envelope * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}
