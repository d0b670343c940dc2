use std::f64::consts::PI;

use statcord_config::LATENCY_WINDOW;

use crate::{ChartError, Result};

/// Samples averaged together in the long horizon trend line.
pub const CHUNK_SIZE: usize = 4;

/// Points each chunk mean is spread over in the doubled series.
pub const CHUNK_SPREAD: usize = 8;

/// Band half-width around the mean, as a fraction of the mean.
pub const BAND_RATIO: f64 = 0.5;

/// Everything the latency chart plots, derived from one window of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyStats {
    pub samples: Vec<f64>,
    /// Every sample repeated twice, for the long horizon panel
    pub doubled: Vec<f64>,
    pub chunk_means: Vec<f64>,
    /// Every chunk mean repeated [`CHUNK_SPREAD`] times, aligned with `doubled`
    pub chunk_trace: Vec<f64>,
    pub mean: f64,
    pub log_series: Vec<f64>,
    pub upper_band: f64,
    pub lower_band: f64,
    pub above_band: Vec<usize>,
    pub below_band: Vec<usize>,
    pub min: f64,
    pub max: f64,
    pub min_positions: Vec<usize>,
    pub max_positions: Vec<usize>,
    /// `sin(sample * 2π / 180)` per sample
    pub stability: Vec<f64>,
}

impl LatencyStats {
    /// Derive the chart series from the most recent [`LATENCY_WINDOW`] samples.
    pub fn compute(samples: &[f64]) -> Result<Self> {
        if samples.len() < LATENCY_WINDOW {
            return Err(ChartError::InsufficientSamples {
                required: LATENCY_WINDOW,
                available: samples.len(),
            });
        }

        let samples = samples[samples.len() - LATENCY_WINDOW..].to_vec();

        let doubled = samples.iter().flat_map(|&s| [s, s]).collect();

        let chunk_means: Vec<f64> = samples.chunks(CHUNK_SIZE).map(mean_of).collect();
        let chunk_trace = chunk_means
            .iter()
            .flat_map(|&m| std::iter::repeat(m).take(CHUNK_SPREAD))
            .collect();

        let mean = mean_of(&samples);
        let upper_band = mean * (1.0 + BAND_RATIO);
        let lower_band = mean * (1.0 - BAND_RATIO);

        let mut above_band = Vec::new();
        let mut below_band = Vec::new();
        for (i, &sample) in samples.iter().enumerate() {
            if sample > upper_band {
                above_band.push(i);
            } else if sample < lower_band {
                below_band.push(i);
            }
        }

        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            doubled,
            chunk_trace,
            chunk_means,
            mean,
            log_series: samples.iter().map(|s| s.ln()).collect(),
            upper_band,
            lower_band,
            above_band,
            below_band,
            min,
            max,
            min_positions: positions_of(&samples, min),
            max_positions: positions_of(&samples, max),
            stability: samples.iter().map(|s| (s * 2.0 * PI / 180.0).sin()).collect(),
            samples,
        })
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

fn mean_of(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn positions_of(values: &[f64], target: f64) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == target)
        .map(|(i, _)| i)
        .collect()
}
