//! Spectral analysis for the FFT plot widget
//!
//! The analyzer turns the newest `size` samples of a series into a
//! normalized decibel spectrum:
//! - window the samples (Hann by default)
//! - forward transform into a half-complex buffer
//! - magnitude of the first `size / 2` bins
//! - normalize by the peak magnitude and convert to dB
//!
//! The transform itself sits behind [`TransformEngine`] so the size
//! negotiation in [`SpectralAnalyzer::configure`] does not depend on one
//! particular FFT library.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use crate::store::SampleRing;

/// Smallest transform size ever requested from an engine
pub const MIN_FFT_SIZE: usize = 8;

/// Window function type for FFT preprocessing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowFunction {
    /// Rectangular window (no windowing)
    Rectangular,
    /// Hann window (good general purpose)
    #[default]
    Hann,
    /// Hamming window (reduced side lobes)
    Hamming,
    /// Blackman window (very low side lobes)
    Blackman,
}

impl WindowFunction {
    /// Compute window coefficient at position i out of n samples
    pub fn coefficient(&self, i: usize, n: usize) -> f64 {
        let n_f = n as f64;
        let i_f = i as f64;

        match self {
            WindowFunction::Rectangular => 1.0,
            WindowFunction::Hann => 0.5 * (1.0 - (2.0 * PI * i_f / n_f).cos()),
            WindowFunction::Hamming => 0.54 - 0.46 * (2.0 * PI * i_f / n_f).cos(),
            WindowFunction::Blackman => {
                // 0.42 and 0.08 are not exact in binary; clamp the -ε at the edges
                (0.42 - 0.5 * (2.0 * PI * i_f / n_f).cos() + 0.08 * (4.0 * PI * i_f / n_f).cos())
                    .max(0.0)
            }
        }
    }

    /// Generate window coefficients for n samples
    pub fn generate(&self, n: usize) -> Vec<f64> {
        (0..n).map(|i| self.coefficient(i, n)).collect()
    }
}

/// Forward real-to-complex transform with a restricted set of sizes.
///
/// `forward` writes a half-complex buffer of `input.len()` values: the real
/// parts of bins `0..n/2` followed by the imaginary parts of the same bins.
#[cfg_attr(test, mockall::automock)]
pub trait TransformEngine {
    /// Whether the engine can plan a transform of `size` points
    fn accepts(&self, size: usize) -> bool;

    /// Run a transform of `input.len()` points into `output`
    fn forward(&mut self, input: &[f64], output: &mut [f64]);
}

/// [`TransformEngine`] backed by `rustfft`, limited to powers of two.
pub struct RustFftEngine {
    planner: FftPlanner<f64>,
    plan: Option<(usize, Arc<dyn Fft<f64>>)>,
    buffer: Vec<Complex<f64>>,
}

impl RustFftEngine {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
            plan: None,
            buffer: Vec::new(),
        }
    }
}

impl Default for RustFftEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RustFftEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RustFftEngine")
            .field("size", &self.plan.as_ref().map(|(n, _)| *n))
            .finish()
    }
}

impl TransformEngine for RustFftEngine {
    fn accepts(&self, size: usize) -> bool {
        size >= 2 && size.is_power_of_two()
    }

    fn forward(&mut self, input: &[f64], output: &mut [f64]) {
        let n = input.len();
        let half = n / 2;

        let plan = match &self.plan {
            Some((size, plan)) if *size == n => Arc::clone(plan),
            _ => {
                let plan = self.planner.plan_fft_forward(n);
                self.plan = Some((n, Arc::clone(&plan)));
                plan
            }
        };

        self.buffer.clear();
        self.buffer.extend(input.iter().map(|&x| Complex::new(x, 0.0)));
        plan.process(&mut self.buffer);

        for (i, bin) in self.buffer.iter().take(half).enumerate() {
            output[i] = bin.re;
            output[half + i] = bin.im;
        }
    }
}

/// One computed spectrum: `(frequency Hz, level dB)` per bin
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectrumFrame {
    pub points: Vec<(f64, f64)>,
}

impl SpectrumFrame {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bin with the highest level, if any bin is finite
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .copied()
            .filter(|(_, db)| db.is_finite())
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }
}

/// Fixed buffers for one negotiated transform size
struct Plan {
    size: usize,
    sampling_rate: f64,
    window: Vec<f64>,
    input: Vec<f64>,
    output: Vec<f64>,
    frame: SpectrumFrame,
}

/// Windowed FFT with a size negotiated once at configuration time.
pub struct SpectralAnalyzer {
    engine: Box<dyn TransformEngine>,
    window: WindowFunction,
    plan: Option<Plan>,
}

impl SpectralAnalyzer {
    /// Analyzer on the default rustfft engine
    pub fn new() -> Self {
        Self::with_engine(Box::new(RustFftEngine::new()))
    }

    pub fn with_engine(engine: Box<dyn TransformEngine>) -> Self {
        Self {
            engine,
            window: WindowFunction::default(),
            plan: None,
        }
    }

    pub fn with_window(mut self, window: WindowFunction) -> Self {
        self.window = window;
        if let Some(plan) = &mut self.plan {
            plan.window = window.generate(plan.size);
        }
        self
    }

    /// Negotiate the transform size and allocate the buffers.
    ///
    /// Starts at `max(MIN_FFT_SIZE, requested)` and walks down until the
    /// engine accepts. Returns the chosen size.
    pub fn configure(&mut self, requested: usize, sampling_rate: f64) -> usize {
        let mut size = requested.max(MIN_FFT_SIZE);
        while size > 1 && !self.engine.accepts(size) {
            size -= 1;
        }

        if size != requested {
            tracing::debug!("FFT size {} not supported, using {}", requested, size);
        }

        self.plan = Some(Plan {
            size,
            sampling_rate,
            window: self.window.generate(size),
            input: vec![0.0; size],
            output: vec![0.0; size],
            frame: SpectrumFrame::default(),
        });
        size
    }

    pub fn is_ready(&self) -> bool {
        self.plan.is_some()
    }

    /// Negotiated size, 0 before [`configure`](Self::configure)
    pub fn size(&self) -> usize {
        self.plan.as_ref().map_or(0, |p| p.size)
    }

    pub fn sampling_rate(&self) -> f64 {
        self.plan.as_ref().map_or(0.0, |p| p.sampling_rate)
    }

    /// Last computed spectrum
    pub fn frame(&self) -> Option<&SpectrumFrame> {
        self.plan.as_ref().map(|p| &p.frame)
    }

    /// Recompute the spectrum from the newest `size` samples.
    ///
    /// Returns `None` when unconfigured, when the ring does not hold enough
    /// samples yet, or when a non-finite sample poisons the transform. The
    /// previous spectrum is kept in those cases.
    pub fn refresh(&mut self, samples: &SampleRing) -> Option<&SpectrumFrame> {
        let plan = self.plan.as_mut()?;
        if !samples.copy_latest(&mut plan.input) {
            return None;
        }

        for (x, w) in plan.input.iter_mut().zip(&plan.window) {
            *x *= w;
        }
        self.engine.forward(&plan.input, &mut plan.output);

        let half = plan.size / 2;
        let magnitudes: Vec<f64> = (0..half)
            .map(|i| {
                let re = plan.output[i];
                let im = plan.output[half + i];
                (re * re + im * im).sqrt()
            })
            .collect();
        if magnitudes.iter().any(|m| !m.is_finite()) {
            tracing::trace!("Skipping spectrum with non-finite magnitudes");
            return None;
        }
        let max = magnitudes.iter().copied().fold(0.0_f64, f64::max);

        let size = plan.size as f64;
        plan.frame.points.clear();
        plan.frame.points.extend(magnitudes.iter().enumerate().map(|(i, &m)| {
            let freq = i as f64 * plan.sampling_rate / size;
            let db = if max > 0.0 && m > 0.0 {
                20.0 * (m / max).log10()
            } else {
                f64::NEG_INFINITY
            };
            (freq, db)
        }));

        Some(&plan.frame)
    }
}

impl Default for SpectralAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
