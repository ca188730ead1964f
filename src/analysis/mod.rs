//! Signal analysis used by the dashboard widgets
//!
//! - Windowed FFT with engine-negotiated transform size
//! - Normalized decibel spectrum for the FFT plot

pub mod fft;

pub use fft::{
    RustFftEngine, SpectralAnalyzer, SpectrumFrame, TransformEngine, WindowFunction, MIN_FFT_SIZE,
};
