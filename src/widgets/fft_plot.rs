//! FFT plot widget: the normalized spectrum of one dataset

use super::common::{replace, replace_points, WidgetPalette};
use super::{index_in_range, plotting_topics, DashboardWidget, WidgetContext};
use crate::analysis::{SpectralAnalyzer, TransformEngine};
use crate::bus::TopicSet;
use crate::id::RelativeIndex;
use crate::store::DashboardSource;
use crate::theme::{Color, ThemeProvider};
use crate::types::{AxisVisibility, WidgetRole};

/// Lowest level drawn on the y axis, in dB
pub const FLOOR_DB: f64 = -100.0;

pub struct FftPlot {
    index: RelativeIndex,
    valid: bool,
    title: String,
    palette_slot: usize,
    analyzer: SpectralAnalyzer,
    points: Vec<(f64, f64)>,
    axes: AxisVisibility,
    color: Option<Color>,
    palette: WidgetPalette,
}

impl FftPlot {
    pub fn new(index: RelativeIndex, ctx: &WidgetContext<'_>) -> Self {
        Self::with_analyzer(index, ctx, SpectralAnalyzer::new())
    }

    /// Build on a specific transform engine
    pub fn with_engine(
        index: RelativeIndex,
        ctx: &WidgetContext<'_>,
        engine: Box<dyn TransformEngine>,
    ) -> Self {
        Self::with_analyzer(index, ctx, SpectralAnalyzer::with_engine(engine))
    }

    fn with_analyzer(
        index: RelativeIndex,
        ctx: &WidgetContext<'_>,
        analyzer: SpectralAnalyzer,
    ) -> Self {
        let mut plot = Self {
            index,
            valid: false,
            title: String::new(),
            palette_slot: 0,
            analyzer,
            points: Vec::new(),
            axes: ctx.source.axis_visibility(),
            color: None,
            palette: WidgetPalette::default(),
        };

        let dataset = index_in_range(ctx.source, WidgetRole::Fft, index)
            .then(|| ctx.source.dataset(WidgetRole::Fft, index, 0))
            .flatten();
        if let Some(dataset) = dataset {
            plot.valid = true;
            plot.title = dataset.title.clone();
            plot.palette_slot = dataset.index;
            let size = plot
                .analyzer
                .configure(dataset.fft_samples, dataset.fft_sampling_rate);
            tracing::debug!("FFT plot {} uses {} points", index, size);
            plot.on_theme_changed(ctx.theme);
        }
        plot
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// `(frequency Hz, level dB)` of the last computed spectrum
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Negotiated transform size
    pub fn size(&self) -> usize {
        self.analyzer.size()
    }

    /// `(0, Nyquist)` in Hz
    pub fn x_range(&self) -> (f64, f64) {
        (0.0, self.analyzer.sampling_rate() / 2.0)
    }

    /// `(FLOOR_DB, 0)`
    pub fn y_range(&self) -> (f64, f64) {
        (FLOOR_DB, 0.0)
    }

    pub fn axis_visibility(&self) -> AxisVisibility {
        self.axes
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn palette(&self) -> &WidgetPalette {
        &self.palette
    }
}

impl DashboardWidget for FftPlot {
    fn role(&self) -> WidgetRole {
        WidgetRole::Fft
    }

    fn relative_index(&self) -> RelativeIndex {
        self.index
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn topics(&self) -> TopicSet {
        plotting_topics()
    }

    fn update_data(&mut self, source: &dyn DashboardSource) -> bool {
        if !self.valid || !index_in_range(source, WidgetRole::Fft, self.index) {
            return false;
        }
        let Some(samples) = source.samples_for_fft(self.index) else {
            return false;
        };
        let Some(frame) = self.analyzer.refresh(samples) else {
            return false;
        };
        replace_points(&mut self.points, &frame.points)
    }

    fn on_theme_changed(&mut self, theme: &ThemeProvider) -> bool {
        if !self.valid {
            return false;
        }
        let mut changed = replace(&mut self.palette, WidgetPalette::from_theme(theme));
        changed |= replace(&mut self.color, theme.palette_color(self.palette_slot));
        changed
    }

    fn on_axis_options_changed(&mut self, visibility: AxisVisibility) -> bool {
        self.valid && replace(&mut self.axes, visibility)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fft::MockTransformEngine;
    use crate::store::SampleStore;
    use crate::types::{Dataset, Frame, Group, GroupWidget};

    fn frame(value: f64, samples: usize) -> Frame {
        Frame::new("Vibration").with_group(
            Group::new("Sensor", GroupWidget::None)
                .with_dataset(Dataset::new("Accel", value).with_fft(samples, 80.0)),
        )
    }

    #[test]
    fn test_waits_for_full_window() {
        let mut store = SampleStore::default();
        let theme = ThemeProvider::default();
        store.apply_frame(frame(0.0, 8));
        let mut plot = FftPlot::new(RelativeIndex(0), &WidgetContext::new(&store, &theme));

        assert_eq!(plot.size(), 8);
        assert_eq!(plot.x_range(), (0.0, 40.0));
        for _ in 0..6 {
            store.apply_frame(frame(0.0, 8));
        }
        assert!(!plot.update_data(&store));
        assert!(plot.points().is_empty());
    }

    #[test]
    fn test_silent_signal() {
        let mut store = SampleStore::default();
        let theme = ThemeProvider::default();
        store.apply_frame(frame(0.0, 8));
        let mut plot = FftPlot::new(RelativeIndex(0), &WidgetContext::new(&store, &theme));
        for _ in 0..7 {
            store.apply_frame(frame(0.0, 8));
        }

        assert!(plot.update_data(&store));
        assert_eq!(plot.points().len(), 4);
        for (i, (freq, db)) in plot.points().iter().enumerate() {
            assert_eq!(*freq, i as f64 * 10.0);
            assert_eq!(*db, f64::NEG_INFINITY);
        }

        // unchanged spectrum: no repaint
        assert!(!plot.update_data(&store));
    }

    #[test]
    fn test_unsupported_size_falls_back() {
        let mut store = SampleStore::default();
        let theme = ThemeProvider::default();
        store.apply_frame(frame(1.0, 13));

        let mut engine = MockTransformEngine::new();
        engine
            .expect_accepts()
            .returning(|n| n >= 8 && n.is_power_of_two());
        let ctx = WidgetContext::new(&store, &theme);
        let plot = FftPlot::with_engine(RelativeIndex(0), &ctx, Box::new(engine));
        assert_eq!(plot.size(), 8);
    }

    #[test]
    fn test_axis_options_leave_spectrum_alone() {
        let mut store = SampleStore::default();
        let theme = ThemeProvider::default();
        store.apply_frame(frame(1.0, 8));
        let mut plot = FftPlot::new(RelativeIndex(0), &WidgetContext::new(&store, &theme));
        for v in 0..8 {
            store.apply_frame(frame(v as f64, 8));
        }
        plot.update_data(&store);
        let before = plot.points().to_vec();

        assert!(plot.on_axis_options_changed(AxisVisibility::XOnly));
        assert_eq!(plot.points(), before.as_slice());
        assert!(!plot.update_data(&store));
    }

    #[test]
    fn test_non_finite_sample_does_not_repaint_forever() {
        let mut store = SampleStore::default();
        let theme = ThemeProvider::default();
        store.apply_frame(frame(0.0, 8));
        let mut plot = FftPlot::new(RelativeIndex(0), &WidgetContext::new(&store, &theme));
        for v in 0..7 {
            store.apply_frame(frame(v as f64, 8));
        }
        assert!(plot.update_data(&store));
        let before = plot.points().to_vec();

        store.apply_frame(frame(f64::INFINITY, 8));
        for _ in 0..3 {
            assert!(!plot.update_data(&store));
        }
        assert_eq!(plot.points(), before.as_slice());
        assert!(plot.points().iter().all(|(_, db)| !db.is_nan()));
    }
}
