//! Time plots: a single dataset or every dataset of a group.
//!
//! Points are `(sample number, value)` pairs taken from the store's sample
//! rings, oldest first.

use super::common::{replace, replace_points, WidgetPalette};
use super::{index_in_range, plotting_topics, DashboardWidget, WidgetContext};
use crate::bus::TopicSet;
use crate::id::RelativeIndex;
use crate::store::{DashboardSource, SampleRing};
use crate::theme::{Color, ThemeProvider};
use crate::types::{AxisVisibility, WidgetRole};

fn ring_points(ring: Option<&SampleRing>) -> Vec<(f64, f64)> {
    ring.map(|r| r.iter().enumerate().map(|(i, v)| (i as f64, v)).collect())
        .unwrap_or_default()
}

/// One named series with its palette color
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub title: String,
    pub units: String,
    pub color: Option<Color>,
    pub points: Vec<(f64, f64)>,
    palette_slot: usize,
}

impl Series {
    fn recolor(&mut self, theme: &ThemeProvider) -> bool {
        replace(&mut self.color, theme.palette_color(self.palette_slot))
    }
}

/// Time plot of one dataset
#[derive(Debug, Clone, Default)]
pub struct Plot {
    index: RelativeIndex,
    valid: bool,
    series: Series,
    scale: (f64, f64),
    axes: AxisVisibility,
    palette: WidgetPalette,
}

impl Plot {
    pub fn new(index: RelativeIndex, ctx: &WidgetContext<'_>) -> Self {
        let mut plot = Self {
            index,
            axes: ctx.source.axis_visibility(),
            ..Default::default()
        };

        let dataset = index_in_range(ctx.source, WidgetRole::Plot, index)
            .then(|| ctx.source.dataset(WidgetRole::Plot, index, 0))
            .flatten();
        if let Some(dataset) = dataset {
            plot.valid = true;
            plot.series.title = dataset.title.clone();
            plot.series.units = dataset.units.clone();
            plot.series.palette_slot = dataset.index;
            plot.scale = (dataset.min, dataset.max);
            plot.on_theme_changed(ctx.theme);
        }
        plot
    }

    pub fn title(&self) -> &str {
        &self.series.title
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.series.points
    }

    /// `(min, max)` of the y axis as configured on the dataset
    pub fn scale(&self) -> (f64, f64) {
        self.scale
    }

    pub fn axis_visibility(&self) -> AxisVisibility {
        self.axes
    }

    pub fn palette(&self) -> &WidgetPalette {
        &self.palette
    }
}

impl DashboardWidget for Plot {
    fn role(&self) -> WidgetRole {
        WidgetRole::Plot
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
        if !self.valid || !index_in_range(source, WidgetRole::Plot, self.index) {
            return false;
        }
        let points = ring_points(source.series(WidgetRole::Plot, self.index, 0));
        replace_points(&mut self.series.points, &points)
    }

    fn on_theme_changed(&mut self, theme: &ThemeProvider) -> bool {
        if !self.valid {
            return false;
        }
        let changed = replace(&mut self.palette, WidgetPalette::from_theme(theme));
        self.series.recolor(theme) || changed
    }

    fn on_axis_options_changed(&mut self, visibility: AxisVisibility) -> bool {
        self.valid && replace(&mut self.axes, visibility)
    }
}

/// Time plot of every dataset of a group
#[derive(Debug, Clone, Default)]
pub struct MultiPlot {
    index: RelativeIndex,
    valid: bool,
    title: String,
    series: Vec<Series>,
    axes: AxisVisibility,
    palette: WidgetPalette,
}

impl MultiPlot {
    pub fn new(index: RelativeIndex, ctx: &WidgetContext<'_>) -> Self {
        let mut plot = Self {
            index,
            axes: ctx.source.axis_visibility(),
            ..Default::default()
        };
        if !index_in_range(ctx.source, WidgetRole::MultiPlot, index) {
            return plot;
        }

        plot.title = ctx
            .source
            .group_title(WidgetRole::MultiPlot, index)
            .unwrap_or_default()
            .to_string();
        for i in 0..ctx.source.dataset_count(WidgetRole::MultiPlot, index) {
            if let Some(dataset) = ctx.source.dataset(WidgetRole::MultiPlot, index, i) {
                plot.series.push(Series {
                    title: dataset.title.clone(),
                    units: dataset.units.clone(),
                    palette_slot: dataset.index,
                    ..Default::default()
                });
            }
        }
        plot.valid = true;
        plot.on_theme_changed(ctx.theme);
        plot
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn axis_visibility(&self) -> AxisVisibility {
        self.axes
    }

    pub fn palette(&self) -> &WidgetPalette {
        &self.palette
    }
}

impl DashboardWidget for MultiPlot {
    fn role(&self) -> WidgetRole {
        WidgetRole::MultiPlot
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
        if !self.valid || !index_in_range(source, WidgetRole::MultiPlot, self.index) {
            return false;
        }

        let mut changed = false;
        for (i, series) in self.series.iter_mut().enumerate() {
            let points = ring_points(source.series(WidgetRole::MultiPlot, self.index, i));
            changed |= replace_points(&mut series.points, &points);
        }
        changed
    }

    fn on_theme_changed(&mut self, theme: &ThemeProvider) -> bool {
        if !self.valid {
            return false;
        }
        let mut changed = replace(&mut self.palette, WidgetPalette::from_theme(theme));
        for series in &mut self.series {
            changed |= series.recolor(theme);
        }
        changed
    }

    fn on_axis_options_changed(&mut self, visibility: AxisVisibility) -> bool {
        self.valid && replace(&mut self.axes, visibility)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SampleStore;
    use crate::types::{Dataset, Frame, Group, GroupWidget};

    fn frame(a: f64, b: f64) -> Frame {
        Frame::new("Scope").with_group(
            Group::new("Channels", GroupWidget::MultiPlot)
                .with_dataset(Dataset::new("A", a).with_graph().with_palette_index(2))
                .with_dataset(Dataset::new("B", b).with_palette_index(3)),
        )
    }

    #[test]
    fn test_plot_follows_ring() {
        let mut store = SampleStore::new(2, 3);
        let theme = ThemeProvider::default();
        store.apply_frame(frame(1.0, 10.0));
        let mut plot = Plot::new(RelativeIndex(0), &WidgetContext::new(&store, &theme));

        assert!(plot.update_data(&store));
        assert_eq!(plot.points(), [(0.0, 1.0)]);
        assert_eq!(plot.series().color, theme.palette_color(2));

        for v in [2.0, 3.0, 4.0] {
            store.apply_frame(frame(v, 10.0));
        }
        assert!(plot.update_data(&store));
        assert_eq!(plot.points(), [(0.0, 2.0), (1.0, 3.0), (2.0, 4.0)]);
    }

    #[test]
    fn test_multiplot_series() {
        let mut store = SampleStore::default();
        let theme = ThemeProvider::default();
        store.apply_frame(frame(1.0, -1.0));
        let mut plot = MultiPlot::new(RelativeIndex(0), &WidgetContext::new(&store, &theme));

        assert_eq!(plot.title(), "Channels");
        assert_eq!(plot.series().len(), 2);
        assert!(plot.update_data(&store));
        assert_eq!(plot.series()[1].points, vec![(0.0, -1.0)]);
        assert_eq!(plot.series()[1].color, theme.palette_color(3));
        assert!(!plot.update_data(&store));
    }

    #[test]
    fn test_axis_options() {
        let mut store = SampleStore::default();
        let theme = ThemeProvider::default();
        store.set_axis_visibility(AxisVisibility::YOnly);
        store.apply_frame(frame(1.0, 2.0));

        let mut plot = MultiPlot::new(RelativeIndex(0), &WidgetContext::new(&store, &theme));
        assert_eq!(plot.axis_visibility(), AxisVisibility::YOnly);
        assert!(plot.on_axis_options_changed(AxisVisibility::NeitherAxis));
        assert!(!plot.on_axis_options_changed(AxisVisibility::NeitherAxis));
        assert!(!plot.axis_visibility().x_visible());
    }
}
