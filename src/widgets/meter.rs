//! Bar and gauge widgets: one dataset drawn as a level between min and max

use super::common::{alarm_triggered, replace, replace_f64, value_with_units, WidgetPalette};
use super::{index_in_range, DashboardWidget, WidgetContext};
use crate::id::RelativeIndex;
use crate::store::DashboardSource;
use crate::theme::{Color, ThemeProvider};
use crate::types::WidgetRole;

/// Level meter shared by the `Bar` and `Gauge` roles
#[derive(Debug, Clone)]
pub struct Meter {
    role: WidgetRole,
    index: RelativeIndex,
    valid: bool,
    title: String,
    palette_slot: usize,
    value_text: String,
    level: f64,
    alarm_level: f64,
    alarm: bool,
    min: f64,
    max: f64,
    fill: Option<Color>,
    palette: WidgetPalette,
}

impl Meter {
    pub fn new(role: WidgetRole, index: RelativeIndex, ctx: &WidgetContext<'_>) -> Self {
        let mut meter = Self {
            role,
            index,
            valid: false,
            title: String::new(),
            palette_slot: 0,
            value_text: String::new(),
            level: 0.0,
            alarm_level: 0.0,
            alarm: false,
            min: 0.0,
            max: 0.0,
            fill: None,
            palette: WidgetPalette::default(),
        };

        if !index_in_range(ctx.source, role, index) {
            return meter;
        }
        let Some(dataset) = ctx.source.dataset(role, index, 0) else {
            return meter;
        };

        meter.valid = true;
        meter.title = dataset.title.clone();
        meter.palette_slot = dataset.index;
        meter.alarm_level = dataset.alarm;
        meter.min = dataset.min;
        meter.max = dataset.max;
        meter.on_theme_changed(ctx.theme);
        meter
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// `"<value> <units>"`
    pub fn value_text(&self) -> &str {
        &self.value_text
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn alarm(&self) -> bool {
        self.alarm
    }

    pub fn alarm_enabled(&self) -> bool {
        self.alarm_level != 0.0
    }

    pub fn alarm_level(&self) -> f64 {
        self.alarm_level
    }

    /// `(min, max)` of the scale
    pub fn scale(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Fraction of the scale covered by the level, clamped to `[0, 1]`
    pub fn fill_ratio(&self) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.level - self.min) / span).clamp(0.0, 1.0)
    }

    pub fn fill_color(&self) -> Option<Color> {
        self.fill
    }

    pub fn palette(&self) -> &WidgetPalette {
        &self.palette
    }
}

impl DashboardWidget for Meter {
    fn role(&self) -> WidgetRole {
        self.role
    }

    fn relative_index(&self) -> RelativeIndex {
        self.index
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn update_data(&mut self, source: &dyn DashboardSource) -> bool {
        if !self.valid || !index_in_range(source, self.role, self.index) {
            return false;
        }
        let Some(dataset) = source.dataset(self.role, self.index, 0) else {
            return false;
        };

        let level = dataset.value.as_number().unwrap_or(0.0);
        let alarm = alarm_triggered(level, dataset.alarm);

        let mut changed = replace_f64(&mut self.level, level);
        changed |= replace(&mut self.value_text, value_with_units(dataset, source.precision()));
        changed |= replace(&mut self.alarm, alarm);
        changed |= replace_f64(&mut self.alarm_level, dataset.alarm);
        changed |= replace_f64(&mut self.min, dataset.min);
        changed |= replace_f64(&mut self.max, dataset.max);
        changed
    }

    fn on_theme_changed(&mut self, theme: &ThemeProvider) -> bool {
        if !self.valid {
            return false;
        }
        let mut changed = replace(&mut self.palette, WidgetPalette::from_theme(theme));
        changed |= replace(&mut self.fill, theme.palette_color(self.palette_slot));
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SampleStore;
    use crate::theme::Theme;
    use crate::types::{Dataset, DatasetWidget, Frame, Group, GroupWidget};

    fn frame(value: f64) -> Frame {
        Frame::new("Tank").with_group(
            Group::new("Levels", GroupWidget::None)
                .with_dataset(
                    Dataset::new("Fill", value)
                        .with_units("%")
                        .with_alarm(80.0)
                        .with_scale(0.0, 100.0)
                        .with_palette_index(1)
                        .with_widget(DatasetWidget::Bar),
                )
                .with_dataset(Dataset::new("Pressure", value).with_widget(DatasetWidget::Gauge)),
        )
    }

    #[test]
    fn test_bar_refresh() {
        let mut store = SampleStore::default();
        store.apply_frame(frame(42.0));
        let theme = ThemeProvider::default();
        let ctx = WidgetContext::new(&store, &theme);
        let mut bar = Meter::new(WidgetRole::Bar, RelativeIndex(0), &ctx);

        assert!(bar.is_valid());
        assert_eq!(bar.title(), "Fill");
        assert_eq!(bar.fill_color(), theme.palette_color(1));

        assert!(bar.update_data(&store));
        assert_eq!(bar.value_text(), "42.00 %");
        assert_eq!(bar.level(), 42.0);
        assert!(!bar.alarm());
        assert!((bar.fill_ratio() - 0.42).abs() < 1e-12);

        // unchanged snapshot: nothing to repaint
        assert!(!bar.update_data(&store));

        store.apply_frame(frame(80.0));
        assert!(bar.update_data(&store));
        assert!(bar.alarm());
    }

    #[test]
    fn test_gauge_without_alarm() {
        let mut store = SampleStore::default();
        store.apply_frame(frame(1000.0));
        let theme = ThemeProvider::default();
        let ctx = WidgetContext::new(&store, &theme);
        let mut gauge = Meter::new(WidgetRole::Gauge, RelativeIndex(0), &ctx);

        gauge.update_data(&store);
        assert!(!gauge.alarm_enabled());
        assert!(!gauge.alarm());
        assert_eq!(gauge.value_text(), "1000.00");
        assert_eq!(gauge.fill_ratio(), 1.0);
    }

    #[test]
    fn test_theme_without_palette_gives_no_fill() {
        let mut store = SampleStore::default();
        store.apply_frame(frame(1.0));
        let mut theme = ThemeProvider::default();
        let ctx = WidgetContext::new(&store, &theme);
        let mut bar = Meter::new(WidgetRole::Bar, RelativeIndex(0), &ctx);

        let mut bare = Theme::default();
        bare.widget_colors.clear();
        theme.set_theme(bare);

        assert!(bar.on_theme_changed(&theme));
        assert_eq!(bar.fill_color(), None);
    }

    #[test]
    fn test_nan_reading_settles() {
        let mut store = SampleStore::default();
        store.apply_frame(frame(f64::NAN));
        let theme = ThemeProvider::default();
        let ctx = WidgetContext::new(&store, &theme);
        let mut bar = Meter::new(WidgetRole::Bar, RelativeIndex(0), &ctx);

        assert!(bar.update_data(&store));
        store.apply_frame(frame(f64::NAN));
        assert!(!bar.update_data(&store));
    }

    #[test]
    fn test_shrunk_table_skips_refresh() {
        let mut store = SampleStore::default();
        store.apply_frame(frame(10.0));
        let theme = ThemeProvider::default();
        let ctx = WidgetContext::new(&store, &theme);
        let mut bar = Meter::new(WidgetRole::Bar, RelativeIndex(0), &ctx);
        bar.update_data(&store);

        store.apply_frame(Frame::new("Tank").with_group(Group::new("Empty", GroupWidget::None)));
        assert!(!bar.update_data(&store));
        assert_eq!(bar.value_text(), "10.00 %");
    }
}
