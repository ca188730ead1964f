//! LED panel: one on/off lamp per dataset of a group

use super::common::{led_lit, replace, WidgetPalette};
use super::{index_in_range, DashboardWidget, WidgetContext};
use crate::id::RelativeIndex;
use crate::store::DashboardSource;
use crate::theme::{Color, ThemeProvider};
use crate::types::WidgetRole;

#[derive(Debug, Clone, Default)]
pub struct LedPanel {
    index: RelativeIndex,
    valid: bool,
    titles: Vec<String>,
    states: Vec<bool>,
    palette_slots: Vec<usize>,
    colors: Vec<Option<Color>>,
    palette: WidgetPalette,
}

impl LedPanel {
    pub fn new(index: RelativeIndex, ctx: &WidgetContext<'_>) -> Self {
        let mut panel = Self {
            index,
            ..Default::default()
        };
        if !index_in_range(ctx.source, WidgetRole::Led, index) {
            return panel;
        }

        for i in 0..ctx.source.dataset_count(WidgetRole::Led, index) {
            if let Some(dataset) = ctx.source.dataset(WidgetRole::Led, index, i) {
                panel.titles.push(dataset.title.clone());
                panel.palette_slots.push(dataset.index);
            }
        }
        panel.states = vec![false; panel.titles.len()];
        panel.valid = true;
        panel.on_theme_changed(ctx.theme);
        panel
    }

    pub fn count(&self) -> usize {
        self.titles.len()
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// `true` for lit lamps
    pub fn states(&self) -> &[bool] {
        &self.states
    }

    pub fn colors(&self) -> &[Option<Color>] {
        &self.colors
    }

    pub fn palette(&self) -> &WidgetPalette {
        &self.palette
    }
}

impl DashboardWidget for LedPanel {
    fn role(&self) -> WidgetRole {
        WidgetRole::Led
    }

    fn relative_index(&self) -> RelativeIndex {
        self.index
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn update_data(&mut self, source: &dyn DashboardSource) -> bool {
        if !self.valid || !index_in_range(source, WidgetRole::Led, self.index) {
            return false;
        }

        let mut changed = false;
        for (i, state) in self.states.iter_mut().enumerate() {
            if let Some(dataset) = source.dataset(WidgetRole::Led, self.index, i) {
                let value = dataset.value.as_number().unwrap_or(0.0);
                changed |= replace(state, led_lit(value, dataset.alarm));
            }
        }
        changed
    }

    fn on_theme_changed(&mut self, theme: &ThemeProvider) -> bool {
        if !self.valid {
            return false;
        }
        let colors = self
            .palette_slots
            .iter()
            .map(|slot| theme.palette_color(*slot))
            .collect();

        let mut changed = replace(&mut self.palette, WidgetPalette::from_theme(theme));
        changed |= replace(&mut self.colors, colors);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SampleStore;
    use crate::types::{Dataset, Frame, Group, GroupWidget};

    fn frame(power: f64, temp: f64) -> Frame {
        Frame::new("Board").with_group(
            Group::new("Status", GroupWidget::Led)
                .with_dataset(Dataset::new("Power", power))
                .with_dataset(Dataset::new("Overheat", temp).with_alarm(70.0))
                .with_dataset(Dataset::new("Link", "down")),
        )
    }

    #[test]
    fn test_led_states() {
        let mut store = SampleStore::default();
        store.apply_frame(frame(1.0, 65.0));
        let theme = ThemeProvider::default();
        let mut leds = LedPanel::new(RelativeIndex(0), &WidgetContext::new(&store, &theme));

        assert_eq!(leds.count(), 3);
        assert!(leds.update_data(&store));
        assert_eq!(leds.states(), [true, false, false]);

        store.apply_frame(frame(0.0, 70.0));
        assert!(leds.update_data(&store));
        assert_eq!(leds.states(), [false, true, false]);

        assert!(!leds.update_data(&store));
    }
}
