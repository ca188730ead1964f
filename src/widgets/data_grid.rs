//! Data grid widget: one row per dataset of a group

use super::common::{alarm_triggered, replace, unit_label, WidgetPalette};
use super::{index_in_range, DashboardWidget, WidgetContext};
use crate::id::RelativeIndex;
use crate::store::DashboardSource;
use crate::theme::{Color, ThemeProvider};
use crate::types::WidgetRole;

#[derive(Debug, Clone, Default)]
pub struct DataGrid {
    index: RelativeIndex,
    valid: bool,
    titles: Vec<String>,
    units: Vec<String>,
    values: Vec<String>,
    alarms: Vec<bool>,
    palette_slots: Vec<usize>,
    colors: Vec<Option<Color>>,
    palette: WidgetPalette,
}

impl DataGrid {
    pub fn new(index: RelativeIndex, ctx: &WidgetContext<'_>) -> Self {
        let mut grid = Self {
            index,
            ..Default::default()
        };
        if !index_in_range(ctx.source, WidgetRole::DataGrid, index) {
            return grid;
        }

        let count = ctx.source.dataset_count(WidgetRole::DataGrid, index);
        for i in 0..count {
            let Some(dataset) = ctx.source.dataset(WidgetRole::DataGrid, index, i) else {
                continue;
            };
            grid.titles.push(dataset.title.clone());
            grid.units.push(unit_label(&dataset.units));
            grid.palette_slots.push(dataset.index);
        }
        grid.values = vec![String::new(); grid.titles.len()];
        grid.alarms = vec![false; grid.titles.len()];
        grid.valid = true;
        grid.on_theme_changed(ctx.theme);
        grid
    }

    pub fn count(&self) -> usize {
        self.titles.len()
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Unit labels, `[u]` or empty
    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn alarms(&self) -> &[bool] {
        &self.alarms
    }

    pub fn colors(&self) -> &[Option<Color>] {
        &self.colors
    }

    pub fn palette(&self) -> &WidgetPalette {
        &self.palette
    }
}

impl DashboardWidget for DataGrid {
    fn role(&self) -> WidgetRole {
        WidgetRole::DataGrid
    }

    fn relative_index(&self) -> RelativeIndex {
        self.index
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn update_data(&mut self, source: &dyn DashboardSource) -> bool {
        if !self.valid || !index_in_range(source, WidgetRole::DataGrid, self.index) {
            return false;
        }

        let precision = source.precision();
        let mut changed = false;
        for i in 0..self.count() {
            let Some(dataset) = source.dataset(WidgetRole::DataGrid, self.index, i) else {
                continue;
            };

            let alarm = dataset
                .value
                .as_number()
                .is_some_and(|n| alarm_triggered(n, dataset.alarm));
            changed |= replace(&mut self.alarms[i], alarm);
            changed |= replace(&mut self.values[i], dataset.value.display(precision));
        }

        if changed {
            tracing::trace!("Data grid {} updated", self.index);
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
