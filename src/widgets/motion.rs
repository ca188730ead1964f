//! Three-axis motion widgets.
//!
//! Both read the first three datasets of their group as the x, y and z
//! axes. The accelerometer additionally reports the vector magnitude.

use super::common::{replace, same_f64, value_with_units, WidgetPalette};
use super::{index_in_range, DashboardWidget, WidgetContext};
use crate::id::RelativeIndex;
use crate::store::DashboardSource;
use crate::theme::ThemeProvider;
use crate::types::WidgetRole;

/// Readings of one x/y/z sensor group
#[derive(Debug, Clone, Default)]
pub struct AxisReadings {
    pub values: [f64; 3],
    pub texts: [String; 3],
}

impl PartialEq for AxisReadings {
    fn eq(&self, other: &Self) -> bool {
        self.texts == other.texts
            && self.values.iter().zip(&other.values).all(|(a, b)| same_f64(*a, *b))
    }
}

impl AxisReadings {
    pub fn x(&self) -> f64 {
        self.values[0]
    }

    pub fn y(&self) -> f64 {
        self.values[1]
    }

    pub fn z(&self) -> f64 {
        self.values[2]
    }

    pub fn magnitude(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }
}

/// State shared by both motion widgets
#[derive(Debug, Clone, Default)]
struct TriAxis {
    index: RelativeIndex,
    valid: bool,
    title: String,
    readings: AxisReadings,
    palette: WidgetPalette,
}

impl TriAxis {
    fn new(role: WidgetRole, index: RelativeIndex, ctx: &WidgetContext<'_>) -> Self {
        let mut state = Self {
            index,
            ..Default::default()
        };
        if index_in_range(ctx.source, role, index) {
            state.valid = true;
            state.title = ctx.source.group_title(role, index).unwrap_or_default().to_string();
            state.palette = WidgetPalette::from_theme(ctx.theme);
        }
        state
    }

    fn update(&mut self, role: WidgetRole, source: &dyn DashboardSource) -> bool {
        if !self.valid || !index_in_range(source, role, self.index) {
            return false;
        }

        let mut readings = AxisReadings::default();
        for axis in 0..3 {
            if let Some(dataset) = source.dataset(role, self.index, axis) {
                readings.values[axis] = dataset.value.as_number().unwrap_or(0.0);
                readings.texts[axis] = value_with_units(dataset, source.precision());
            }
        }
        replace(&mut self.readings, readings)
    }

    fn theme_changed(&mut self, theme: &ThemeProvider) -> bool {
        self.valid && replace(&mut self.palette, WidgetPalette::from_theme(theme))
    }
}

/// Angular rate around x, y and z
#[derive(Debug, Clone)]
pub struct Gyroscope {
    state: TriAxis,
}

impl Gyroscope {
    pub fn new(index: RelativeIndex, ctx: &WidgetContext<'_>) -> Self {
        Self {
            state: TriAxis::new(WidgetRole::Gyroscope, index, ctx),
        }
    }

    pub fn title(&self) -> &str {
        &self.state.title
    }

    pub fn readings(&self) -> &AxisReadings {
        &self.state.readings
    }

    pub fn palette(&self) -> &WidgetPalette {
        &self.state.palette
    }
}

impl DashboardWidget for Gyroscope {
    fn role(&self) -> WidgetRole {
        WidgetRole::Gyroscope
    }

    fn relative_index(&self) -> RelativeIndex {
        self.state.index
    }

    fn is_valid(&self) -> bool {
        self.state.valid
    }

    fn update_data(&mut self, source: &dyn DashboardSource) -> bool {
        self.state.update(WidgetRole::Gyroscope, source)
    }

    fn on_theme_changed(&mut self, theme: &ThemeProvider) -> bool {
        self.state.theme_changed(theme)
    }
}

/// Linear acceleration along x, y and z
#[derive(Debug, Clone)]
pub struct Accelerometer {
    state: TriAxis,
    magnitude_text: String,
}

impl Accelerometer {
    pub fn new(index: RelativeIndex, ctx: &WidgetContext<'_>) -> Self {
        Self {
            state: TriAxis::new(WidgetRole::Accelerometer, index, ctx),
            magnitude_text: String::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.state.title
    }

    pub fn readings(&self) -> &AxisReadings {
        &self.state.readings
    }

    pub fn magnitude(&self) -> f64 {
        self.state.readings.magnitude()
    }

    pub fn magnitude_text(&self) -> &str {
        &self.magnitude_text
    }

    pub fn palette(&self) -> &WidgetPalette {
        &self.state.palette
    }
}

impl DashboardWidget for Accelerometer {
    fn role(&self) -> WidgetRole {
        WidgetRole::Accelerometer
    }

    fn relative_index(&self) -> RelativeIndex {
        self.state.index
    }

    fn is_valid(&self) -> bool {
        self.state.valid
    }

    fn update_data(&mut self, source: &dyn DashboardSource) -> bool {
        if !self.state.update(WidgetRole::Accelerometer, source) {
            return false;
        }
        self.magnitude_text = format!("{:.*}", source.precision(), self.magnitude());
        true
    }

    fn on_theme_changed(&mut self, theme: &ThemeProvider) -> bool {
        self.state.theme_changed(theme)
    }
}
