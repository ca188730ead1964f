//! Compass widget: a heading in degrees with its cardinal label

use super::common::{replace, replace_f64, WidgetPalette};
use super::{index_in_range, DashboardWidget, WidgetContext};
use crate::id::RelativeIndex;
use crate::store::DashboardSource;
use crate::theme::{Color, ThemeProvider};
use crate::types::WidgetRole;

const CARDINALS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Normalize any angle into `[0, 360)`
pub fn normalize_heading(degrees: f64) -> f64 {
    let heading = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if heading >= 360.0 {
        0.0
    } else {
        heading
    }
}

/// 16-point compass label for a normalized heading
pub fn cardinal_label(heading: f64) -> &'static str {
    let sector = ((heading + 11.25) / 22.5).floor() as usize % CARDINALS.len();
    CARDINALS[sector]
}

#[derive(Debug, Clone)]
pub struct Compass {
    index: RelativeIndex,
    valid: bool,
    title: String,
    palette_slot: usize,
    heading: f64,
    value_text: String,
    needle: Option<Color>,
    palette: WidgetPalette,
}

impl Compass {
    pub fn new(index: RelativeIndex, ctx: &WidgetContext<'_>) -> Self {
        let mut compass = Self {
            index,
            valid: false,
            title: String::new(),
            palette_slot: 0,
            heading: 0.0,
            value_text: String::new(),
            needle: None,
            palette: WidgetPalette::default(),
        };

        let dataset = index_in_range(ctx.source, WidgetRole::Compass, index)
            .then(|| ctx.source.dataset(WidgetRole::Compass, index, 0))
            .flatten();
        if let Some(dataset) = dataset {
            compass.valid = true;
            compass.title = dataset.title.clone();
            compass.palette_slot = dataset.index;
            compass.on_theme_changed(ctx.theme);
        }
        compass
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Heading in `[0, 360)`
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Formatted heading, e.g. `"045.00° NE"`
    pub fn value_text(&self) -> &str {
        &self.value_text
    }

    pub fn cardinal(&self) -> &'static str {
        cardinal_label(self.heading)
    }

    pub fn needle_color(&self) -> Option<Color> {
        self.needle
    }

    pub fn palette(&self) -> &WidgetPalette {
        &self.palette
    }
}

impl DashboardWidget for Compass {
    fn role(&self) -> WidgetRole {
        WidgetRole::Compass
    }

    fn relative_index(&self) -> RelativeIndex {
        self.index
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn update_data(&mut self, source: &dyn DashboardSource) -> bool {
        if !self.valid || !index_in_range(source, WidgetRole::Compass, self.index) {
            return false;
        }
        let Some(dataset) = source.dataset(WidgetRole::Compass, self.index, 0) else {
            return false;
        };

        let heading = normalize_heading(dataset.value.as_number().unwrap_or(0.0));
        let text = format!(
            "{:0width$.prec$}° {}",
            heading,
            cardinal_label(heading),
            width = source.precision() + 4,
            prec = source.precision()
        );

        let mut changed = replace_f64(&mut self.heading, heading);
        changed |= replace(&mut self.value_text, text);
        changed
    }

    fn on_theme_changed(&mut self, theme: &ThemeProvider) -> bool {
        if !self.valid {
            return false;
        }
        let mut changed = replace(&mut self.palette, WidgetPalette::from_theme(theme));
        changed |= replace(&mut self.needle, theme.palette_color(self.palette_slot));
        changed
    }
}
