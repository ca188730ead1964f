//! GPS widget: latitude, longitude and altitude of a group.
//!
//! The map itself is drawn outside this crate; the host exposes the
//! position through [`WidgetHost::gps_latitude`](crate::host::WidgetHost::gps_latitude)
//! and friends.

use super::common::{replace, same_f64, WidgetPalette};
use super::{index_in_range, DashboardWidget, WidgetContext};
use crate::id::RelativeIndex;
use crate::store::DashboardSource;
use crate::theme::ThemeProvider;
use crate::types::WidgetRole;

/// A fix as read from the first three datasets of the group
#[derive(Debug, Clone, Copy, Default)]
pub struct GpsPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl PartialEq for GpsPosition {
    fn eq(&self, other: &Self) -> bool {
        same_f64(self.latitude, other.latitude)
            && same_f64(self.longitude, other.longitude)
            && same_f64(self.altitude, other.altitude)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Gps {
    index: RelativeIndex,
    valid: bool,
    title: String,
    position: GpsPosition,
    palette: WidgetPalette,
}

impl Gps {
    pub fn new(index: RelativeIndex, ctx: &WidgetContext<'_>) -> Self {
        let mut gps = Self {
            index,
            ..Default::default()
        };
        if index_in_range(ctx.source, WidgetRole::Gps, index) {
            gps.valid = true;
            gps.title = ctx
                .source
                .group_title(WidgetRole::Gps, index)
                .unwrap_or_default()
                .to_string();
            gps.palette = WidgetPalette::from_theme(ctx.theme);
        }
        gps
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn position(&self) -> GpsPosition {
        self.position
    }

    pub fn latitude(&self) -> f64 {
        self.position.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.position.longitude
    }

    pub fn altitude(&self) -> f64 {
        self.position.altitude
    }

    pub fn palette(&self) -> &WidgetPalette {
        &self.palette
    }
}

impl DashboardWidget for Gps {
    fn role(&self) -> WidgetRole {
        WidgetRole::Gps
    }

    fn relative_index(&self) -> RelativeIndex {
        self.index
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn update_data(&mut self, source: &dyn DashboardSource) -> bool {
        if !self.valid || !index_in_range(source, WidgetRole::Gps, self.index) {
            return false;
        }

        let read = |i: usize| {
            source
                .dataset(WidgetRole::Gps, self.index, i)
                .and_then(|d| d.value.as_number())
                .unwrap_or(0.0)
        };
        let position = GpsPosition {
            latitude: read(0),
            longitude: read(1),
            altitude: read(2),
        };
        replace(&mut self.position, position)
    }

    fn on_theme_changed(&mut self, theme: &ThemeProvider) -> bool {
        self.valid && replace(&mut self.palette, WidgetPalette::from_theme(theme))
    }
}
