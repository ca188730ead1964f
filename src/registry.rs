//! Widget type registry.
//!
//! Two parts:
//! - [`WidgetTypeRegistry`] resolves a [`GlobalIndex`] to its role and
//!   relative index. It borrows the source for the current call only and
//!   caches nothing, because the table can be rebuilt between any two
//!   notifications.
//! - [`widget_kinds`] is the data-driven table of widget kinds: display
//!   names and icons. Construction itself is the exhaustive match in
//!   [`Widget::build`](crate::widgets::Widget::build).

use crate::id::{GlobalIndex, RelativeIndex};
use crate::store::DashboardSource;
use crate::types::WidgetRole;

/// Pure index resolution against the current widget table
pub struct WidgetTypeRegistry<'a> {
    source: &'a dyn DashboardSource,
}

impl<'a> WidgetTypeRegistry<'a> {
    pub fn new(source: &'a dyn DashboardSource) -> Self {
        Self { source }
    }

    /// Number of widgets across all roles
    pub fn total_widget_count(&self) -> usize {
        WidgetRole::ALL
            .iter()
            .map(|role| self.source.group_count(*role))
            .sum()
    }

    /// Role and relative index of a global index
    pub fn resolve(&self, index: GlobalIndex) -> Option<(WidgetRole, RelativeIndex)> {
        let mut remaining = index.index();
        for role in WidgetRole::ALL {
            let count = self.source.group_count(role);
            if remaining < count {
                return Some((role, RelativeIndex(remaining)));
            }
            remaining -= count;
        }
        None
    }

    pub fn role_of(&self, index: GlobalIndex) -> Option<WidgetRole> {
        self.resolve(index).map(|(role, _)| role)
    }

    pub fn relative_index_of(&self, index: GlobalIndex) -> Option<RelativeIndex> {
        self.resolve(index).map(|(_, rel)| rel)
    }

    /// Inverse of [`resolve`](Self::resolve)
    pub fn global_index_of(&self, role: WidgetRole, index: RelativeIndex) -> Option<GlobalIndex> {
        if !index.is_within(self.source.group_count(role)) {
            return None;
        }

        let offset: usize = WidgetRole::ALL
            .iter()
            .take_while(|r| **r != role)
            .map(|r| self.source.group_count(*r))
            .sum();
        Some(GlobalIndex(offset + index.index()))
    }

    /// Title of the widget at a global index
    pub fn widget_title(&self, index: GlobalIndex) -> Option<&'a str> {
        let (role, rel) = self.resolve(index)?;
        self.source.group_title(role, rel)
    }
}

/// Metadata for a widget kind.
#[derive(Debug, Clone, Copy)]
pub struct WidgetKindInfo {
    pub role: WidgetRole,
    pub display_name: &'static str,
    pub icon: &'static str,
}

/// Build the widget kind table, one entry per role.
pub fn widget_kinds() -> Vec<WidgetKindInfo> {
    vec![
        WidgetKindInfo {
            role: WidgetRole::DataGrid,
            display_name: "Data Grid",
            icon: "qrc:/icons/dashboard/datagrid.svg",
        },
        WidgetKindInfo {
            role: WidgetRole::MultiPlot,
            display_name: "Multiple Data Plot",
            icon: "qrc:/icons/dashboard/multiplot.svg",
        },
        WidgetKindInfo {
            role: WidgetRole::Fft,
            display_name: "FFT Plot",
            icon: "qrc:/icons/dashboard/fft.svg",
        },
        WidgetKindInfo {
            role: WidgetRole::Plot,
            display_name: "Plot",
            icon: "qrc:/icons/dashboard/plot.svg",
        },
        WidgetKindInfo {
            role: WidgetRole::Bar,
            display_name: "Bar",
            icon: "qrc:/icons/dashboard/bar.svg",
        },
        WidgetKindInfo {
            role: WidgetRole::Gauge,
            display_name: "Gauge",
            icon: "qrc:/icons/dashboard/gauge.svg",
        },
        WidgetKindInfo {
            role: WidgetRole::Compass,
            display_name: "Compass",
            icon: "qrc:/icons/dashboard/compass.svg",
        },
        WidgetKindInfo {
            role: WidgetRole::Gyroscope,
            display_name: "Gyroscope",
            icon: "qrc:/icons/dashboard/gyroscope.svg",
        },
        WidgetKindInfo {
            role: WidgetRole::Accelerometer,
            display_name: "Accelerometer",
            icon: "qrc:/icons/dashboard/accelerometer.svg",
        },
        WidgetKindInfo {
            role: WidgetRole::Gps,
            display_name: "GPS Map",
            icon: "qrc:/icons/dashboard/gps.svg",
        },
        WidgetKindInfo {
            role: WidgetRole::Led,
            display_name: "LED Panel",
            icon: "qrc:/icons/dashboard/led.svg",
        },
        WidgetKindInfo {
            role: WidgetRole::Plot3D,
            display_name: "3D Plot",
            icon: "qrc:/icons/dashboard/plot3d.svg",
        },
    ]
}

/// Look up the kind entry for a role
pub fn kind_info(role: WidgetRole) -> Option<WidgetKindInfo> {
    widget_kinds().into_iter().find(|k| k.role == role)
}
