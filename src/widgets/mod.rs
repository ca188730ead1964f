//! Concrete dashboard widgets and their role dispatch.
//!
//! Every widget binds to one entry of its role's sub-table through a
//! [`RelativeIndex`] and refreshes its derived presentation state from a
//! [`DashboardSource`] snapshot. Widgets never render pixels; they expose
//! read-only accessors for whatever [`RenderSurface`](crate::throttle::RenderSurface)
//! draws them.
//!
//! A widget whose index was out of range at construction is permanently
//! inert: it gets no subscription and never reports a change.
//!
//! [`Widget`] is the closed set of widgets, built by the exhaustive match
//! in [`Widget::build`].

pub mod common;
pub mod compass;
pub mod data_grid;
pub mod fft_plot;
pub mod gps;
pub mod led;
pub mod meter;
pub mod motion;
pub mod plot;

pub use compass::Compass;
pub use data_grid::DataGrid;
pub use fft_plot::FftPlot;
pub use gps::{Gps, GpsPosition};
pub use led::LedPanel;
pub use meter::Meter;
pub use motion::{Accelerometer, Gyroscope};
pub use plot::{MultiPlot, Plot};

use crate::bus::{Notification, TopicSet};
use crate::id::RelativeIndex;
use crate::store::DashboardSource;
use crate::theme::ThemeProvider;
use crate::types::{AxisVisibility, WidgetRole};

/// Everything a widget reads while being constructed
#[derive(Clone, Copy)]
pub struct WidgetContext<'a> {
    pub source: &'a dyn DashboardSource,
    pub theme: &'a ThemeProvider,
}

impl<'a> WidgetContext<'a> {
    pub fn new(source: &'a dyn DashboardSource, theme: &'a ThemeProvider) -> Self {
        Self { source, theme }
    }
}

/// Refresh contract shared by all concrete widgets.
///
/// The `update_data`, `on_theme_changed` and `on_axis_options_changed`
/// hooks return `true` when a derived field changed and the widget needs a
/// repaint.
pub trait DashboardWidget {
    fn role(&self) -> WidgetRole;

    fn relative_index(&self) -> RelativeIndex;

    /// `false` when the index was out of range at construction
    fn is_valid(&self) -> bool;

    /// Notifications the widget subscribes to
    fn topics(&self) -> TopicSet {
        TopicSet::of(&[Notification::Updated, Notification::ThemeChanged])
    }

    fn update_data(&mut self, source: &dyn DashboardSource) -> bool;

    fn on_theme_changed(&mut self, theme: &ThemeProvider) -> bool;

    fn on_axis_options_changed(&mut self, _visibility: AxisVisibility) -> bool {
        false
    }
}

/// Topics for widgets that draw axes
pub(crate) fn plotting_topics() -> TopicSet {
    TopicSet::of(&[
        Notification::Updated,
        Notification::ThemeChanged,
        Notification::AxisVisibilityChanged,
    ])
}

/// Whether `index` still addresses an entry of `role`
pub(crate) fn index_in_range(
    source: &dyn DashboardSource,
    role: WidgetRole,
    index: RelativeIndex,
) -> bool {
    index.is_within(source.group_count(role))
}

/// One concrete widget
pub enum Widget {
    DataGrid(DataGrid),
    MultiPlot(MultiPlot),
    Fft(FftPlot),
    Plot(Plot),
    Bar(Meter),
    Gauge(Meter),
    Compass(Compass),
    Gyroscope(Gyroscope),
    Accelerometer(Accelerometer),
    Gps(Gps),
    Led(LedPanel),
}

impl Widget {
    /// Construct the widget for `role`.
    ///
    /// Returns `None` for roles that have no widget in this crate.
    pub fn build(
        role: WidgetRole,
        index: RelativeIndex,
        ctx: &WidgetContext<'_>,
    ) -> Option<Widget> {
        let widget = match role {
            WidgetRole::DataGrid => Widget::DataGrid(DataGrid::new(index, ctx)),
            WidgetRole::MultiPlot => Widget::MultiPlot(MultiPlot::new(index, ctx)),
            WidgetRole::Fft => Widget::Fft(FftPlot::new(index, ctx)),
            WidgetRole::Plot => Widget::Plot(Plot::new(index, ctx)),
            WidgetRole::Bar => Widget::Bar(Meter::new(WidgetRole::Bar, index, ctx)),
            WidgetRole::Gauge => Widget::Gauge(Meter::new(WidgetRole::Gauge, index, ctx)),
            WidgetRole::Compass => Widget::Compass(Compass::new(index, ctx)),
            WidgetRole::Gyroscope => Widget::Gyroscope(Gyroscope::new(index, ctx)),
            WidgetRole::Accelerometer => Widget::Accelerometer(Accelerometer::new(index, ctx)),
            WidgetRole::Gps => Widget::Gps(Gps::new(index, ctx)),
            WidgetRole::Led => Widget::Led(LedPanel::new(index, ctx)),
            WidgetRole::Plot3D => return None,
        };
        tracing::debug!(
            "Built {} widget for {} (valid: {})",
            role,
            index,
            widget.is_valid()
        );
        Some(widget)
    }

    pub fn as_widget(&self) -> &dyn DashboardWidget {
        match self {
            Widget::DataGrid(w) => w,
            Widget::MultiPlot(w) => w,
            Widget::Fft(w) => w,
            Widget::Plot(w) => w,
            Widget::Bar(w) => w,
            Widget::Gauge(w) => w,
            Widget::Compass(w) => w,
            Widget::Gyroscope(w) => w,
            Widget::Accelerometer(w) => w,
            Widget::Gps(w) => w,
            Widget::Led(w) => w,
        }
    }

    pub fn as_widget_mut(&mut self) -> &mut dyn DashboardWidget {
        match self {
            Widget::DataGrid(w) => w,
            Widget::MultiPlot(w) => w,
            Widget::Fft(w) => w,
            Widget::Plot(w) => w,
            Widget::Bar(w) => w,
            Widget::Gauge(w) => w,
            Widget::Compass(w) => w,
            Widget::Gyroscope(w) => w,
            Widget::Accelerometer(w) => w,
            Widget::Gps(w) => w,
            Widget::Led(w) => w,
        }
    }

    pub fn role(&self) -> WidgetRole {
        self.as_widget().role()
    }

    pub fn relative_index(&self) -> RelativeIndex {
        self.as_widget().relative_index()
    }

    pub fn is_valid(&self) -> bool {
        self.as_widget().is_valid()
    }

    pub fn topics(&self) -> TopicSet {
        self.as_widget().topics()
    }

    pub fn update_data(&mut self, source: &dyn DashboardSource) -> bool {
        self.as_widget_mut().update_data(source)
    }

    pub fn on_theme_changed(&mut self, theme: &ThemeProvider) -> bool {
        self.as_widget_mut().on_theme_changed(theme)
    }

    pub fn on_axis_options_changed(&mut self, visibility: AxisVisibility) -> bool {
        self.as_widget_mut().on_axis_options_changed(visibility)
    }

    /// The GPS widget, when this is one
    pub fn as_gps(&self) -> Option<&Gps> {
        match self {
            Widget::Gps(gps) => Some(gps),
            _ => None,
        }
    }
}
