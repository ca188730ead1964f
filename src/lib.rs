//! # DashVis-RS: real-time instrument panel core
//!
//! The widget layer of a telemetry dashboard. A producer streams decoded
//! [`Frame`]s into the [`Dashboard`]; the dashboard flattens them into a
//! widget table, notifies every [`WidgetHost`] and repaints dirty widgets
//! at a fixed rate through a [`RenderSurface`].
//!
//! ## Architecture
//!
//! - **Store**: latest frame, per-role sub-tables and sample history
//! - **Registry**: maps a [`GlobalIndex`] to a widget role and relative index
//! - **Widgets**: one closed enum of concrete widget kinds, including the
//!   FFT plot backed by [`analysis::SpectralAnalyzer`]
//! - **Hosts**: one slot per on-screen widget, rebuilt on selection or
//!   table change
//! - **Bus**: synchronous publish/subscribe of [`bus::Notification`]s
//! - **Communication**: a crossbeam channel from producer threads to the
//!   dashboard thread
//!
//! ## Configuration
//!
//! Settings and the last session are stored in the platform-appropriate
//! data directory under `dev.dashvis.dashvis-rs`; see [`config`].
//!
//! ## Example
//!
//! ```ignore
//! use dashvis_rs::{bridge::frame_channel, config::DashboardConfig, Dashboard, GlobalIndex};
//!
//! let mut dashboard = Dashboard::new(&DashboardConfig::load_or_default());
//! let host = dashboard.add_host();
//!
//! let (tx, rx) = frame_channel();
//! std::thread::spawn(move || produce_frames(tx));
//!
//! loop {
//!     dashboard.process_incoming(&rx);
//!     dashboard.set_global_index(host, GlobalIndex(0));
//!     if dashboard.is_redraw_due(Instant::now()) {
//!         dashboard.tick(Instant::now(), &mut surface);
//!     }
//! }
//! ```

pub mod analysis;
pub mod bridge;
pub mod bus;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod host;
pub mod id;
pub mod registry;
pub mod store;
pub mod theme;
pub mod throttle;
pub mod types;
pub mod widgets;

// Re-export commonly used types
pub use config::{AppState, DashboardConfig};
pub use dashboard::{Dashboard, IngestReport};
pub use error::{DashboardError, Result};
pub use host::{HostEvent, VisibilityMode, WidgetHost};
pub use id::{GlobalIndex, HostId, RelativeIndex};
pub use store::{DashboardSource, SampleStore};
pub use theme::{Color, Theme, ThemeProvider};
pub use throttle::{RedrawThrottle, RenderSurface};
pub use types::{AxisVisibility, Dataset, DatasetValue, Frame, Group, WidgetRole};
pub use widgets::{DashboardWidget, Widget};
