//! The dashboard context.
//!
//! [`Dashboard`] owns the sample store, the theme, the notification hub,
//! every widget host and the redraw throttle. It is created at startup and
//! dropped at shutdown; all notifications, refreshes and repaints run on
//! the thread that owns it.
//!
//! Publishing is synchronous: every `publish` is followed by a delivery
//! pass over all hosts before control returns to the caller, and the store
//! is not touched during delivery, so every widget sees the same snapshot.

use std::time::Instant;

use crate::bridge::{FrameMessage, FrameReceiver};
use crate::bus::{Notification, NotificationHub};
use crate::config::DashboardConfig;
use crate::host::{HostContext, HostEvent, WidgetHost};
use crate::id::{GlobalIndex, HostId};
use crate::registry::WidgetTypeRegistry;
use crate::store::{FrameChange, SampleStore};
use crate::theme::{Theme, ThemeProvider};
use crate::throttle::{RedrawThrottle, RenderSurface};
use crate::types::{AxisVisibility, Frame};

/// Result of one [`Dashboard::process_incoming`] pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestReport {
    /// Frames applied to the store
    pub frames: usize,
    /// Whether any of them rebuilt the widget table
    pub reconfigured: bool,
    /// Whether the producer announced shutdown
    pub shutdown: bool,
}

pub struct Dashboard {
    store: SampleStore,
    theme: ThemeProvider,
    hub: NotificationHub,
    hosts: Vec<WidgetHost>,
    throttle: RedrawThrottle,
    next_host: u32,
}

impl Dashboard {
    pub fn new(config: &DashboardConfig) -> Self {
        let mut store = SampleStore::new(config.precision, config.plot_points);
        store.set_axis_visibility(config.axis_visibility);
        Self::with_parts(
            store,
            ThemeProvider::from_name_or_path(&config.theme),
            RedrawThrottle::new(config.redraw_rate_hz),
        )
    }

    pub fn with_parts(store: SampleStore, theme: ThemeProvider, throttle: RedrawThrottle) -> Self {
        Self {
            store,
            theme,
            hub: NotificationHub::new(),
            hosts: Vec::new(),
            throttle,
            next_host: 0,
        }
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    pub fn theme(&self) -> &ThemeProvider {
        &self.theme
    }

    pub fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    pub fn throttle(&self) -> &RedrawThrottle {
        &self.throttle
    }

    /// Number of widgets in the current table
    pub fn total_widget_count(&self) -> usize {
        WidgetTypeRegistry::new(&self.store).total_widget_count()
    }

    // ==================== Hosts ====================

    /// Create an empty host
    pub fn add_host(&mut self) -> HostId {
        let id = HostId(self.next_host);
        self.next_host += 1;
        self.hosts.push(WidgetHost::new(id, &mut self.hub));
        tracing::debug!("Added {:?}", id);
        id
    }

    /// Destroy a host and release its subscriptions
    pub fn remove_host(&mut self, id: HostId) -> bool {
        let Some(pos) = self.hosts.iter().position(|h| h.id() == id) else {
            return false;
        };
        self.hosts.remove(pos).detach(&mut self.hub);
        tracing::debug!("Removed {:?}", id);
        true
    }

    pub fn host(&self, id: HostId) -> Option<&WidgetHost> {
        self.hosts.iter().find(|h| h.id() == id)
    }

    fn host_mut(&mut self, id: HostId) -> Option<&mut WidgetHost> {
        self.hosts.iter_mut().find(|h| h.id() == id)
    }

    pub fn hosts(&self) -> &[WidgetHost] {
        &self.hosts
    }

    /// Point a host at another widget. Out-of-range indices are ignored.
    pub fn set_global_index(&mut self, id: HostId, index: GlobalIndex) -> bool {
        let Some(host) = self.hosts.iter_mut().find(|h| h.id() == id) else {
            return false;
        };
        let mut ctx = HostContext {
            source: &self.store,
            theme: &self.theme,
            hub: &mut self.hub,
        };
        host.set_global_index(index, &mut ctx)
    }

    pub fn set_visible(&mut self, id: HostId, visible: bool) {
        if let Some(host) = self.host_mut(id) {
            host.set_visible(visible);
        }
    }

    pub fn set_external_window(&mut self, id: HostId, external: bool) {
        if let Some(host) = self.hosts.iter_mut().find(|h| h.id() == id) {
            host.set_external_window(external, &self.store);
        }
    }

    /// Drain the events of every host
    pub fn take_events(&mut self) -> Vec<(HostId, HostEvent)> {
        self.hosts
            .iter_mut()
            .flat_map(|host| {
                let id = host.id();
                host.take_events().into_iter().map(move |event| (id, event))
            })
            .collect()
    }

    // ==================== Ingestion ====================

    /// Apply a single frame and notify widgets
    pub fn ingest(&mut self, frame: Frame) -> FrameChange {
        let change = self.store.apply_frame(frame);
        if change == FrameChange::Reconfigured {
            self.publish(Notification::WidgetTableChanged);
        }
        self.publish(Notification::Updated);
        change
    }

    /// Apply every frame waiting in `rx`.
    ///
    /// Widgets are notified once for the whole batch.
    pub fn process_incoming(&mut self, rx: &FrameReceiver) -> IngestReport {
        let mut report = IngestReport::default();
        for msg in rx.drain() {
            match msg {
                FrameMessage::Frame(frame) => {
                    report.frames += 1;
                    if self.store.apply_frame(frame) == FrameChange::Reconfigured {
                        report.reconfigured = true;
                    }
                }
                FrameMessage::Shutdown => report.shutdown = true,
            }
        }

        if report.reconfigured {
            self.publish(Notification::WidgetTableChanged);
        }
        if report.frames > 0 {
            self.publish(Notification::Updated);
        }
        report
    }

    // ==================== Shared options ====================

    pub fn set_theme(&mut self, theme: Theme) {
        tracing::debug!("Switching theme to {:?}", theme.name);
        self.theme.set_theme(theme);
        self.publish(Notification::ThemeChanged);
    }

    /// Decimals for numeric readings; picked up on the next update
    pub fn set_precision(&mut self, precision: usize) {
        self.store.set_precision(precision);
    }

    pub fn set_axis_visibility(&mut self, visibility: AxisVisibility) {
        if self.store.set_axis_visibility(visibility) {
            self.publish(Notification::AxisVisibilityChanged);
        }
    }

    /// Show or hide a widget on the dashboard side
    pub fn set_widget_visible(&mut self, index: GlobalIndex, visible: bool) {
        if self.store.set_widget_visible(index, visible) {
            self.publish(Notification::WidgetVisibilityChanged);
        }
    }

    // ==================== Notification & redraw ====================

    fn publish(&mut self, notification: Notification) {
        let reached = self.hub.publish(notification);
        tracing::trace!("Published {:?} to {} subscribers", notification, reached);

        let mut ctx = HostContext {
            source: &self.store,
            theme: &self.theme,
            hub: &mut self.hub,
        };
        for host in &mut self.hosts {
            host.pump(&mut ctx);
        }
    }

    pub fn is_redraw_due(&self, now: Instant) -> bool {
        self.throttle.is_due(now)
    }

    /// Repaint dirty widgets through `surface`
    pub fn tick(&mut self, now: Instant, surface: &mut dyn RenderSurface) -> usize {
        self.throttle.tick(now, &mut self.hosts, surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::frame_channel;
    use crate::throttle::MockRenderSurface;
    use crate::types::{Dataset, DatasetWidget, Group, GroupWidget, WidgetRole};

    fn frame(v: f64) -> Frame {
        Frame::new("Rig").with_group(
            Group::new("Power", GroupWidget::DataGrid)
                .with_dataset(Dataset::new("Volts", v).with_widget(DatasetWidget::Bar))
                .with_dataset(Dataset::new("Amps", v * 2.0)),
        )
    }

    #[test]
    fn test_hosts_follow_ingestion() {
        let mut dash = Dashboard::new(&DashboardConfig::default());
        let host = dash.add_host();

        assert!(!dash.set_global_index(host, GlobalIndex(0)));
        dash.ingest(frame(1.0));
        assert_eq!(dash.total_widget_count(), 2);
        assert!(dash.set_global_index(host, GlobalIndex(1)));
        assert_eq!(dash.host(host).unwrap().widget_role(), Some(WidgetRole::Bar));

        let mut surface = MockRenderSurface::new();
        surface.expect_repaint().times(1).return_const(());
        assert_eq!(dash.tick(Instant::now(), &mut surface), 1);
    }

    #[test]
    fn test_batch_publishes_once() {
        let mut dash = Dashboard::new(&DashboardConfig::default());
        let host = dash.add_host();
        dash.ingest(frame(1.0));
        dash.set_global_index(host, GlobalIndex(0));
        let published = dash.hub().published_count();

        let (tx, rx) = frame_channel();
        for v in 0..10 {
            tx.send(frame(v as f64)).unwrap();
        }
        let report = dash.process_incoming(&rx);

        assert_eq!(report.frames, 10);
        assert!(!report.reconfigured);
        assert_eq!(dash.hub().published_count(), published + 1);
    }

    #[test]
    fn test_option_changes_publish_only_when_changed() {
        let mut dash = Dashboard::new(&DashboardConfig::default());
        let before = dash.hub().published_count();

        dash.set_axis_visibility(AxisVisibility::BothAxes);
        dash.set_widget_visible(GlobalIndex(0), true);
        assert_eq!(dash.hub().published_count(), before);

        dash.set_axis_visibility(AxisVisibility::XOnly);
        dash.set_widget_visible(GlobalIndex(0), false);
        assert_eq!(dash.hub().published_count(), before + 2);
    }

    #[test]
    fn test_remove_host_releases_subscriptions() {
        let mut dash = Dashboard::new(&DashboardConfig::default());
        dash.ingest(frame(1.0));
        let host = dash.add_host();
        dash.set_global_index(host, GlobalIndex(0));
        assert_eq!(dash.hub().subscriber_count(), 2);

        assert!(dash.remove_host(host));
        assert_eq!(dash.hub().subscriber_count(), 0);
        assert!(!dash.remove_host(host));
    }
}
