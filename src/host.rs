//! Widget host: one dashboard slot that shows exactly one widget at a time.
//!
//! The host is selected by [`GlobalIndex`]. Selecting a new index tears the
//! old widget down completely (unsubscribe, drop the receiver, drop the
//! widget) before the new one is built, so no notification can reach a
//! widget that is no longer shown.
//!
//! Observable changes are queued as [`HostEvent`]s and drained by the
//! owner with [`WidgetHost::take_events`].

use crate::bus::{Notification, NotificationHub, Subscription, TopicSet};
use crate::id::{GlobalIndex, HostId, RelativeIndex};
use crate::registry::{kind_info, WidgetTypeRegistry};
use crate::store::DashboardSource;
use crate::theme::ThemeProvider;
use crate::types::WidgetRole;
use crate::widgets::{GpsPosition, Widget, WidgetContext};

/// Title reported when the index no longer resolves
pub const INVALID_TITLE: &str = "Invalid";

/// Who decides whether the widget is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityMode {
    /// Follows the dashboard's per-widget visibility
    #[default]
    HostControlled,
    /// Shown in a detached window; dashboard visibility is ignored
    External,
}

/// Changes observable from outside the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    IndexChanged(GlobalIndex),
    VisibilityChanged(bool),
    ExternalWindowChanged(bool),
    GpsDataChanged(GpsPosition),
}

/// Everything the host touches while (re)building or refreshing its widget
pub struct HostContext<'a> {
    pub source: &'a dyn DashboardSource,
    pub theme: &'a ThemeProvider,
    pub hub: &'a mut NotificationHub,
}

struct WidgetInstance {
    widget: Widget,
    /// `None` for inert widgets
    subscription: Option<Subscription>,
    dirty: bool,
}

pub struct WidgetHost {
    id: HostId,
    index: Option<GlobalIndex>,
    resolved: Option<(WidgetRole, RelativeIndex)>,
    instance: Option<WidgetInstance>,
    visible: bool,
    mode: VisibilityMode,
    subscription: Subscription,
    events: Vec<HostEvent>,
}

impl WidgetHost {
    /// Create an empty host listening for table and visibility changes
    pub fn new(id: HostId, hub: &mut NotificationHub) -> Self {
        let subscription = hub.subscribe(TopicSet::of(&[
            Notification::WidgetVisibilityChanged,
            Notification::WidgetTableChanged,
        ]));
        Self {
            id,
            index: None,
            resolved: None,
            instance: None,
            visible: true,
            mode: VisibilityMode::default(),
            subscription,
            events: Vec::new(),
        }
    }

    pub fn id(&self) -> HostId {
        self.id
    }

    /// Select the widget to show.
    ///
    /// Out-of-range indices are ignored and leave the current widget alone.
    /// Returns `true` when the widget was replaced.
    pub fn set_global_index(&mut self, index: GlobalIndex, ctx: &mut HostContext<'_>) -> bool {
        let Some((role, rel)) = WidgetTypeRegistry::new(ctx.source).resolve(index) else {
            tracing::debug!("{:?}: ignoring out-of-range {:?}", self.id, index);
            return false;
        };

        self.teardown(ctx.hub);
        self.index = Some(index);
        self.resolved = Some((role, rel));
        if self.mode == VisibilityMode::HostControlled {
            self.set_visible(ctx.source.widget_visible(index));
        }
        self.install(role, rel, ctx);

        tracing::debug!("{:?} now shows {} {} ({:?})", self.id, role, rel, index);
        self.events.push(HostEvent::IndexChanged(index));
        true
    }

    fn install(&mut self, role: WidgetRole, rel: RelativeIndex, ctx: &mut HostContext<'_>) {
        let widget_ctx = WidgetContext::new(ctx.source, ctx.theme);
        self.instance = Widget::build(role, rel, &widget_ctx).map(|mut widget| {
            let subscription = widget.is_valid().then(|| ctx.hub.subscribe(widget.topics()));
            if self.visible {
                widget.update_data(ctx.source);
            }
            WidgetInstance {
                widget,
                subscription,
                dirty: true,
            }
        });
    }

    /// Unsubscribe, then drop the receiver and the widget
    fn teardown(&mut self, hub: &mut NotificationHub) {
        if let Some(instance) = self.instance.take() {
            if let Some(subscription) = &instance.subscription {
                hub.unsubscribe(subscription.id());
            }
            drop(instance);
        }
    }

    /// Release every subscription held by this host
    pub fn detach(mut self, hub: &mut NotificationHub) {
        self.teardown(hub);
        hub.unsubscribe(self.subscription.id());
    }

    /// Deliver every pending notification.
    ///
    /// Returns the number of notifications handled.
    pub fn pump(&mut self, ctx: &mut HostContext<'_>) -> usize {
        let mut handled = 0;
        while let Some(notification) = self.subscription.try_next() {
            self.on_host_notification(notification, ctx);
            handled += 1;
        }

        loop {
            let next = self
                .instance
                .as_ref()
                .and_then(|i| i.subscription.as_ref())
                .and_then(Subscription::try_next);
            let Some(notification) = next else {
                break;
            };
            self.on_widget_notification(notification, ctx.source, ctx.theme);
            handled += 1;
        }
        handled
    }

    fn on_host_notification(&mut self, notification: Notification, ctx: &mut HostContext<'_>) {
        match notification {
            Notification::WidgetVisibilityChanged => {
                if let (VisibilityMode::HostControlled, Some(index)) = (self.mode, self.index) {
                    self.set_visible(ctx.source.widget_visible(index));
                }
            }
            Notification::WidgetTableChanged => self.on_table_changed(ctx),
            _ => {}
        }
    }

    /// Re-resolve after the table was rebuilt. The sub-table entry behind an
    /// unchanged (role, relative index) may still have a different layout,
    /// so any index that still resolves gets a fresh widget.
    fn on_table_changed(&mut self, ctx: &mut HostContext<'_>) {
        let Some(index) = self.index else {
            return;
        };

        match WidgetTypeRegistry::new(ctx.source).resolve(index) {
            Some((role, rel)) => {
                if self.resolved != Some((role, rel)) {
                    tracing::debug!("{:?}: {:?} moved to {} {}", self.id, index, role, rel);
                }
                self.teardown(ctx.hub);
                self.resolved = Some((role, rel));
                if self.mode == VisibilityMode::HostControlled {
                    self.set_visible(ctx.source.widget_visible(index));
                }
                self.install(role, rel, ctx);
            }
            None => {
                tracing::debug!("{:?}: {:?} is out of range after table change", self.id, index);
            }
        }
    }

    fn on_widget_notification(
        &mut self,
        notification: Notification,
        source: &dyn DashboardSource,
        theme: &ThemeProvider,
    ) {
        let visible = self.visible;
        let Some(instance) = self.instance.as_mut() else {
            return;
        };
        let gps_before = instance.widget.as_gps().map(|gps| gps.position());

        let changed = match notification {
            Notification::Updated => visible && instance.widget.update_data(source),
            Notification::ThemeChanged => instance.widget.on_theme_changed(theme),
            Notification::AxisVisibilityChanged => {
                instance.widget.on_axis_options_changed(source.axis_visibility())
            }
            Notification::WidgetVisibilityChanged | Notification::WidgetTableChanged => false,
        };
        if changed {
            instance.dirty = true;
        }

        if let (Some(before), Some(gps)) = (gps_before, instance.widget.as_gps()) {
            if gps.position() != before {
                self.events.push(HostEvent::GpsDataChanged(gps.position()));
            }
        }
    }

    /// Whether the widget is enabled
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Enable or disable the widget. A disabled widget ignores data updates
    /// and keeps its last content.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.events.push(HostEvent::VisibilityChanged(visible));
        }
    }

    pub fn visibility_mode(&self) -> VisibilityMode {
        self.mode
    }

    pub fn is_external_window(&self) -> bool {
        self.mode == VisibilityMode::External
    }

    /// Move the widget into or out of an external window.
    ///
    /// Returning to host control resynchronizes with the dashboard's
    /// current visibility for this widget.
    pub fn set_external_window(&mut self, external: bool, source: &dyn DashboardSource) {
        let mode = if external {
            VisibilityMode::External
        } else {
            VisibilityMode::HostControlled
        };
        if self.mode == mode {
            return;
        }

        self.mode = mode;
        self.events.push(HostEvent::ExternalWindowChanged(external));
        if let (VisibilityMode::HostControlled, Some(index)) = (mode, self.index) {
            self.set_visible(source.widget_visible(index));
        }
    }

    /// Selected global index, `None` before the first selection
    pub fn global_index(&self) -> Option<GlobalIndex> {
        self.index
    }

    pub fn widget_role(&self) -> Option<WidgetRole> {
        self.resolved.map(|(role, _)| role)
    }

    pub fn relative_index(&self) -> Option<RelativeIndex> {
        self.resolved.map(|(_, rel)| rel)
    }

    pub fn widget(&self) -> Option<&Widget> {
        self.instance.as_ref().map(|i| &i.widget)
    }

    /// `true` when a widget is alive and subscribed
    pub fn is_live(&self) -> bool {
        self.instance
            .as_ref()
            .is_some_and(|i| i.subscription.is_some())
    }

    pub fn subscription_id(&self) -> Option<crate::id::SubscriberId> {
        self.instance
            .as_ref()
            .and_then(|i| i.subscription.as_ref())
            .map(Subscription::id)
    }

    pub fn is_dirty(&self) -> bool {
        self.instance.as_ref().is_some_and(|i| i.dirty)
    }

    /// Clear the dirty flag of an enabled widget and hand it out for painting
    pub fn take_repaint(&mut self) -> Option<(GlobalIndex, &Widget)> {
        let index = self.index?;
        if !self.visible {
            return None;
        }
        let instance = self.instance.as_mut()?;
        if !instance.dirty {
            return None;
        }
        instance.dirty = false;
        Some((index, &instance.widget))
    }

    /// Title of the selected widget in the current table
    pub fn widget_title<'a>(&self, source: &'a dyn DashboardSource) -> &'a str {
        self.index
            .and_then(|index| WidgetTypeRegistry::new(source).widget_title(index))
            .unwrap_or(INVALID_TITLE)
    }

    /// Icon of the selected widget kind, empty before the first selection
    pub fn widget_icon(&self) -> &'static str {
        self.widget_role()
            .and_then(kind_info)
            .map_or("", |kind| kind.icon)
    }

    pub fn is_gps_map(&self) -> bool {
        self.widget().and_then(Widget::as_gps).is_some()
    }

    fn gps_position(&self) -> GpsPosition {
        self.widget()
            .and_then(Widget::as_gps)
            .map(|gps| gps.position())
            .unwrap_or_default()
    }

    pub fn gps_latitude(&self) -> f64 {
        self.gps_position().latitude
    }

    pub fn gps_longitude(&self) -> f64 {
        self.gps_position().longitude
    }

    pub fn gps_altitude(&self) -> f64 {
        self.gps_position().altitude
    }

    /// Drain queued events
    pub fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }
}
