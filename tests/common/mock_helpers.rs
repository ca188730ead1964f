//! Render surfaces for observing repaints

use dashvis_rs::{GlobalIndex, HostId, RenderSurface, Widget, WidgetRole};

/// Surface that records every repaint it is asked for
#[derive(Default)]
pub struct RecordingSurface {
    pub repaints: Vec<(HostId, GlobalIndex, WidgetRole)>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the repaints recorded so far
    pub fn take(&mut self) -> Vec<(HostId, GlobalIndex, WidgetRole)> {
        std::mem::take(&mut self.repaints)
    }

    pub fn hosts(&self) -> Vec<HostId> {
        self.repaints.iter().map(|(host, _, _)| *host).collect()
    }
}

impl RenderSurface for RecordingSurface {
    fn repaint(&mut self, host: HostId, index: GlobalIndex, widget: &Widget) {
        self.repaints.push((host, index, widget.role()));
    }
}
