//! Fixed-rate redraw of dirty widgets.
//!
//! Widgets only flag themselves dirty when a derived field changes. The
//! throttle consumes those flags at a fixed rate so a burst of frames costs
//! at most one repaint per widget per period.

use std::time::{Duration, Instant};

use crate::host::WidgetHost;
use crate::id::{GlobalIndex, HostId};
use crate::widgets::Widget;

/// Default repaint rate
pub const DEFAULT_REDRAW_RATE_HZ: f64 = 20.0;

/// Whatever draws widgets on screen
#[cfg_attr(test, mockall::automock)]
pub trait RenderSurface {
    fn repaint(&mut self, host: HostId, index: GlobalIndex, widget: &Widget);
}

#[derive(Debug, Clone)]
pub struct RedrawThrottle {
    period: Duration,
    last_tick: Option<Instant>,
    ticks: u64,
    repaints: u64,
}

impl RedrawThrottle {
    /// Throttle running at `rate_hz`; non-positive rates fall back to the default
    pub fn new(rate_hz: f64) -> Self {
        let rate = if rate_hz.is_finite() && rate_hz > 0.0 {
            rate_hz
        } else {
            tracing::warn!("Invalid redraw rate {}, using {} Hz", rate_hz, DEFAULT_REDRAW_RATE_HZ);
            DEFAULT_REDRAW_RATE_HZ
        };
        Self {
            period: Duration::from_nanos((1e9 / rate).round() as u64),
            last_tick: None,
            ticks: 0,
            repaints: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether a full period has passed since the last tick
    pub fn is_due(&self, now: Instant) -> bool {
        self.last_tick
            .map_or(true, |last| now.saturating_duration_since(last) >= self.period)
    }

    /// Repaint every dirty, enabled widget once and clear its flag.
    ///
    /// Returns the number of widgets repainted.
    pub fn tick(
        &mut self,
        now: Instant,
        hosts: &mut [WidgetHost],
        surface: &mut dyn RenderSurface,
    ) -> usize {
        self.last_tick = Some(now);
        self.ticks += 1;

        let mut repainted = 0;
        for host in hosts.iter_mut() {
            let id = host.id();
            if let Some((index, widget)) = host.take_repaint() {
                surface.repaint(id, index, widget);
                repainted += 1;
            }
        }

        self.repaints += repainted as u64;
        if repainted > 0 {
            tracing::trace!("Tick {} repainted {} widgets", self.ticks, repainted);
        }
        repainted
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn repaint_count(&self) -> u64 {
        self.repaints
    }
}

impl Default for RedrawThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_REDRAW_RATE_HZ)
    }
}
