//! Sample store: the dashboard's shared data model.
//!
//! The store holds the latest decoded [`Frame`], flattens it into one
//! sub-table per [`WidgetRole`] and keeps a bounded sample history for every
//! plotted and FFT series. Widgets read it through the [`DashboardSource`]
//! trait and never mutate it.
//!
//! # Versioning
//!
//! Every applied frame bumps [`SampleStore::version`]. A frame whose layout
//! differs from the current one also bumps [`SampleStore::generation`] and
//! rebuilds the sub-tables; all previously resolved indices are then
//! potentially stale.

pub mod ring;

pub use ring::SampleRing;

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::id::{GlobalIndex, RelativeIndex};
use crate::types::{AxisVisibility, Dataset, Frame, WidgetRole};

/// Smallest window the spectral analyzer works with
const MIN_FFT_WINDOW: usize = 8;

/// Default history length for time plots
pub const DEFAULT_PLOT_POINTS: usize = 100;

/// Read-only view of the dashboard data consumed by widgets.
pub trait DashboardSource {
    /// Number of entries in the role's sub-table
    fn group_count(&self, role: WidgetRole) -> usize;

    /// Number of datasets behind one sub-table entry (0 when out of range)
    fn dataset_count(&self, role: WidgetRole, index: RelativeIndex) -> usize;

    /// One dataset of a sub-table entry
    fn dataset(&self, role: WidgetRole, index: RelativeIndex, dataset: usize) -> Option<&Dataset>;

    /// Title of a sub-table entry (group title or dataset title)
    fn group_title(&self, role: WidgetRole, index: RelativeIndex) -> Option<&str>;

    /// Shared decimal precision for numeric values
    fn precision(&self) -> usize;

    /// Axis visibility option for plotting widgets
    fn axis_visibility(&self) -> AxisVisibility;

    /// Sample history of one dataset of a plotted entry
    fn series(&self, role: WidgetRole, index: RelativeIndex, dataset: usize) -> Option<&SampleRing>;

    /// Whether the dashboard wants the widget at `index` shown
    fn widget_visible(&self, index: GlobalIndex) -> bool;

    /// Raw sample window of an FFT entry
    fn samples_for_fft(&self, index: RelativeIndex) -> Option<&SampleRing> {
        self.series(WidgetRole::Fft, index, 0)
    }
}

/// Outcome of applying a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameChange {
    /// Same layout, new values
    ValuesUpdated,
    /// Different layout; sub-tables rebuilt
    Reconfigured,
}

/// Location of a sub-table entry inside the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TableEntry {
    group: usize,
    /// `Some` for dataset-level roles
    dataset: Option<usize>,
}

/// In-memory implementation of [`DashboardSource`]
#[derive(Debug, Clone)]
pub struct SampleStore {
    frame: Frame,
    tables: HashMap<WidgetRole, Vec<TableEntry>>,
    series: HashMap<(WidgetRole, usize), Vec<SampleRing>>,
    hidden: HashSet<GlobalIndex>,
    precision: usize,
    axis_visibility: AxisVisibility,
    plot_points: usize,
    version: u64,
    generation: u64,
    last_update: Option<DateTime<Utc>>,
}

impl Default for SampleStore {
    fn default() -> Self {
        Self::new(2, DEFAULT_PLOT_POINTS)
    }
}

impl SampleStore {
    pub fn new(precision: usize, plot_points: usize) -> Self {
        Self {
            frame: Frame::default(),
            tables: HashMap::new(),
            series: HashMap::new(),
            hidden: HashSet::new(),
            precision,
            axis_visibility: AxisVisibility::default(),
            plot_points,
            version: 0,
            generation: 0,
            last_update: None,
        }
    }

    /// Apply one decoded frame.
    pub fn apply_frame(&mut self, frame: Frame) -> FrameChange {
        let change = if self.version > 0 && self.frame.same_layout(&frame) {
            FrameChange::ValuesUpdated
        } else {
            FrameChange::Reconfigured
        };

        self.frame = frame;
        if change == FrameChange::Reconfigured {
            self.rebuild_tables();
        }
        self.record_samples();

        self.version += 1;
        self.last_update = Some(Utc::now());
        tracing::trace!(
            "Applied frame v{} ({:?}, generation {})",
            self.version,
            change,
            self.generation
        );
        change
    }

    fn rebuild_tables(&mut self) {
        self.tables.clear();
        self.series.clear();
        self.hidden.clear();

        for (g, group) in self.frame.groups.iter().enumerate() {
            if let Some(role) = group.widget.role() {
                self.tables.entry(role).or_default().push(TableEntry {
                    group: g,
                    dataset: None,
                });
            }

            for (d, dataset) in group.datasets.iter().enumerate() {
                let entry = TableEntry {
                    group: g,
                    dataset: Some(d),
                };
                if dataset.fft {
                    self.tables.entry(WidgetRole::Fft).or_default().push(entry);
                }
                if dataset.graph {
                    self.tables.entry(WidgetRole::Plot).or_default().push(entry);
                }
                if let Some(role) = dataset.widget.role() {
                    self.tables.entry(role).or_default().push(entry);
                }
            }
        }

        for (role, entries) in &self.tables {
            let rings_for = |entry: &TableEntry| -> Option<Vec<SampleRing>> {
                match role {
                    WidgetRole::Plot => Some(vec![SampleRing::new(self.plot_points)]),
                    WidgetRole::MultiPlot => Some(
                        self.frame.groups[entry.group]
                            .datasets
                            .iter()
                            .map(|_| SampleRing::new(self.plot_points))
                            .collect(),
                    ),
                    WidgetRole::Fft => {
                        let dataset = &self.frame.groups[entry.group].datasets[entry.dataset?];
                        Some(vec![SampleRing::new(dataset.fft_samples.max(MIN_FFT_WINDOW))])
                    }
                    _ => None,
                }
            };

            for (i, entry) in entries.iter().enumerate() {
                if let Some(rings) = rings_for(entry) {
                    self.series.insert((*role, i), rings);
                }
            }
        }

        self.generation += 1;
        tracing::debug!(
            "Rebuilt widget table (generation {}, {} roles)",
            self.generation,
            self.tables.len()
        );
    }

    fn record_samples(&mut self) {
        for ((role, i), rings) in self.series.iter_mut() {
            let Some(entry) = self.tables.get(role).and_then(|t| t.get(*i)) else {
                continue;
            };
            let group = &self.frame.groups[entry.group];

            match entry.dataset {
                Some(d) => {
                    let value = group.datasets[d].value.as_number();
                    if let (Some(ring), Some(v)) = (rings.first_mut(), value) {
                        ring.push(v);
                    }
                }
                None => {
                    for (ring, dataset) in rings.iter_mut().zip(&group.datasets) {
                        if let Some(v) = dataset.value.as_number() {
                            ring.push(v);
                        }
                    }
                }
            }
        }
    }

    fn entry(&self, role: WidgetRole, index: RelativeIndex) -> Option<&TableEntry> {
        self.tables.get(&role).and_then(|t| t.get(index.index()))
    }

    /// The most recently applied frame
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Number of frames applied so far
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of table rebuilds so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wall-clock time of the last applied frame
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Returns `true` when the value changed
    pub fn set_precision(&mut self, precision: usize) -> bool {
        let changed = self.precision != precision;
        self.precision = precision;
        changed
    }

    /// Returns `true` when the value changed
    pub fn set_axis_visibility(&mut self, visibility: AxisVisibility) -> bool {
        let changed = self.axis_visibility != visibility;
        self.axis_visibility = visibility;
        changed
    }

    /// Returns `true` when the value changed
    pub fn set_widget_visible(&mut self, index: GlobalIndex, visible: bool) -> bool {
        if visible {
            self.hidden.remove(&index)
        } else {
            self.hidden.insert(index)
        }
    }

    /// Title of the whole frame
    pub fn title(&self) -> &str {
        &self.frame.title
    }
}

impl DashboardSource for SampleStore {
    fn group_count(&self, role: WidgetRole) -> usize {
        self.tables.get(&role).map_or(0, Vec::len)
    }

    fn dataset_count(&self, role: WidgetRole, index: RelativeIndex) -> usize {
        match self.entry(role, index) {
            Some(TableEntry { dataset: Some(_), .. }) => 1,
            Some(TableEntry { group, dataset: None }) => self.frame.groups[*group].datasets.len(),
            None => 0,
        }
    }

    fn dataset(&self, role: WidgetRole, index: RelativeIndex, dataset: usize) -> Option<&Dataset> {
        let entry = self.entry(role, index)?;
        let group = self.frame.groups.get(entry.group)?;
        match entry.dataset {
            Some(d) if dataset == 0 => group.datasets.get(d),
            Some(_) => None,
            None => group.datasets.get(dataset),
        }
    }

    fn group_title(&self, role: WidgetRole, index: RelativeIndex) -> Option<&str> {
        let entry = self.entry(role, index)?;
        let group = self.frame.groups.get(entry.group)?;
        match entry.dataset {
            Some(d) => group.datasets.get(d).map(|ds| ds.title.as_str()),
            None => Some(group.title.as_str()),
        }
    }

    fn precision(&self) -> usize {
        self.precision
    }

    fn axis_visibility(&self) -> AxisVisibility {
        self.axis_visibility
    }

    fn series(
        &self,
        role: WidgetRole,
        index: RelativeIndex,
        dataset: usize,
    ) -> Option<&SampleRing> {
        self.series.get(&(role, index.index()))?.get(dataset)
    }

    fn widget_visible(&self, index: GlobalIndex) -> bool {
        !self.hidden.contains(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dataset, DatasetWidget, Group, GroupWidget};

    fn sample_frame(x: f64) -> Frame {
        Frame::new("Bench")
            .with_group(
                Group::new("Environment", GroupWidget::DataGrid)
                    .with_dataset(Dataset::new("Temp", x).with_widget(DatasetWidget::Bar))
                    .with_dataset(Dataset::new("Status", "OK")),
            )
            .with_group(
                Group::new("Signal", GroupWidget::MultiPlot)
                    .with_dataset(Dataset::new("A", x).with_fft(16, 100.0).with_graph())
                    .with_dataset(Dataset::new("B", -x)),
            )
    }

    #[test]
    fn test_sub_tables() {
        let mut store = SampleStore::default();
        assert_eq!(store.apply_frame(sample_frame(1.0)), FrameChange::Reconfigured);

        assert_eq!(store.group_count(WidgetRole::DataGrid), 1);
        assert_eq!(store.group_count(WidgetRole::MultiPlot), 1);
        assert_eq!(store.group_count(WidgetRole::Bar), 1);
        assert_eq!(store.group_count(WidgetRole::Fft), 1);
        assert_eq!(store.group_count(WidgetRole::Plot), 1);
        assert_eq!(store.group_count(WidgetRole::Gauge), 0);

        assert_eq!(store.dataset_count(WidgetRole::DataGrid, RelativeIndex(0)), 2);
        assert_eq!(store.dataset_count(WidgetRole::Bar, RelativeIndex(0)), 1);
        assert_eq!(store.dataset_count(WidgetRole::Bar, RelativeIndex(1)), 0);

        let bar = store.dataset(WidgetRole::Bar, RelativeIndex(0), 0).unwrap();
        assert_eq!(bar.title, "Temp");
        assert!(store.dataset(WidgetRole::Bar, RelativeIndex(0), 1).is_none());
        assert_eq!(store.group_title(WidgetRole::MultiPlot, RelativeIndex(0)), Some("Signal"));
        assert_eq!(store.group_title(WidgetRole::Fft, RelativeIndex(0)), Some("A"));
    }

    #[test]
    fn test_values_update_keeps_generation() {
        let mut store = SampleStore::default();
        store.apply_frame(sample_frame(1.0));
        assert_eq!(store.apply_frame(sample_frame(2.0)), FrameChange::ValuesUpdated);
        assert_eq!(store.generation(), 1);
        assert_eq!(store.version(), 2);
        assert!(store.last_update().is_some());
    }

    #[test]
    fn test_series_history() {
        let mut store = SampleStore::new(2, 4);
        for i in 0..6 {
            store.apply_frame(sample_frame(i as f64));
        }

        let plot = store.series(WidgetRole::Plot, RelativeIndex(0), 0).unwrap();
        assert_eq!(plot.iter().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0, 5.0]);

        let b = store.series(WidgetRole::MultiPlot, RelativeIndex(0), 1).unwrap();
        assert_eq!(b.iter().last(), Some(-5.0));

        let fft = store.samples_for_fft(RelativeIndex(0)).unwrap();
        assert_eq!(fft.capacity(), 16);
        assert_eq!(fft.len(), 6);
    }

    #[test]
    fn test_reconfigure_clears_history_and_visibility() {
        let mut store = SampleStore::default();
        store.apply_frame(sample_frame(1.0));
        store.set_widget_visible(GlobalIndex(0), false);
        assert!(!store.widget_visible(GlobalIndex(0)));

        let smaller = Frame::new("Bench").with_group(Group::new("Only", GroupWidget::Led));
        assert_eq!(store.apply_frame(smaller), FrameChange::Reconfigured);
        assert!(store.widget_visible(GlobalIndex(0)));
        assert_eq!(store.group_count(WidgetRole::Fft), 0);
        assert!(store.samples_for_fft(RelativeIndex(0)).is_none());
    }

    #[test]
    fn test_sampling_rate_change_reconfigures() {
        let mut store = SampleStore::default();
        store.apply_frame(sample_frame(1.0));
        assert_eq!(store.apply_frame(sample_frame(2.0)), FrameChange::ValuesUpdated);

        let mut resampled = sample_frame(3.0);
        resampled.groups[1].datasets[0].fft_sampling_rate = 400.0;
        assert_eq!(store.apply_frame(resampled), FrameChange::Reconfigured);
        assert_eq!(store.samples_for_fft(RelativeIndex(0)).unwrap().len(), 1);
    }

    #[test]
    fn test_text_values_are_not_sampled() {
        let frame = Frame::new("f").with_group(
            Group::new("g", GroupWidget::None).with_dataset(Dataset::new("s", "n/a").with_graph()),
        );
        let mut store = SampleStore::default();
        store.apply_frame(frame);
        assert!(store.series(WidgetRole::Plot, RelativeIndex(0), 0).unwrap().is_empty());
    }

    #[test]
    fn test_setters_report_changes() {
        let mut store = SampleStore::default();
        assert!(!store.set_precision(2));
        assert!(store.set_precision(4));
        assert!(store.set_axis_visibility(AxisVisibility::XOnly));
        assert!(!store.set_axis_visibility(AxisVisibility::XOnly));
        assert!(store.set_widget_visible(GlobalIndex(3), false));
        assert!(!store.set_widget_visible(GlobalIndex(3), false));
        assert!(store.set_widget_visible(GlobalIndex(3), true));
    }
}
