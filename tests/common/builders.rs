//! Test data builders for creating frames

use dashvis_rs::types::{DatasetWidget, GroupWidget};
use dashvis_rs::{Dataset, Frame, Group};

/// Builder for a frame covering most widget kinds.
///
/// Global indices of the resulting table, in role order:
/// 0 data grid, 1 plot, 2 bar, 3 gauge, 4 compass, 5 accelerometer,
/// 6 GPS, 7 LED panel.
pub struct RigFrameBuilder {
    value: f64,
    heading: f64,
    with_gps: bool,
}

impl RigFrameBuilder {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            heading: 0.0,
            with_gps: true,
        }
    }

    pub fn heading(mut self, heading: f64) -> Self {
        self.heading = heading;
        self
    }

    pub fn without_gps(mut self) -> Self {
        self.with_gps = false;
        self
    }

    pub fn build(self) -> Frame {
        let v = self.value;
        let mut frame = Frame::new("Rig")
            .with_group(
                Group::new("Power", GroupWidget::DataGrid)
                    .with_dataset(
                        Dataset::new("Voltage", v)
                            .with_units("V")
                            .with_alarm(12.0)
                            .with_widget(DatasetWidget::Bar)
                            .with_graph(),
                    )
                    .with_dataset(
                        Dataset::new("Current", v / 2.0)
                            .with_units("A")
                            .with_palette_index(1)
                            .with_widget(DatasetWidget::Gauge),
                    ),
            )
            .with_group(
                Group::new("Heading", GroupWidget::None).with_dataset(
                    Dataset::new("Bearing", self.heading).with_widget(DatasetWidget::Compass),
                ),
            )
            .with_group(
                Group::new("IMU", GroupWidget::Accelerometer)
                    .with_dataset(Dataset::new("X", 0.0))
                    .with_dataset(Dataset::new("Y", 0.0))
                    .with_dataset(Dataset::new("Z", 1.0)),
            );

        if self.with_gps {
            frame = frame.with_group(
                Group::new("Fix", GroupWidget::Gps)
                    .with_dataset(Dataset::new("Lat", 10.0 + v))
                    .with_dataset(Dataset::new("Lon", 20.0 + v))
                    .with_dataset(Dataset::new("Alt", 30.0)),
            );
        }

        frame.with_group(
            Group::new("Flags", GroupWidget::Led)
                .with_dataset(Dataset::new("Armed", 1.0))
                .with_dataset(Dataset::new("Hot", v).with_alarm(12.0)),
        )
    }
}

/// Single FFT dataset carrying `value`
pub fn tone_frame(value: f64, samples: usize, sampling_rate: f64) -> Frame {
    Frame::new("Tone").with_group(
        Group::new("Signal", GroupWidget::None)
            .with_dataset(Dataset::new("Tone", value).with_fft(samples, sampling_rate)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rig_builder() {
        let frame = RigFrameBuilder::new(1.0).without_gps().build();
        assert_eq!(frame.groups.len(), 4);
        assert_eq!(frame.groups[0].datasets[0].title, "Voltage");
    }
}
