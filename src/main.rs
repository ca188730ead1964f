//! DashVis - Main Entry Point
//!
//! Runs the dashboard core against a synthetic telemetry producer and logs
//! every repaint. Set `DASHVIS_FRAMES` to bound the number of generated
//! frames (default 1000).

use std::time::{Duration, Instant};

use anyhow::Context;
use crossbeam_channel::select;
use dashvis_rs::{
    bridge::{frame_channel, FrameMessage, FrameSender},
    config::{self, AppState, DashboardConfig},
    types::{DatasetWidget, GroupWidget},
    Dashboard, Dataset, Frame, GlobalIndex, Group, HostEvent, HostId, RenderSurface, Widget,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FRAME_LIMIT: u64 = 1_000;

/// Surface that only records what would be drawn
#[derive(Default)]
struct LogSurface {
    repaints: u64,
}

impl RenderSurface for LogSurface {
    fn repaint(&mut self, host: HostId, index: GlobalIndex, widget: &Widget) {
        self.repaints += 1;
        tracing::trace!("{:?} repaint {} ({})", host, index, widget.role());
    }
}

fn main() -> anyhow::Result<()> {
    // Console logging, plus a daily log file when the data directory is usable
    let (file_writer, _log_guard) = match config::ensure_app_data_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "dashvis.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        Err(_) => (None, None),
    };
    let file_layer = file_writer.map(|writer| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer)
    });
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,dashvis_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    tracing::info!("Starting DashVis");

    let config = DashboardConfig::load_or_default();
    let mut app_state = AppState::load_or_default();
    let frame_limit = std::env::var("DASHVIS_FRAMES")
        .ok()
        .map(|v| v.parse::<u64>())
        .transpose()
        .context("DASHVIS_FRAMES must be a frame count")?
        .unwrap_or(DEFAULT_FRAME_LIMIT);

    let mut dashboard = Dashboard::new(&config);
    if let Some(theme) = app_state.last_theme.as_deref() {
        dashboard.set_theme(dashvis_rs::ThemeProvider::from_name_or_path(theme).theme().clone());
    }

    let (tx, rx) = frame_channel();
    let producer_config = config.clone();
    let producer = std::thread::Builder::new()
        .name("producer".to_string())
        .spawn(move || produce(tx, &producer_config, frame_limit))
        .context("Failed to spawn producer thread")?;

    let ticker = crossbeam_channel::tick(dashboard.throttle().period());
    let mut surface = LogSurface::default();
    let mut hosts: Vec<HostId> = Vec::new();

    loop {
        let mut stop = false;
        select! {
            recv(rx.channel()) -> msg => {
                match msg {
                    Ok(FrameMessage::Frame(frame)) => {
                        dashboard.ingest(frame);
                        stop = dashboard.process_incoming(&rx).shutdown;
                    }
                    Ok(FrameMessage::Shutdown) | Err(_) => stop = true,
                }
                if hosts.is_empty() {
                    hosts = populate_hosts(&mut dashboard, &app_state.last_indices);
                }
            }
            recv(ticker) -> _ => {
                dashboard.tick(Instant::now(), &mut surface);
            }
        }

        for (host, event) in dashboard.take_events() {
            match event {
                HostEvent::GpsDataChanged(pos) => {
                    tracing::trace!("{:?} GPS {:.5}, {:.5}", host, pos.latitude, pos.longitude)
                }
                other => tracing::debug!("{:?} {:?}", host, other),
            }
        }
        if stop {
            break;
        }
    }

    dashboard.tick(Instant::now(), &mut surface);
    tracing::info!(
        "Shutting down after {} frames, {} repaints",
        dashboard.store().version(),
        surface.repaints
    );

    if producer.join().is_err() {
        tracing::warn!("Producer thread panicked");
    }

    app_state.last_theme = Some(dashboard.theme().theme().name.clone());
    app_state.last_indices = hosts
        .iter()
        .filter_map(|id| dashboard.host(*id).and_then(|h| h.global_index()))
        .collect();
    if let Err(e) = app_state.save() {
        tracing::warn!("Failed to save app state: {}", e);
    }

    Ok(())
}

/// One host per widget, restoring the previous selection where it still fits
fn populate_hosts(dashboard: &mut Dashboard, last_indices: &[GlobalIndex]) -> Vec<HostId> {
    let count = dashboard.total_widget_count();
    (0..count)
        .map(|i| {
            let id = dashboard.add_host();
            let index = last_indices
                .get(i)
                .copied()
                .filter(|index| index.index() < count)
                .unwrap_or(GlobalIndex(i));
            dashboard.set_global_index(id, index);
            id
        })
        .collect()
}

fn produce(tx: FrameSender, config: &DashboardConfig, limit: u64) {
    let period = Duration::from_secs_f64(1.0 / config.default_sampling_rate);
    for n in 0..limit {
        let t = n as f64 / config.default_sampling_rate;
        if tx.send(demo_frame(t, config)).is_err() {
            tracing::debug!("Dashboard went away, stopping producer");
            return;
        }
        std::thread::sleep(period);
    }
    tx.shutdown();
}

fn demo_frame(t: f64, config: &DashboardConfig) -> Frame {
    use std::f64::consts::TAU;

    let wave = (TAU * 2.0 * t).sin();
    Frame::new("Demo Rig")
        .with_group(
            Group::new("Environment", GroupWidget::DataGrid)
                .with_dataset(
                    Dataset::new("Temperature", 21.0 + wave)
                        .with_units("°C")
                        .with_alarm(30.0)
                        .with_widget(DatasetWidget::Bar)
                        .with_scale(-10.0, 50.0),
                )
                .with_dataset(
                    Dataset::new("Humidity", 45.0 + 5.0 * wave)
                        .with_units("%")
                        .with_palette_index(1)
                        .with_widget(DatasetWidget::Gauge),
                )
                .with_dataset(Dataset::new("Status", if wave > 0.0 { "OK" } else { "IDLE" })),
        )
        .with_group(
            Group::new("Signal", GroupWidget::MultiPlot)
                .with_dataset(
                    Dataset::new("Tone", (TAU * 12.5 * t).sin() + 0.3 * (TAU * 30.0 * t).sin())
                        .with_fft(config.default_fft_samples, config.default_sampling_rate)
                        .with_graph(),
                )
                .with_dataset(Dataset::new("Envelope", wave.abs()).with_palette_index(2)),
        )
        .with_group(
            Group::new("Navigation", GroupWidget::Gps)
                .with_dataset(Dataset::new("Latitude", 48.8566 + 0.001 * t))
                .with_dataset(Dataset::new("Longitude", 2.3522 + 0.001 * wave))
                .with_dataset(Dataset::new("Altitude", 35.0)),
        )
        .with_group(
            Group::new("Heading", GroupWidget::None).with_dataset(
                Dataset::new("Bearing", (t * 10.0) % 360.0).with_widget(DatasetWidget::Compass),
            ),
        )
        .with_group(
            Group::new("IMU", GroupWidget::Accelerometer)
                .with_dataset(Dataset::new("X", 0.1 * wave).with_units("g"))
                .with_dataset(Dataset::new("Y", -0.1 * wave).with_units("g"))
                .with_dataset(Dataset::new("Z", 1.0).with_units("g")),
        )
        .with_group(
            Group::new("Rates", GroupWidget::Gyroscope)
                .with_dataset(Dataset::new("Roll", 5.0 * wave).with_units("°/s"))
                .with_dataset(Dataset::new("Pitch", 0.0).with_units("°/s"))
                .with_dataset(Dataset::new("Yaw", 1.5).with_units("°/s")),
        )
        .with_group(
            Group::new("Flags", GroupWidget::Led)
                .with_dataset(Dataset::new("Armed", 1.0))
                .with_dataset(Dataset::new("Overheat", 21.0 + wave).with_alarm(22.5)),
        )
}
