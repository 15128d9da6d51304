//! Demo: a synthetic signal generator feeding one plot of each kind.
//!
//! Run with `cargo run --bin livedash-demo [config.yaml|config.json]`.

use std::f64::consts::TAU;
use std::time::Duration;

use livedash::{
    channel_dashboard, run_dashboard, BarOptions, DashboardConfig, DashboardSink, LineOptions,
    PlotOptions, SampleBatch, SignalRef, SpectrogramOptions, TraceOptions,
};

const SAMPLES_PER_BATCH: usize = 4;
const SAMPLE_PERIOD: f64 = 0.005;
const SPECTRUM_BINS: usize = 16;

fn demo_config() -> DashboardConfig {
    let ts = SignalRef::new("timestamp", 0);
    let sin = SignalRef::new("sig", 0).with_name("sin");
    let cos = SignalRef::new("sig", 1).with_name("cos");
    let saw = SignalRef::new("sig", 2).with_name("saw");

    let mut line = LineOptions::default();
    line.base.description = "sin / cos over time".into();
    line.base.sig_x = vec![ts];
    line.base.sig_y = vec![sin.clone(), cos.clone()];

    let mut trace = TraceOptions::default();
    trace.base.description = "cos vs sin".into();
    trace.base.sig_x = vec![sin.clone()];
    trace.base.sig_y = vec![cos.clone()];

    let mut bar = BarOptions::default();
    bar.base.description = "latest values".into();
    bar.base.sig_y = vec![sin, cos, saw];
    bar.auto_range = false;
    bar.y_domain_min = -1.0;
    bar.y_domain_max = 1.0;

    let mut spectrogram = SpectrogramOptions::default();
    spectrogram.base.description = "spectrum".into();
    spectrogram.base.sig_y = vec![SignalRef::new("spectrum", 0)];
    spectrogram.bin_count = SPECTRUM_BINS;

    DashboardConfig {
        title: "livedash demo".into(),
        plots: vec![
            PlotOptions::Line(line),
            PlotOptions::Trace(trace),
            PlotOptions::Bar(bar),
            PlotOptions::Spectrogram(spectrogram),
        ],
        ..DashboardConfig::default()
    }
}

fn batch_at(t0: f64) -> SampleBatch {
    let ts: Vec<f64> = (0..SAMPLES_PER_BATCH)
        .map(|i| t0 + i as f64 * SAMPLE_PERIOD)
        .collect();
    let sin = ts.iter().map(|t| (TAU * 0.5 * t).sin()).collect();
    let cos = ts.iter().map(|t| (TAU * 0.5 * t).cos()).collect();
    let saw = ts.iter().map(|t| 2.0 * (t * 0.25).fract() - 1.0).collect();
    // A peak sweeping through the bins.
    let peak = (0.5 + 0.5 * (TAU * 0.1 * t0).sin()) * (SPECTRUM_BINS - 1) as f64;
    let spectrum = (0..SPECTRUM_BINS)
        .map(|bin| {
            ts.iter()
                .map(|_| (-(bin as f64 - peak).powi(2) / 4.0).exp())
                .collect()
        })
        .collect();
    SampleBatch::new()
        .with("timestamp", vec![ts])
        .with("sig", vec![sin, cos, saw])
        .with("spectrum", spectrum)
}

fn spawn_generator(sink: DashboardSink) {
    std::thread::spawn(move || {
        let mut t = 0.0;
        loop {
            if sink.send_batch(batch_at(t)).is_err() {
                log::info!("dashboard closed, stopping generator");
                break;
            }
            t += SAMPLES_PER_BATCH as f64 * SAMPLE_PERIOD;
            std::thread::sleep(Duration::from_millis(20));
        }
    });
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match DashboardConfig::load(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::error!("{e}; using the built-in demo layout");
                demo_config()
            }
        },
        None => demo_config(),
    };

    let (sink, rx) = channel_dashboard();
    spawn_generator(sink);
    run_dashboard(rx, config)
}
