use livedash::*;

fn assert_send<T: Send>() {}

#[test]
fn sink_is_send_and_clone() {
    assert_send::<DashboardSink>();
    assert_send::<DashboardCommand>();
    let (sink, _rx) = channel_dashboard();
    let _other = sink.clone();
}

#[test]
fn commands_apply_in_arrival_order() {
    let (sink, rx) = channel_dashboard();
    let t = SignalRef::new("t", 0);
    let v = SignalRef::new("v", 0);

    // Ids start at 1 for a fresh dashboard.
    let first = PlotId(1);
    sink.add_plot(PlotKind::Line, -1).unwrap();
    sink.add_channel(first, v.clone(), Some(t.clone())).unwrap();
    for k in 0..4 {
        let k = k as f64;
        sink.send_batch(
            SampleBatch::new()
                .with("t", vec![vec![k]])
                .with("v", vec![vec![k + 10.0]]),
        )
        .unwrap();
    }
    sink.remove_plot(7).unwrap();

    let mut dash: Dashboard = Dashboard::default();
    let errors = dash.drain(&rx);

    assert_eq!(errors, vec![PlotError::IndexOutOfRange { index: 7, len: 1 }]);
    assert_eq!(dash.ids(), vec![first]);
    let line = dash.plot(0).and_then(Plot::as_line).unwrap();
    let xs: Vec<f64> = line.series()[0].points().iter().map(|p| p[0]).collect();
    assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn producers_on_other_threads() {
    let (sink, rx) = channel_dashboard();
    sink.add_plot(PlotKind::Bar, -1).unwrap();
    sink.add_channel(PlotId(1), SignalRef::new("v", 0), None).unwrap();

    let producer = {
        let sink = sink.clone();
        std::thread::spawn(move || {
            for k in 0..5 {
                sink.send_batch(SampleBatch::new().with("v", vec![vec![k as f64]])).unwrap();
            }
        })
    };
    producer.join().unwrap();

    let mut dash: Dashboard = Dashboard::default();
    assert!(dash.drain(&rx).is_empty());
    let bar = dash.plot(0).and_then(Plot::as_bar).unwrap();
    assert_eq!(bar.values(), &[4.0]);
}

#[test]
fn option_and_layout_commands() {
    let (sink, rx) = channel_dashboard();
    let mut options = SpectrogramOptions::default();
    options.bin_count = 4;
    sink.add_plot_with_options(PlotOptions::Spectrogram(options.clone()), -1).unwrap();
    options.n_visible_windows = 10;
    sink.apply_options(PlotId(1), PlotOptions::Spectrogram(options)).unwrap();
    sink.apply_options(PlotId(1), PlotOptions::default_for(PlotKind::Line)).unwrap();
    sink.set_layout(LayoutMode::Fixed {
        rows: 2,
        columns: 2,
    })
    .unwrap();

    let mut dash: Dashboard = Dashboard::default();
    let errors = dash.drain(&rx);
    assert!(matches!(errors.as_slice(), [PlotError::KindMismatch { .. }]));
    let spec = dash.plot(0).and_then(Plot::as_spectrogram).unwrap();
    assert_eq!(spec.shape(), (4, 10));
    assert_eq!(
        dash.layout_mode(),
        LayoutMode::Fixed {
            rows: 2,
            columns: 2
        }
    );
    assert_eq!(dash.rects()[0], Rect::new(0.0, 0.0, 0.5, 0.5));
}

#[test]
fn sending_after_the_receiver_is_gone_fails() {
    let (sink, rx) = channel_dashboard();
    drop(rx);
    assert!(sink.send_batch(SampleBatch::new()).is_err());
}
