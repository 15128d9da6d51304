use std::cell::RefCell;
use std::rc::Rc;

use livedash::plots::PlotVariant;
use livedash::surface::SharedSurface;
use livedash::*;

fn x(i: usize) -> SignalRef {
    SignalRef::new("x", i)
}

fn y(i: usize) -> SignalRef {
    SignalRef::new("y", i)
}

fn xy(xs: &[f64], ys: &[f64]) -> SampleBatch {
    SampleBatch::new()
        .with("x", vec![xs.to_vec()])
        .with("y", vec![ys.to_vec()])
}

fn trace_options(n_visible_points: usize) -> TraceOptions {
    let mut options = TraceOptions::default();
    options.base.sig_x = vec![x(0)];
    options.base.sig_y = vec![y(0)];
    options.n_visible_points = n_visible_points;
    options
}

#[test]
fn buffer_keeps_only_the_newest_points() {
    let mut dash: Dashboard = Dashboard::default();
    let id = dash.add_plot(PlotKind::Trace, -1).unwrap();
    dash.apply_options(id, PlotOptions::Trace(trace_options(2))).unwrap();

    for i in 0..3 {
        let v = i as f64;
        dash.update(&xy(&[v], &[10.0 * v])).unwrap();
    }

    let trace = dash.plot(0).and_then(Plot::as_trace).unwrap();
    assert_eq!(trace.series()[0].points(), &[[1.0, 10.0], [2.0, 20.0]]);
}

#[test]
fn steady_state_length_equals_window() {
    let surface: SharedSurface = Rc::new(RefCell::new(Scene::default()));
    let mut plot = TracePlot::new(&surface, trace_options(3)).unwrap();

    plot.update(&xy(&[0.0, 1.0], &[0.0, 1.0])).unwrap();
    assert_eq!(plot.series()[0].points().len(), 2);

    plot.update(&xy(&[2.0, 3.0, 4.0, 5.0, 6.0], &[2.0, 3.0, 4.0, 5.0, 6.0])).unwrap();
    assert_eq!(plot.series()[0].points(), &[[4.0, 4.0], [5.0, 5.0], [6.0, 6.0]]);

    for _ in 0..10 {
        plot.update(&xy(&[1.0], &[1.0])).unwrap();
        assert!(plot.series()[0].points().len() <= 3);
    }
    assert_eq!(plot.series()[0].points().len(), 3);
}

#[test]
fn pairs_are_index_aligned() {
    let mut options = TraceOptions::default();
    options.base.sig_x = vec![x(0), x(1)];
    options.base.sig_y = vec![y(1), y(0)];
    let surface: SharedSurface = Rc::new(RefCell::new(Scene::default()));
    let mut plot = TracePlot::new(&surface, options).unwrap();

    let batch = SampleBatch::new()
        .with("x", vec![vec![1.0], vec![2.0]])
        .with("y", vec![vec![3.0], vec![4.0]]);
    plot.update(&batch).unwrap();

    assert_eq!(plot.series()[0].points(), &[[1.0, 4.0]]);
    assert_eq!(plot.series()[1].points(), &[[2.0, 3.0]]);
}

#[test]
fn channel_edits_need_an_x_reference() {
    let surface: SharedSurface = Rc::new(RefCell::new(Scene::default()));
    let mut plot = TracePlot::new(&surface, trace_options(10)).unwrap();

    assert_eq!(
        plot.add_plot_channel(y(1), None),
        Err(PlotError::MissingXChannel(PlotKind::Trace))
    );
    assert_eq!(
        plot.add_plot_channel(y(0), Some(x(0))),
        Err(PlotError::DuplicateChannel(y(0)))
    );

    // Same y against a different x is a new pair.
    plot.add_plot_channel(y(0), Some(x(1))).unwrap();
    assert_eq!(plot.series().len(), 2);
    assert_eq!(plot.options().base.sig_x, vec![x(0), x(1)]);

    assert_eq!(
        plot.remove_plot_channel(&y(0), Some(&x(5))),
        Err(PlotError::ChannelNotFound(y(0)))
    );
    plot.remove_plot_channel(&y(0), Some(&x(1))).unwrap();
    assert_eq!(plot.options().base.sig_x, vec![x(0)]);
    assert_eq!(plot.options().base.sig_y, vec![y(0)]);
}

#[test]
fn shrinking_the_window_trims_existing_buffers() {
    let surface: SharedSurface = Rc::new(RefCell::new(Scene::default()));
    let mut plot = TracePlot::new(&surface, trace_options(10)).unwrap();
    plot.update(&xy(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 2.0, 3.0])).unwrap();

    plot.update_all_options(trace_options(2)).unwrap();
    assert_eq!(plot.series()[0].points(), &[[2.0, 2.0], [3.0, 3.0]]);
}

#[test]
fn renamed_channels_update_the_series_label() {
    let scene = Rc::new(RefCell::new(Scene::default()));
    let surface: SharedSurface = scene.clone();
    let mut plot = TracePlot::new(&surface, trace_options(5)).unwrap();
    plot.update(&xy(&[1.0], &[2.0])).unwrap();

    let mut options = trace_options(5);
    options.base.sig_y = vec![y(0).with_name("height")];
    options.base.data_contains_nan = true;
    plot.update_all_options(options).unwrap();

    assert_eq!(plot.series()[0].points(), &[[1.0, 2.0]]);
    assert_eq!(plot.series()[0].sig_y.display_name(), "height");

    let scene = scene.borrow();
    let (_, drawn) = scene.series_in(plot.core().region()).next().unwrap();
    assert_eq!(drawn.spec.name, "height vs x_0");
    assert!(drawn.spec.contains_nan);
}
