use std::cell::RefCell;
use std::rc::Rc;

use livedash::plots::PlotVariant;
use livedash::surface::{DrawingSurface, SharedSurface};
use livedash::*;

fn spectrum() -> SignalRef {
    SignalRef::new("spectrum", 0)
}

fn options(bins: usize, windows: usize) -> SpectrogramOptions {
    let mut o = SpectrogramOptions::default();
    o.base.sig_y = vec![spectrum()];
    o.bin_count = bins;
    o.n_visible_windows = windows;
    o
}

fn rows_batch(rows: &[&[f64]]) -> SampleBatch {
    SampleBatch::new().with("spectrum", rows.iter().map(|r| r.to_vec()).collect())
}

fn assert_shape(plot: &SpectrogramPlot, bins: usize, windows: usize) {
    assert_eq!(plot.shape(), (bins, windows));
    assert_eq!(plot.rows().len(), bins);
    assert!(plot.rows().iter().all(|r| r.len() == windows));
}

#[test]
fn starts_zeroed_with_configured_shape() {
    let surface: SharedSurface = Rc::new(RefCell::new(Scene::default()));
    let plot = SpectrogramPlot::new(&surface, options(3, 4)).unwrap();
    assert_shape(&plot, 3, 4);
    assert!(plot.rows().iter().flatten().all(|v| *v == 0.0));
}

#[test]
fn rows_slide_over_the_window() {
    let surface: SharedSurface = Rc::new(RefCell::new(Scene::default()));
    let mut plot = SpectrogramPlot::new(&surface, options(2, 3)).unwrap();

    plot.update(&rows_batch(&[&[1.0, 2.0], &[10.0, 20.0]])).unwrap();
    assert_eq!(plot.rows()[0], vec![0.0, 1.0, 2.0]);
    assert_eq!(plot.rows()[1], vec![0.0, 10.0, 20.0]);

    plot.update(&rows_batch(&[&[3.0, 4.0], &[30.0, 40.0]])).unwrap();
    assert_eq!(plot.rows()[0], vec![2.0, 3.0, 4.0]);
    assert_eq!(plot.rows()[1], vec![20.0, 30.0, 40.0]);
    assert_shape(&plot, 2, 3);
}

#[test]
fn missing_rows_keep_their_previous_contents() {
    let surface: SharedSurface = Rc::new(RefCell::new(Scene::default()));
    let mut plot = SpectrogramPlot::new(&surface, options(3, 2)).unwrap();
    plot.update(&rows_batch(&[&[5.0]])).unwrap();
    assert_eq!(plot.rows()[0], vec![0.0, 5.0]);
    assert_eq!(plot.rows()[2], vec![0.0, 0.0]);

    plot.update(&SampleBatch::new()).unwrap();
    assert_eq!(plot.rows()[0], vec![0.0, 5.0]);
    assert_shape(&plot, 3, 2);
}

#[test]
fn changing_the_window_recreates_the_accumulator() {
    let scene = Rc::new(RefCell::new(Scene::default()));
    let surface: SharedSurface = scene.clone();
    let mut plot = SpectrogramPlot::new(&surface, options(2, 4)).unwrap();
    plot.update(&rows_batch(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]])).unwrap();
    let live = scene.borrow().live_resources();

    plot.update_all_options(options(2, 2)).unwrap();
    assert_shape(&plot, 2, 2);
    assert_eq!(plot.effective_windows(), 2);
    assert!(plot.rows().iter().flatten().all(|v| *v == 0.0));
    // The old heatmap was released when its replacement took over.
    assert_eq!(scene.borrow().live_resources(), live);

    plot.update(&rows_batch(&[&[7.0, 8.0, 9.0], &[1.0, 1.0, 1.0]])).unwrap();
    assert_eq!(plot.rows()[0], vec![8.0, 9.0]);
    assert_shape(&plot, 2, 2);
}

#[test]
fn other_option_changes_reuse_buffers() {
    let surface: SharedSurface = Rc::new(RefCell::new(Scene::default()));
    let mut plot = SpectrogramPlot::new(&surface, options(1, 3)).unwrap();
    plot.update(&rows_batch(&[&[1.0]])).unwrap();

    let mut o = options(1, 3);
    o.colormap_max = 10.0;
    o.base.description = "psd".into();
    plot.update_all_options(o).unwrap();
    assert_eq!(plot.rows()[0], vec![0.0, 0.0, 1.0]);
}

#[test]
fn holds_at_most_one_channel_and_no_x() {
    let surface: SharedSurface = Rc::new(RefCell::new(Scene::default()));
    let mut plot = SpectrogramPlot::new(&surface, options(2, 2)).unwrap();

    assert_eq!(
        plot.add_plot_channel(spectrum(), None),
        Err(PlotError::DuplicateChannel(spectrum()))
    );
    assert_eq!(
        plot.add_plot_channel(SignalRef::new("other", 0), None),
        Err(PlotError::TooManyChannels {
            kind: PlotKind::Spectrogram,
            max: 1
        })
    );
    assert_eq!(
        plot.add_plot_channel(SignalRef::new("other", 0), Some(SignalRef::new("t", 0))),
        Err(PlotError::UnexpectedXChannel(PlotKind::Spectrogram))
    );

    plot.remove_plot_channel(&spectrum(), None).unwrap();
    plot.add_plot_channel(SignalRef::new("other", 0), None).unwrap();
    assert_eq!(plot.options().base.sig_y, vec![SignalRef::new("other", 0)]);
}

#[test]
fn heatmap_is_pushed_to_the_surface() {
    let scene = Rc::new(RefCell::new(Scene::default()));
    let surface: SharedSurface = scene.clone();
    let mut plot = SpectrogramPlot::new(&surface, options(1, 2)).unwrap();
    plot.update(&rows_batch(&[&[0.25, 0.75]])).unwrap();

    let region = plot.core().region();
    let scene = scene.borrow();
    let (_, heatmap) = scene.series_in(region).next().unwrap();
    assert_eq!(
        heatmap.data,
        livedash::surface::scene::SeriesData::Heatmap {
            rows: vec![vec![0.25, 0.75]],
            range: (0.0, 1.0),
        }
    );
}

#[test]
fn dropping_the_plot_releases_everything() {
    let scene = Rc::new(RefCell::new(Scene::default()));
    let surface: SharedSurface = scene.clone();
    let plot = SpectrogramPlot::new(&surface, options(4, 4)).unwrap();
    assert!(scene.borrow().live_resources() > 0);
    drop(plot);
    assert_eq!(scene.borrow().live_resources(), 0);
    // Releasing twice is reported, not fatal.
    assert!(!scene
        .borrow_mut()
        .release(livedash::surface::RegionId(1).into()));
}
