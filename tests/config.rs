use livedash::*;

const YAML: &str = r#"
title: lab bench
layout:
  mode: fixed
  rows: 1
  columns: 2
surface_capacity: 64
plots:
  - type: line
    description: voltage
    sig_x: [{key: timestamp, index: 0}]
    sig_y:
      - {key: sig, index: 0, name: V1}
      - {key: sig, index: 1}
    n_visible_points: 50
  - type: spectrogram
    sig_x: null
    sig_y: [{key: spectrum, index: 0}]
    bin_count: 8
"#;

#[test]
fn yaml_file_builds_the_dashboard() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dash.yaml");
    std::fs::write(&path, YAML).unwrap();

    let cfg = DashboardConfig::load(&path).unwrap();
    assert_eq!(cfg.title, "lab bench");
    assert_eq!(cfg.surface_capacity, 64);
    assert_eq!(
        cfg.layout,
        LayoutMode::Fixed {
            rows: 1,
            columns: 2
        }
    );
    assert_eq!(cfg.plots.len(), 2);

    let dash = Dashboard::from_config(&cfg).unwrap();
    assert_eq!(dash.len(), 2);
    assert_eq!(dash.surface().capacity(), 64);

    let line = dash.plot(0).and_then(Plot::as_line).unwrap();
    assert_eq!(line.options().n_visible_points, 50);
    assert_eq!(line.options().base.description, "voltage");
    assert_eq!(line.series().len(), 2);
    assert_eq!(line.options().base.sig_y[0].display_name(), "V1");

    let spec = dash.plot(1).and_then(Plot::as_spectrogram).unwrap();
    assert_eq!(spec.shape(), (8, 100));
    assert!(spec.options().base.sig_x.is_empty());
}

#[test]
fn snapshot_round_trips_through_json() {
    let cfg = DashboardConfig::from_yaml(YAML).unwrap();
    let dash = Dashboard::from_config(&cfg).unwrap();
    let mut snapshot = dash.to_config();
    assert_eq!(snapshot.plots, cfg.plots);
    assert_eq!(snapshot.layout, cfg.layout);

    snapshot.title = cfg.title.clone();
    snapshot.surface_capacity = cfg.surface_capacity;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dash.json");
    snapshot.save(&path).unwrap();
    let back = DashboardConfig::load(&path).unwrap();
    assert_eq!(back, cfg);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"n_visible_points\": 50"));
    assert!(text.contains("\"mode\": \"fixed\""));
}

#[test]
fn yaml_save_and_reload() {
    let cfg = DashboardConfig::from_yaml(YAML).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dash.yml");
    cfg.save(&path).unwrap();
    assert_eq!(DashboardConfig::load(&path).unwrap(), cfg);
}

#[test]
fn invalid_plot_entry_is_rejected() {
    let cfg = DashboardConfig::from_yaml(
        r#"
plots:
  - type: bar
    sig_x: [{key: t, index: 0}]
"#,
    )
    .unwrap();
    assert!(matches!(
        Dashboard::from_config(&cfg),
        Err(PlotError::UnexpectedXChannel(PlotKind::Bar))
    ));
}

#[test]
fn load_errors_are_typed() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        DashboardConfig::load(dir.path().join("dash.toml")),
        Err(ConfigError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        DashboardConfig::load(dir.path().join("missing.json")),
        Err(ConfigError::Io { .. })
    ));

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    assert!(matches!(
        DashboardConfig::load(&bad),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn series_window_caps_drawn_points() {
    let cfg = DashboardConfig::from_yaml(
        r#"
series_window: 5
plots:
  - type: line
    sig_x: [{key: t, index: 0}]
    sig_y: [{key: v, index: 0}]
    n_visible_points: 50
"#,
    )
    .unwrap();
    assert_eq!(cfg.series_window, Some(5));

    let mut dash = Dashboard::from_config(&cfg).unwrap();
    for k in 0..20 {
        let k = k as f64;
        let batch = SampleBatch::new()
            .with("t", vec![vec![k]])
            .with("v", vec![vec![k]]);
        dash.update(&batch).unwrap();
    }

    let line = dash.plot(0).and_then(Plot::as_line).unwrap();
    assert_eq!(line.series()[0].points().len(), 20);
    let region = dash.plot(0).unwrap().region();
    let scene = dash.surface();
    let (_, drawn) = scene.series_in(region).next().unwrap();
    assert_eq!(drawn.points().unwrap().len(), 5);
}
