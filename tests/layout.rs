use livedash::layout::dynamic_grid;
use livedash::*;

const EPS: f64 = 1e-9;

fn assert_partition(rects: &[Rect]) {
    let area: f64 = rects.iter().map(Rect::area).sum();
    assert!((area - 1.0).abs() < EPS, "areas sum to {area}");
    for (i, a) in rects.iter().enumerate() {
        assert!(a.x >= -EPS && a.y >= -EPS);
        assert!(a.x + a.width <= 1.0 + EPS && a.y + a.height <= 1.0 + EPS);
        for b in &rects[i + 1..] {
            assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn dynamic_grid_columns() {
    assert_eq!(dynamic_grid(1).0, 1);
    assert_eq!(dynamic_grid(4).0, 2);
    assert_eq!(dynamic_grid(5).0, 3);
    assert_eq!(dynamic_grid(5).1, 2);
}

#[test]
fn dynamic_layout_partitions_the_unit_square() {
    for n in [1, 2, 3, 4, 5, 7, 10] {
        let rects = compute_layout(n, LayoutMode::Dynamic);
        assert_eq!(rects.len(), n);
        assert_partition(&rects);
    }
}

#[test]
fn dynamic_layout_is_row_major() {
    let rects = compute_layout(4, LayoutMode::Dynamic);
    assert_eq!(rects[0], Rect::new(0.0, 0.0, 0.5, 0.5));
    assert_eq!(rects[1], Rect::new(0.5, 0.0, 0.5, 0.5));
    assert_eq!(rects[2], Rect::new(0.0, 0.5, 0.5, 0.5));
    assert_eq!(rects[3], Rect::new(0.5, 0.5, 0.5, 0.5));
}

#[test]
fn single_plot_fills_the_surface() {
    assert_eq!(compute_layout(1, LayoutMode::Dynamic), vec![Rect::UNIT]);
    assert!(compute_layout(0, LayoutMode::Dynamic).is_empty());
}

#[test]
fn fixed_grid_cycles_past_capacity() {
    let mode = LayoutMode::Fixed {
        rows: 2,
        columns: 2,
    };
    let rects = compute_layout(6, mode);
    assert_eq!(rects.len(), 6);
    assert_partition(&rects[..4]);
    assert_eq!(rects[4], rects[0]);
    assert_eq!(rects[5], rects[1]);
}

#[test]
fn layout_is_recomputed_from_the_count_alone() {
    let mut dash: Dashboard = Dashboard::default();
    for _ in 0..5 {
        dash.add_plot(PlotKind::Line, -1).unwrap();
    }
    dash.remove_plot(-1).unwrap();
    assert_eq!(dash.rects(), compute_layout(4, LayoutMode::Dynamic).as_slice());

    let region = dash.plot(3).unwrap().region();
    let placed = dash.surface().region(region).unwrap().rect;
    assert_eq!(placed, Rect::new(0.5, 0.5, 0.5, 0.5));

    dash.set_layout(LayoutMode::Fixed {
        rows: 1,
        columns: 4,
    })
    .unwrap();
    assert_eq!(dash.rects()[3], Rect::new(0.75, 0.0, 0.25, 1.0));
}

#[test]
fn huge_fixed_grid_builds_only_the_occupied_cells() {
    let rects = compute_layout(
        3,
        LayoutMode::Fixed {
            rows: usize::MAX,
            columns: 2,
        },
    );
    assert_eq!(rects.len(), 3);
    assert_eq!(rects[0].x, 0.0);
    assert_eq!(rects[1].x, 0.5);
    assert_eq!(rects[2].x, 0.0);
    assert!(rects[2].y > rects[0].y);
    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            assert!(!a.overlaps(b));
        }
    }

    let wide = compute_layout(
        2,
        LayoutMode::Fixed {
            rows: usize::MAX,
            columns: usize::MAX,
        },
    );
    assert_eq!(wide.len(), 2);
    assert_eq!(wide[0].y, wide[1].y);
}
