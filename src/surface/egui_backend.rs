//! Paints a [`Scene`] with `egui`/`egui_plot`.
//!
//! Every region becomes one framed `egui_plot::Plot` placed at the region's
//! normalized rectangle. Flipped axes are drawn by negating coordinates and
//! formatting tick labels with the sign restored.

use std::collections::BTreeSet;

use egui::{Color32, Pos2, Ui, UiBuilder};
use egui_plot::{Bar, BarChart, HPlacement, Legend, Line, Plot, PlotPoint, Points, VPlacement};

use crate::layout::Rect;
use crate::options::AxisAlign;

use super::scene::{AxisState, SeriesData, SeriesState};
use super::{Dimension, RegionId, Scene, SeriesStyle};

/// What the user did to one region during this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionResponse {
    pub region: RegionId,
    /// Dragging or scroll-zooming the plot.
    pub interacting: bool,
    /// Double-click: go back to the data-driven view.
    pub reset: bool,
}

const PALETTE: [Color32; 8] = [
    Color32::from_rgb(31, 119, 180),
    Color32::from_rgb(255, 127, 14),
    Color32::from_rgb(44, 160, 44),
    Color32::from_rgb(214, 39, 40),
    Color32::from_rgb(148, 103, 189),
    Color32::from_rgb(140, 86, 75),
    Color32::from_rgb(227, 119, 194),
    Color32::from_rgb(23, 190, 207),
];

fn series_color(index: usize) -> Color32 {
    PALETTE[index % PALETTE.len()]
}

/// Viridis approximation over `t` in `[0, 1]`.
pub fn viridis_color(t: f64) -> Color32 {
    const STOPS: [(f64, [u8; 3]); 5] = [
        (0.00, [68, 1, 84]),
        (0.25, [59, 82, 139]),
        (0.50, [33, 145, 140]),
        (0.75, [94, 201, 98]),
        (1.00, [253, 231, 37]),
    ];
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    for pair in STOPS.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = (t - t0) / (t1 - t0);
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
            return Color32::from_rgb(mix(c0[0], c1[0]), mix(c0[1], c1[1]), mix(c0[2], c1[2]));
        }
    }
    let [r, g, b] = STOPS[STOPS.len() - 1].1;
    Color32::from_rgb(r, g, b)
}

/// Map a normalized layout rectangle into the pixel rectangle `outer`.
pub fn to_screen(rect: &Rect, outer: egui::Rect) -> egui::Rect {
    let min = Pos2::new(
        outer.min.x + (rect.x as f32) * outer.width(),
        outer.min.y + (rect.y as f32) * outer.height(),
    );
    let size = egui::vec2(
        (rect.width as f32) * outer.width(),
        (rect.height as f32) * outer.height(),
    );
    egui::Rect::from_min_size(min, size)
}

// Sign applied to each coordinate so flipped axes draw mirrored.
#[derive(Clone, Copy)]
struct Flip {
    x: f64,
    y: f64,
}

impl Flip {
    fn of(x: Option<&AxisState>, y: Option<&AxisState>) -> Self {
        let sign = |a: Option<&AxisState>| {
            if a.is_some_and(|a| a.spec.flipped) {
                -1.0
            } else {
                1.0
            }
        };
        Self {
            x: sign(x),
            y: sign(y),
        }
    }

    fn point(&self, p: [f64; 2]) -> [f64; 2] {
        [p[0] * self.x, p[1] * self.y]
    }

    fn range(sign: f64, (min, max): (f64, f64)) -> std::ops::RangeInclusive<f64> {
        if sign < 0.0 {
            -max..=-min
        } else {
            min..=max
        }
    }
}

/// Draw every region of `scene` into the space left in `ui`.
///
/// Regions listed in `user_view` keep the bounds the user zoomed or panned
/// to; all others follow the axis domains held by the scene.
pub fn render_scene(
    ui: &mut Ui,
    scene: &Scene,
    user_view: &BTreeSet<RegionId>,
) -> Vec<RegionResponse> {
    let outer = ui.available_rect_before_wrap();
    let mut responses = Vec::new();
    for (region, state) in scene.regions() {
        let rect = to_screen(&state.rect, outer).shrink(2.0);
        if rect.width() <= 1.0 || rect.height() <= 1.0 {
            continue;
        }
        let follow_data = !user_view.contains(&region);
        let response = ui
            .scope_builder(UiBuilder::new().max_rect(rect), |ui| {
                egui::Frame::group(ui.style())
                    .inner_margin(egui::Margin::symmetric(4, 2))
                    .show(ui, |ui| {
                        if !state.title.is_empty() {
                            ui.strong(&state.title);
                        }
                        region_plot(ui, scene, region, follow_data)
                    })
                    .inner
            })
            .inner;
        responses.push(response);
    }
    ui.allocate_rect(outer, egui::Sense::hover());
    responses
}

fn region_plot(ui: &mut Ui, scene: &Scene, region: RegionId, follow_data: bool) -> RegionResponse {
    let x_axis = scene.axis_of(region, Dimension::X);
    let y_axis = scene.axis_of(region, Dimension::Y);
    let flip = Flip::of(x_axis, y_axis);
    let series: Vec<&SeriesState> = scene.series_in(region).map(|(_, s)| s).collect();
    let legend = series
        .iter()
        .any(|s| matches!(s.spec.style, SeriesStyle::Line | SeriesStyle::Scatter));

    let available = ui.available_size();
    let mut plot = Plot::new(("livedash_region", region.0))
        .width(available.x.max(16.0))
        .height(available.y.max(16.0))
        .show_axes([
            x_axis.map_or(true, |a| a.spec.visible),
            y_axis.map_or(true, |a| a.spec.visible),
        ])
        .x_axis_position(match x_axis.map(|a| a.spec.align) {
            Some(AxisAlign::Top) => VPlacement::Top,
            _ => VPlacement::Bottom,
        })
        .y_axis_position(match y_axis.map(|a| a.spec.align) {
            Some(AxisAlign::Right) => HPlacement::Right,
            _ => HPlacement::Left,
        })
        .x_axis_formatter(move |mark, _range| format!("{:.3}", mark.value * flip.x))
        .y_axis_formatter(move |mark, _range| format!("{:.3}", mark.value * flip.y));
    if legend {
        plot = plot.legend(Legend::default());
    }

    let x_domain = scene
        .axes_in(region)
        .find(|(_, a)| a.spec.dimension == Dimension::X)
        .and_then(|(id, _)| scene.resolved_domain(id));
    let y_domain = scene
        .axes_in(region)
        .find(|(_, a)| a.spec.dimension == Dimension::Y)
        .and_then(|(id, _)| scene.resolved_domain(id));

    let resp = plot.show(ui, |plot_ui| {
        if follow_data {
            if let Some(d) = x_domain {
                plot_ui.set_plot_bounds_x(Flip::range(flip.x, d));
            }
            if let Some(d) = y_domain {
                plot_ui.set_plot_bounds_y(Flip::range(flip.y, d));
            }
        }
        for s in &series {
            draw_series(plot_ui, s, flip);
        }
    });

    // Heatmaps are painted over the plot area in plot coordinates.
    let painter = ui.painter_at(resp.response.rect);
    for s in &series {
        if let SeriesData::Heatmap { rows, range } = &s.data {
            for (row, values) in rows.iter().enumerate() {
                for (col, v) in values.iter().enumerate() {
                    let span = (range.1 - range.0).abs().max(f64::EPSILON);
                    let color = viridis_color((v - range.0) / span);
                    let a = flip.point([col as f64, row as f64]);
                    let b = flip.point([col as f64 + 1.0, row as f64 + 1.0]);
                    let pa = resp.transform.position_from_point(&PlotPoint::new(a[0], a[1]));
                    let pb = resp.transform.position_from_point(&PlotPoint::new(b[0], b[1]));
                    painter.rect_filled(egui::Rect::from_two_pos(pa, pb), 0.0, color);
                }
            }
        }
    }

    let r = &resp.response;
    let scrolling = ui.input(|i| i.raw_scroll_delta != egui::Vec2::ZERO);
    RegionResponse {
        region,
        interacting: r.dragged() || (r.hovered() && scrolling),
        reset: r.double_clicked(),
    }
}

fn draw_series(plot_ui: &mut egui_plot::PlotUi, s: &SeriesState, flip: Flip) {
    let color = series_color(s.spec.color_index);
    match &s.data {
        SeriesData::Points(points) => {
            let pts: Vec<[f64; 2]> = points
                .iter()
                .filter(|p| !s.spec.contains_nan || (p[0].is_finite() && p[1].is_finite()))
                .map(|p| flip.point(*p))
                .collect();
            match s.spec.style {
                SeriesStyle::Scatter => {
                    plot_ui.line(
                        Line::new(s.spec.name.clone(), pts.clone())
                            .color(color)
                            .width(0.5),
                    );
                    plot_ui.points(
                        Points::new(s.spec.name.clone(), pts)
                            .color(color)
                            .radius(2.0),
                    );
                }
                _ => plot_ui.line(Line::new(s.spec.name.clone(), pts).color(color).width(1.5)),
            }
        }
        SeriesData::Bars { labels, values } => {
            let bars: Vec<Bar> = values
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_finite())
                .map(|(i, v)| {
                    let mut bar = Bar::new(i as f64 * flip.x, v * flip.y).fill(series_color(i));
                    if let Some(label) = labels.get(i) {
                        bar = bar.name(label);
                    }
                    bar
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(s.spec.name.clone(), bars));
        }
        SeriesData::Heatmap { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viridis_endpoints() {
        assert_eq!(viridis_color(0.0), Color32::from_rgb(68, 1, 84));
        assert_eq!(viridis_color(1.0), Color32::from_rgb(253, 231, 37));
        assert_eq!(viridis_color(7.0), viridis_color(1.0));
        assert_eq!(viridis_color(f64::NAN), viridis_color(0.0));
    }

    #[test]
    fn normalized_rect_maps_into_outer() {
        let outer = egui::Rect::from_min_size(Pos2::new(10.0, 20.0), egui::vec2(200.0, 100.0));
        let r = to_screen(&Rect::new(0.5, 0.5, 0.5, 0.5), outer);
        assert_eq!(r.min, Pos2::new(110.0, 70.0));
        assert_eq!(r.max, Pos2::new(210.0, 120.0));
    }
}
