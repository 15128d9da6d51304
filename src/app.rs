//! eframe shell around a [`Dashboard`].
//!
//! [`run_dashboard`] opens a native window; [`DashboardApp`] can also be
//! embedded in another eframe application.

use std::collections::BTreeSet;
use std::sync::mpsc::Receiver;

use eframe::egui;
use egui_phosphor::regular::{PLUS, SQUARES_FOUR, TRASH, WARNING};

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::layout::{dynamic_grid, LayoutMode};
use crate::options::PlotKind;
use crate::sink::DashboardCommand;
use crate::surface::egui_backend::render_scene;
use crate::surface::{RegionId, Scene};

pub struct DashboardApp {
    dashboard: Dashboard<Scene>,
    rx: Receiver<DashboardCommand>,
    /// Regions whose view the user currently controls.
    user_view: BTreeSet<RegionId>,
    last_error: Option<String>,
}

impl DashboardApp {
    pub fn new(dashboard: Dashboard<Scene>, rx: Receiver<DashboardCommand>) -> Self {
        Self {
            dashboard,
            rx,
            user_view: BTreeSet::new(),
            last_error: None,
        }
    }

    pub fn dashboard(&self) -> &Dashboard<Scene> {
        &self.dashboard
    }

    fn report<T>(&mut self, result: Result<T, crate::error::PlotError>) {
        if let Err(e) = result {
            log::warn!("{e}");
            self.last_error = Some(e.to_string());
        }
    }

    fn menu_ui(&mut self, ui: &mut egui::Ui) {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button(format!("{PLUS} Add plot"), |ui| {
                for kind in PlotKind::ALL {
                    if ui.button(kind.as_str()).clicked() {
                        let result = self.dashboard.add_plot(kind, -1);
                        self.report(result);
                        ui.close();
                    }
                }
            });

            let remove = ui.add_enabled(
                !self.dashboard.is_empty(),
                egui::Button::new(format!("{TRASH} Remove last")),
            );
            if remove.clicked() {
                let result = self.dashboard.remove_plot(-1);
                self.report(result);
            }

            let fixed = matches!(self.dashboard.layout_mode(), LayoutMode::Fixed { .. });
            let label = if fixed { "Dynamic grid" } else { "Freeze grid" };
            if ui.button(format!("{SQUARES_FOUR} {label}")).clicked() {
                let next = if fixed {
                    LayoutMode::Dynamic
                } else {
                    let (columns, rows) = dynamic_grid(self.dashboard.len().max(1));
                    LayoutMode::Fixed { rows, columns }
                };
                let result = self.dashboard.set_layout(next);
                self.report(result);
            }

            if let Some(err) = &self.last_error {
                ui.separator();
                ui.colored_label(egui::Color32::YELLOW, format!("{WARNING} {err}"));
                if ui.small_button("x").clicked() {
                    self.last_error = None;
                }
            }
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(e) = self.dashboard.drain(&self.rx).pop() {
            self.last_error = Some(e.to_string());
        }

        egui::TopBottomPanel::top("livedash_menu").show(ctx, |ui| self.menu_ui(ui));

        let responses = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if self.dashboard.is_empty() {
                    ui.centered_and_justified(|ui| {
                        ui.label("No plots. Use \"Add plot\" to create one.")
                    });
                    return Vec::new();
                }
                render_scene(ui, &self.dashboard.surface(), &self.user_view)
            })
            .inner;

        for r in responses {
            if r.reset {
                self.user_view.remove(&r.region);
            } else if r.interacting {
                self.user_view.insert(r.region);
            }
        }
        // Regions of removed plots drop out of the set.
        let live: BTreeSet<RegionId> = self.dashboard.plots().map(|(_, p)| p.region()).collect();
        self.user_view.retain(|r| live.contains(r));
        for region in &live {
            self.dashboard
                .set_region_zooming(*region, self.user_view.contains(region));
        }

        ctx.request_repaint_after(std::time::Duration::from_millis(16));
    }
}

/// Launch a dashboard in a native window; blocks until it is closed.
pub fn run_dashboard(
    rx: Receiver<DashboardCommand>,
    config: DashboardConfig,
) -> eframe::Result<()> {
    let dashboard = match Dashboard::from_config(&config) {
        Ok(d) => d,
        Err(e) => {
            log::error!("config rejected, starting empty: {e}");
            Dashboard::with_layout(Scene::with_capacity(config.surface_capacity), config.layout)
        }
    };
    let app = DashboardApp::new(dashboard, rx);

    let mut options = eframe::NativeOptions::default();
    options.viewport = egui::ViewportBuilder::default().with_inner_size([1400.0, 900.0]);

    eframe::run_native(
        &config.title,
        options,
        Box::new(|cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}
