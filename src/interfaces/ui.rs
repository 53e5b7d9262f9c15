use crate::application::dashboard_app::DashboardApp;
use crate::interfaces::components::metrics::{render_kpi_card, render_status_pill};
use crate::interfaces::dashboard_components::activity_log::render_activity_log;
use crate::interfaces::dashboard_components::controls_panel::render_controls_panel;
use crate::interfaces::dashboard_components::diagnostics_panel::render_diagnostics;
use crate::interfaces::dashboard_components::forecast_chart::render_forecast_chart;
use crate::interfaces::dashboard_components::forecast_table::render_forecast_table;
use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::dashboard_view_model::DashboardViewModel;
use eframe::egui;
use std::time::{Duration, Instant};

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(DesignSystem::theme());

        // --- 1. Worker events + scheduling ---
        self.tick(Instant::now());

        // --- 2. Panels ---
        render_controls_panel(self, ctx);
        render_header(self, ctx);
        render_activity_log(ctx, &self.activity);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("dashboard_scroll")
                .show(ui, |ui| render_body(self, ui));
        });

        // Wake up for worker replies and the next auto-refresh
        let wait = if self.state.is_fetching() || self.state.needs_fetch() {
            Duration::from_millis(200)
        } else {
            self.state
                .time_until_refresh(Instant::now())
                .map(|d| d.min(Duration::from_secs(1)))
                .unwrap_or(Duration::from_secs(1))
        };
        ctx.request_repaint_after(wait);
    }
}

fn render_header(app: &DashboardApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("header").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.heading("📈 Stock Market and Crypto Forecast Dashboard");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if app.state.is_fetching() {
                    render_status_pill(ui, "● FETCHING", DesignSystem::WARNING);
                } else if app.state.last_error().is_some() {
                    render_status_pill(ui, "● ERROR", DesignSystem::DANGER);
                } else if app.state.snapshot().is_some() {
                    render_status_pill(ui, "● ONLINE", DesignSystem::SUCCESS);
                }
            });
        });
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Backend:").color(DesignSystem::TEXT_MUTED));
            ui.label(egui::RichText::new(&app.state.controls().base_url).monospace());
            if app.state.controls().auto_refresh {
                ui.separator();
                ui.label(
                    egui::RichText::new(format!(
                        "Auto-refresh enabled: every {} seconds.",
                        app.state.controls().refresh_interval.as_secs()
                    ))
                    .color(DesignSystem::TEXT_MUTED),
                );
            }
        });

        if let Some(error) = app.state.last_error() {
            ui.add_space(4.0);
            egui::Frame::NONE
                .fill(DesignSystem::DANGER.linear_multiply(0.15))
                .corner_radius(DesignSystem::ROUNDING_MEDIUM)
                .inner_margin(egui::Margin::symmetric(10, 6))
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(error).color(DesignSystem::DANGER));
                });
        }
        ui.add_space(6.0);
    });
}

fn render_body(app: &mut DashboardApp, ui: &mut egui::Ui) {
    let Some(snapshot) = app.state.snapshot().cloned() else {
        ui.centered_and_justified(|ui| {
            if app.state.last_error().is_some() {
                ui.label("No data yet. Check the backend URL and press Refresh now.");
            } else {
                ui.label("⏳ Waiting for the prediction API...");
            }
        });
        return;
    };

    // KPI row
    let cards = DashboardViewModel::kpi_cards(&snapshot);
    let card_width = ((ui.available_width() - 4.0 * DesignSystem::SPACING_SMALL) / 5.0).max(150.0);
    ui.horizontal_wrapped(|ui| {
        for card in &cards {
            render_kpi_card(ui, card, card_width);
        }
    });

    ui.add_space(DesignSystem::SPACING_MEDIUM);
    ui.separator();

    // Chart (left) + table (right)
    ui.columns(2, |columns| {
        render_forecast_chart(&mut columns[0], &snapshot, 520.0);
        render_forecast_table(&mut columns[1], app);
    });

    ui.add_space(DesignSystem::SPACING_MEDIUM);
    ui.separator();
    render_diagnostics(ui, &snapshot);
}
