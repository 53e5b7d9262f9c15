use crate::application::dashboard_app::DashboardApp;
use crate::config::{MAX_REFRESH_SECS, MIN_REFRESH_SECS};
use crate::domain::forecast::{Asset, HistoryWindow, Horizon};
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

/// Sidebar with every control that shapes the next fetch
pub fn render_controls_panel(app: &mut DashboardApp, ctx: &egui::Context) {
    egui::SidePanel::left("controls_panel")
        .default_width(260.0)
        .min_width(220.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.add_space(DesignSystem::SPACING_SMALL);
            ui.heading("⚙ Controls");
            ui.separator();

            ui.label("Prediction API base URL");
            let response = ui.add(
                egui::TextEdit::singleline(&mut app.base_url_input).desired_width(f32::INFINITY),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                let input = app.base_url_input.clone();
                app.state.set_base_url(&input);
                app.base_url_input = app.state.controls().base_url.clone();
            }
            ui.add_space(DesignSystem::SPACING_SMALL);

            let controls = app.state.controls().clone();

            let mut asset = controls.query.asset;
            egui::ComboBox::from_label("Asset")
                .selected_text(asset.as_str())
                .show_ui(ui, |ui| {
                    for candidate in Asset::ALL {
                        ui.selectable_value(&mut asset, candidate, candidate.as_str());
                    }
                });
            app.state.set_asset(asset);

            let mut steps = controls.query.horizon.steps();
            ui.add(
                egui::Slider::new(&mut steps, Horizon::MIN..=Horizon::MAX)
                    .text("Forecast horizon"),
            );
            app.state.set_horizon(steps);

            let mut window = controls.query.window;
            egui::ComboBox::from_label("History window")
                .selected_text(window.to_string())
                .show_ui(ui, |ui| {
                    for candidate in HistoryWindow::ALL {
                        ui.selectable_value(&mut window, candidate, candidate.to_string());
                    }
                });
            app.state.set_history_window(window);

            ui.add_space(DesignSystem::SPACING_SMALL);
            ui.separator();

            let mut auto_refresh = controls.auto_refresh;
            if ui.checkbox(&mut auto_refresh, "Auto-refresh").changed() {
                app.state.set_auto_refresh(auto_refresh);
            }

            let mut secs = controls.refresh_interval.as_secs();
            ui.horizontal(|ui| {
                ui.label("Refresh interval (seconds)");
                ui.add(egui::DragValue::new(&mut secs).range(MIN_REFRESH_SECS..=MAX_REFRESH_SECS));
            });
            if secs != controls.refresh_interval.as_secs() {
                app.state.set_refresh_interval_secs(secs);
            }

            ui.add_space(DesignSystem::SPACING_SMALL);
            let busy = app.state.is_fetching();
            if ui
                .add_enabled(!busy, egui::Button::new("⟳ Refresh now"))
                .clicked()
            {
                app.state.request_refresh();
            }

            ui.separator();
            ui.label(
                egui::RichText::new("Tip: if you redeploy the API, press Refresh now.")
                    .size(11.0)
                    .color(DesignSystem::TEXT_MUTED),
            );
        });
}
