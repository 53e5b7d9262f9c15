use crate::application::dashboard_app::DashboardApp;
use crate::domain::kpi::format_value;
use crate::interfaces::components::card::Card;
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

/// Forecast table, CSV download and data status
pub fn render_forecast_table(ui: &mut egui::Ui, app: &mut DashboardApp) {
    let Some(snapshot) = app.state.snapshot() else {
        return;
    };
    let history_supported = snapshot.history_supported;
    let has_predictions = !snapshot.predictions.is_empty();

    Card::new().title("FORECAST TABLE").show(ui, |ui| {
        if !has_predictions {
            ui.label(
                egui::RichText::new("No forecast returned.")
                    .italics()
                    .color(DesignSystem::TEXT_MUTED),
            );
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("forecast_table_scroll")
            .max_height(360.0)
            .show(ui, |ui| {
                egui::Grid::new("forecast_grid")
                    .striped(true)
                    .min_col_width(100.0)
                    .spacing([20.0, 6.0])
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new("Date").strong());
                        ui.label(egui::RichText::new("Predicted").strong());
                        ui.end_row();

                        for point in &snapshot.predictions {
                            ui.label(point.date.to_string());
                            ui.label(format_value(Some(point.value)));
                            ui.end_row();
                        }
                    });
            });
    });

    ui.add_space(DesignSystem::SPACING_SMALL);

    if has_predictions && ui.button("⬇ Download forecast CSV").clicked() {
        app.export_csv();
    }
    match &app.export_status {
        Some(Ok(path)) => {
            ui.label(
                egui::RichText::new(format!("Saved {}", path.display()))
                    .size(11.0)
                    .color(DesignSystem::SUCCESS),
            );
        }
        Some(Err(e)) => {
            ui.label(
                egui::RichText::new(format!("Export failed: {}", e))
                    .size(11.0)
                    .color(DesignSystem::DANGER),
            );
        }
        None => {}
    }

    ui.add_space(DesignSystem::SPACING_SMALL);
    ui.separator();
    ui.label(egui::RichText::new("Data status").strong());
    if history_supported {
        ui.label("History endpoint: ✅ available");
    } else {
        ui.label("History endpoint: ⚠ not available");
    }
    ui.label(
        egui::RichText::new("If history is unavailable, only the forecast line is shown.")
            .size(11.0)
            .color(DesignSystem::TEXT_MUTED),
    );
}
