use crate::domain::forecast::ForecastSnapshot;
use crate::domain::kpi::{mean_absolute_error, residuals};
use crate::interfaces::dashboard_components::forecast_chart::{date_to_x, x_to_date};
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;
use egui_plot::{Bar, BarChart, Plot};

/// Residuals on dates where actual and forecast overlap
pub fn render_diagnostics(ui: &mut egui::Ui, snapshot: &ForecastSnapshot) {
    ui.heading("Diagnostics");
    ui.add_space(DesignSystem::SPACING_SMALL);

    if !snapshot.history_supported {
        ui.label(
            egui::RichText::new("Enable /history in the API to show residual diagnostics.")
                .color(DesignSystem::TEXT_MUTED),
        );
        return;
    }

    let rows = residuals(&snapshot.history, &snapshot.predictions);
    let Some(mae) = mean_absolute_error(&rows) else {
        ui.label(
            egui::RichText::new(
                "No overlapping dates between actual history and forecast (normal when forecasts are future dates).",
            )
            .color(DesignSystem::TEXT_MUTED),
        );
        return;
    };

    let bars: Vec<Bar> = rows
        .iter()
        .map(|r| {
            Bar::new(date_to_x(r.date), r.residual)
                .width(0.8)
                .fill(DesignSystem::SERIES_RESIDUAL)
        })
        .collect();

    Plot::new("residuals")
        .height(240.0)
        .show_grid([true, true])
        .x_axis_formatter(|mark, _range| {
            x_to_date(mark.value)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new("Residual (Actual - Forecast)", bars));
        });

    ui.label(
        egui::RichText::new(format!("MAE on overlapping dates: {:.4}", mae))
            .strong()
            .color(DesignSystem::TEXT_PRIMARY),
    );
}
