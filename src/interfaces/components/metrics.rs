use crate::interfaces::components::card::Card;
use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::dashboard_view_model::KpiCard;
use eframe::egui;

/// One KPI tile: title, big value, muted subtitle
pub fn render_kpi_card(ui: &mut egui::Ui, card: &KpiCard, width: f32) {
    ui.allocate_ui_with_layout(
        egui::vec2(width, 96.0),
        egui::Layout::top_down(egui::Align::LEFT),
        |ui| {
            Card::new().title(card.title.clone()).min_height(64.0).show(ui, |ui| {
                ui.set_width(width - 2.0 * DesignSystem::SPACING_MEDIUM);
                ui.label(
                    egui::RichText::new(&card.value)
                        .size(22.0)
                        .strong()
                        .color(card.value_color),
                );
                ui.label(
                    egui::RichText::new(&card.subtitle)
                        .size(11.0)
                        .color(DesignSystem::TEXT_MUTED),
                );
            });
        },
    );
}

/// A status pill (e.g., for API health)
pub fn render_status_pill(ui: &mut egui::Ui, text: &str, color: egui::Color32) {
    egui::Frame::NONE
        .fill(color.linear_multiply(0.15))
        .corner_radius(12)
        .inner_margin(egui::Margin::symmetric(8, 4))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).size(12.0).strong().color(color));
        });
}
