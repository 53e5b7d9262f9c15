use crate::interfaces::design_system::DesignSystem;
use eframe::egui;
use std::collections::VecDeque;

/// Collapsible bottom panel mirroring the tracing output
pub fn render_activity_log(ctx: &egui::Context, lines: &VecDeque<String>) {
    egui::TopBottomPanel::bottom("activity_log")
        .resizable(true)
        .default_height(140.0)
        .min_height(30.0)
        .show(ctx, |ui| {
            egui::CollapsingHeader::new("Activity")
                .default_open(false)
                .show(ui, |ui| {
                    egui::ScrollArea::vertical()
                        .id_salt("activity_log_scroll")
                        .auto_shrink([false, true])
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for line in lines {
                                let color = if line.contains("ERROR") {
                                    DesignSystem::DANGER
                                } else if line.contains("WARN") {
                                    DesignSystem::WARNING
                                } else {
                                    DesignSystem::TEXT_SECONDARY
                                };
                                ui.label(egui::RichText::new(line).size(11.0).monospace().color(color));
                            }
                        });
                });
        });
}
