use crate::domain::forecast::ForecastSnapshot;
use crate::domain::kpi::{Change, ForecastKpis, format_grouped, format_value};
use crate::interfaces::design_system::DesignSystem;
use chrono::Local;
use eframe::egui;

pub struct KpiCard {
    pub title: String,
    pub value: String,
    pub subtitle: String,
    pub value_color: egui::Color32,
}

impl KpiCard {
    fn plain(title: impl Into<String>, value: String, subtitle: String) -> Self {
        Self {
            title: title.into(),
            value,
            subtitle,
            value_color: DesignSystem::TEXT_PRIMARY,
        }
    }

    fn change(title: impl Into<String>, change: Option<Change>) -> Self {
        match change {
            Some(c) => Self {
                title: title.into(),
                value: format!("{} {}", c.trend().arrow(), format_grouped(c.delta, 2)),
                subtitle: c
                    .pct
                    .map(|p| format!("{}%", format_grouped(p, 3)))
                    .unwrap_or_else(|| "-".to_string()),
                value_color: DesignSystem::trend_color(c.delta),
            },
            None => Self::plain(title, "-".to_string(), "-".to_string()),
        }
    }
}

pub struct DashboardViewModel;

impl DashboardViewModel {
    /// The five headline tiles, in display order
    pub fn kpi_cards(snapshot: &ForecastSnapshot) -> Vec<KpiCard> {
        let kpis = ForecastKpis::compute(snapshot);
        let updated = snapshot
            .fetched_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S");
        let last_date = snapshot
            .last_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());

        vec![
            KpiCard::plain(
                "ASSET",
                snapshot.asset.to_string(),
                format!("Updated: {}", updated),
            ),
            KpiCard::plain(
                "LAST VALUE",
                format_value(kpis.last_value),
                format!("Last date: {}", last_date),
            ),
            KpiCard::plain(
                "NEXT FORECAST",
                format_value(kpis.next_forecast),
                format!("Horizon: {} steps", snapshot.horizon),
            ),
            KpiCard::change("CHANGE (NEXT VS LAST)", kpis.change_next),
            // Without a percentage (zero last value) the whole tile is blank
            KpiCard::change(
                format!("HORIZON CHANGE ({}D)", snapshot.horizon),
                kpis.change_horizon.filter(|c| c.pct.is_some()),
            ),
        ]
    }
}
