use crate::domain::forecast::ForecastSnapshot;
use crate::interfaces::design_system::DesignSystem;
use chrono::{NaiveDate, TimeDelta};
use eframe::egui;
use egui_plot::{Legend, Line, LineStyle, Plot, Points, VLine};

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Plot x coordinate of a date (days since the Unix epoch)
pub fn date_to_x(date: NaiveDate) -> f64 {
    (date - epoch()).num_days() as f64
}

/// Date at plot coordinate `x`, `None` outside chrono's date range
pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() {
        return None;
    }
    // `as` saturates, try_days rejects what chrono cannot represent
    epoch().checked_add_signed(TimeDelta::try_days(x.round() as i64)?)
}

/// Actual vs forecast chart.
///
/// The forecast is joined to the last actual point by a dotted segment and a
/// dashed vertical line marks where it starts.
pub fn render_forecast_chart(ui: &mut egui::Ui, snapshot: &ForecastSnapshot, height: f32) {
    let actual: Vec<[f64; 2]> = snapshot
        .history
        .iter()
        .map(|p| [date_to_x(p.date), p.value])
        .collect();
    let forecast: Vec<[f64; 2]> = snapshot
        .predictions
        .iter()
        .map(|p| [date_to_x(p.date), p.value])
        .collect();

    let transition = match (snapshot.last_actual(), snapshot.first_prediction()) {
        (Some(a), Some(f)) => Some(vec![
            [date_to_x(a.date), a.value],
            [date_to_x(f.date), f.value],
        ]),
        _ => None,
    };

    ui.label(
        egui::RichText::new(format!("{}: Actual vs Forecast", snapshot.asset))
            .strong()
            .size(16.0)
            .color(DesignSystem::TEXT_PRIMARY),
    );

    Plot::new(format!("forecast_{}", snapshot.asset))
        .height(height.max(300.0))
        .show_grid([true, true])
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Value")
        .x_axis_formatter(|mark, _range| {
            x_to_date(mark.value)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .label_formatter(|name, point| {
            let date = x_to_date(point.x)
                .map(|d| d.to_string())
                .unwrap_or_default();
            if name.is_empty() {
                format!("{}\n{:.2}", date, point.y)
            } else {
                format!("{}\n{}\n{:.2}", name, date, point.y)
            }
        })
        .show(ui, |plot_ui| {
            if !actual.is_empty() {
                plot_ui.line(Line::new("Actual", actual).color(DesignSystem::SERIES_ACTUAL));
            }

            if let Some(segment) = transition {
                // Unnamed items stay out of the legend
                plot_ui.line(
                    Line::new("", segment)
                        .color(DesignSystem::SERIES_FORECAST.linear_multiply(0.6))
                        .style(LineStyle::dotted_dense()),
                );
                if let Some(first) = snapshot.first_prediction() {
                    plot_ui.vline(
                        VLine::new("", date_to_x(first.date))
                            .color(DesignSystem::TEXT_MUTED)
                            .style(LineStyle::dashed_loose()),
                    );
                }
            }

            if !forecast.is_empty() {
                plot_ui.line(
                    Line::new("Forecast", forecast.clone())
                        .color(DesignSystem::SERIES_FORECAST)
                        .style(LineStyle::dotted_dense()),
                );
                plot_ui.points(
                    Points::new("Forecast", forecast)
                        .color(DesignSystem::SERIES_FORECAST)
                        .radius(3.0),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_axis_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
        let x = date_to_x(date);
        assert_eq!(x_to_date(x), Some(date));
        assert_eq!(x_to_date(x + 0.4), Some(date));
        assert_eq!(date_to_x(epoch()), 0.0);
    }

    #[test]
    fn test_axis_values_outside_date_range() {
        assert_eq!(x_to_date(1.0e15), None);
        assert_eq!(x_to_date(-1.0e15), None);
        assert_eq!(x_to_date(1.0e300), None);
        assert_eq!(x_to_date(f64::NAN), None);
        assert_eq!(x_to_date(f64::INFINITY), None);
        assert_eq!(x_to_date(f64::NEG_INFINITY), None);
        // chrono's NaiveDate::MAX is in year 262142
        assert_eq!(x_to_date(200_000_000.0), None);
        assert!(x_to_date(-700_000.0).is_some());
    }
}
