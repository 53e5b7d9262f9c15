use crate::domain::forecast::{ForecastSnapshot, PricePoint};
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn of(delta: f64) -> Self {
        if delta >= 0.0 { Trend::Up } else { Trend::Down }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Down => "▼",
        }
    }
}

/// Absolute and relative move between two values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Change {
    pub delta: f64,
    pub pct: Option<f64>,
}

impl Change {
    fn between(from: f64, to: f64) -> Self {
        let delta = to - from;
        let pct = if from != 0.0 {
            Some(delta / from * 100.0)
        } else {
            None
        };
        Self { delta, pct }
    }

    pub fn trend(&self) -> Trend {
        Trend::of(self.delta)
    }
}

/// Headline numbers shown above the chart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastKpis {
    pub last_value: Option<f64>,
    pub next_forecast: Option<f64>,
    pub horizon_end: Option<f64>,
    pub change_next: Option<Change>,
    pub change_horizon: Option<Change>,
}

impl ForecastKpis {
    pub fn compute(snapshot: &ForecastSnapshot) -> Self {
        let last_value = snapshot.last_value;
        let next_forecast = snapshot.predictions.first().map(|p| p.value);
        let horizon_end = snapshot.predictions.last().map(|p| p.value);

        let change = |target: Option<f64>| match (last_value, target) {
            (Some(from), Some(to)) => Some(Change::between(from, to)),
            _ => None,
        };

        Self {
            last_value,
            next_forecast,
            horizon_end,
            change_next: change(next_forecast),
            change_horizon: change(horizon_end),
        }
    }
}

/// Thousands-separated, two decimals; `-` when absent.
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format_grouped(v, 2),
        None => "-".to_string(),
    }
}

pub fn format_grouped(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residual {
    pub date: NaiveDate,
    pub actual: f64,
    pub predicted: f64,
    pub residual: f64,
}

/// Residuals on dates present in both series, in date order
pub fn residuals(history: &[PricePoint], predictions: &[PricePoint]) -> Vec<Residual> {
    let predicted: HashMap<NaiveDate, f64> =
        predictions.iter().map(|p| (p.date, p.value)).collect();

    let mut out: Vec<Residual> = history
        .iter()
        .filter_map(|a| {
            predicted.get(&a.date).map(|&yhat| Residual {
                date: a.date,
                actual: a.value,
                predicted: yhat,
                residual: a.value - yhat,
            })
        })
        .collect();
    out.sort_by_key(|r| r.date);
    out
}

pub fn mean_absolute_error(residuals: &[Residual]) -> Option<f64> {
    if residuals.is_empty() {
        return None;
    }
    let total: f64 = residuals.iter().map(|r| r.residual.abs()).sum();
    Some(total / residuals.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forecast::{ForecastQuery, Horizon};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn snapshot(last_value: Option<f64>, preds: &[f64]) -> ForecastSnapshot {
        let query = ForecastQuery {
            horizon: Horizon::new(14).unwrap(),
            ..Default::default()
        };
        let predictions = preds
            .iter()
            .enumerate()
            .map(|(i, v)| PricePoint::new(day(i as u32 + 10), *v))
            .collect();
        ForecastSnapshot::new(&query, Some(day(9)), last_value, predictions, None)
    }

    #[test]
    fn test_kpis_from_forecast() {
        let kpis = ForecastKpis::compute(&snapshot(Some(100.0), &[102.0, 98.0, 95.0]));

        assert_eq!(kpis.next_forecast, Some(102.0));
        assert_eq!(kpis.horizon_end, Some(95.0));

        let next = kpis.change_next.unwrap();
        assert!((next.delta - 2.0).abs() < 1e-9);
        assert!((next.pct.unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(next.trend(), Trend::Up);

        let horizon = kpis.change_horizon.unwrap();
        assert!((horizon.delta + 5.0).abs() < 1e-9);
        assert_eq!(horizon.trend().arrow(), "▼");
    }

    #[test]
    fn test_kpis_zero_last_value_has_no_pct() {
        let kpis = ForecastKpis::compute(&snapshot(Some(0.0), &[3.0]));
        let next = kpis.change_next.unwrap();
        assert_eq!(next.delta, 3.0);
        assert!(next.pct.is_none());
    }

    #[test]
    fn test_kpis_without_last_value() {
        let kpis = ForecastKpis::compute(&snapshot(None, &[3.0]));
        assert!(kpis.change_next.is_none());
        assert!(kpis.change_horizon.is_none());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(None), "-");
        assert_eq!(format_value(Some(1234567.891)), "1,234,567.89");
        assert_eq!(format_value(Some(999.999)), "1,000.00");
        assert_eq!(format_value(Some(-4321.5)), "-4,321.50");
        assert_eq!(format_value(Some(12.0)), "12.00");
        assert_eq!(format_grouped(-0.0001, 2), "0.00");
    }

    #[test]
    fn test_residuals_inner_join() {
        let history = vec![
            PricePoint::new(day(1), 10.0),
            PricePoint::new(day(2), 12.0),
            PricePoint::new(day(3), 11.0),
        ];
        let predictions = vec![
            PricePoint::new(day(3), 13.0),
            PricePoint::new(day(2), 11.0),
            PricePoint::new(day(4), 9.0),
        ];

        let res = residuals(&history, &predictions);
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].date, day(2));
        assert_eq!(res[0].residual, 1.0);
        assert_eq!(res[1].residual, -2.0);
        assert_eq!(mean_absolute_error(&res), Some(1.5));
    }

    #[test]
    fn test_no_overlap_has_no_mae() {
        let history = vec![PricePoint::new(day(1), 10.0)];
        let predictions = vec![PricePoint::new(day(5), 10.0)];
        let res = residuals(&history, &predictions);
        assert!(res.is_empty());
        assert!(mean_absolute_error(&res).is_none());
    }
}
