pub mod activity_log;
pub mod controls_panel;
pub mod diagnostics_panel;
pub mod forecast_chart;
pub mod forecast_table;
