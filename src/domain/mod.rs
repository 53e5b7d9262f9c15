pub mod errors;
pub mod forecast;
pub mod kpi;
pub mod ports;
