// One refresh cycle against the prediction API
pub mod dashboard_service;

// UI-facing state and auto-refresh
pub mod dashboard_state;
pub mod refresh_timer;

// Background fetch plumbing
pub mod client;
pub mod worker;

// Desktop dashboard session (UI-independent)
pub mod dashboard_app;
