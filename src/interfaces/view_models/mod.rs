pub mod dashboard_view_model;
