pub mod analytics_service;
pub mod chart_service;
pub mod export_service;
pub mod fetch_coordinator;
pub mod palette;
