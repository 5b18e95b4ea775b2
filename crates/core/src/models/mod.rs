pub mod analytics;
pub mod category;
pub mod chart;
pub mod date_range;
pub mod settings;
pub mod transaction;
