pub mod chart;
pub mod payload;
pub mod record;
pub mod settings;
pub mod timestamp;
