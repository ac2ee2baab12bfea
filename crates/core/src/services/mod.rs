pub mod bucket_service;
pub mod chart_service;
pub mod scale;
pub mod series_service;
pub mod svg_service;
