pub mod analyzer;
pub mod config;
pub mod indicator;
pub mod model;
pub mod price_series;

/// 설정 로더
pub mod config_loader;

#[cfg(test)]
mod test_utils;
