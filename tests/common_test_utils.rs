#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use stock_signal::model::PriceBar;
use stock_signal::price_series::PriceSeries;

pub fn trade_date(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(i as i64)
}

/// 종가 목록으로 시계열 생성 (고가/저가는 종가 ±1, 거래량 1000)
pub fn create_series(closes: &[f64]) -> PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            PriceBar::new(trade_date(i), *close, close + 1.0, close - 1.0, *close, 1000.0)
        })
        .collect();
    PriceSeries::new(bars).unwrap()
}

pub fn create_uptrend_series(count: usize, base_price: f64, step: f64) -> PriceSeries {
    let closes: Vec<f64> = (0..count).map(|i| base_price + i as f64 * step).collect();
    create_series(&closes)
}

pub fn create_downtrend_series(count: usize, base_price: f64, step: f64) -> PriceSeries {
    let closes: Vec<f64> = (0..count).map(|i| base_price - i as f64 * step).collect();
    create_series(&closes)
}

pub fn create_flat_series(count: usize, price: f64) -> PriceSeries {
    create_series(&vec![price; count])
}

/// 20개 횡보 후 급등, 이어서 10개 상승
pub fn create_step_up_series() -> PriceSeries {
    let mut closes = vec![10.0; 20];
    closes.extend((0..10).map(|i| 12.0 + i as f64 * 0.5));
    create_series(&closes)
}

/// 100을 중심으로 `period` 바 주기로 진동하는 시계열
pub fn create_wave_series(count: usize, period: f64, amplitude: f64) -> PriceSeries {
    let closes: Vec<f64> = (0..count)
        .map(|i| 100.0 + amplitude * (i as f64 / period * 2.0 * std::f64::consts::PI).sin())
        .collect();
    create_series(&closes)
}

/// 플래그 컬럼에서 true인 위치 목록
pub fn true_indices(series: &PriceSeries, column: &str) -> Vec<usize> {
    series
        .flag_column(column)
        .unwrap_or(&[])
        .iter()
        .enumerate()
        .filter(|(_, flag)| **flag)
        .map(|(i, _)| i)
        .collect()
}
