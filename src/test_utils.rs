use crate::model::PriceBar;
use crate::price_series::PriceSeries;
use chrono::{Duration, NaiveDate};

/// i번째 테스트 거래일
pub fn trade_date(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(i as i64)
}

/// 종가 목록으로 시계열 생성 (고가/저가는 종가 ±1)
pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            PriceBar::new(trade_date(i), *close, close + 1.0, close - 1.0, *close, 1000.0)
        })
        .collect();
    PriceSeries::new(bars).unwrap()
}

/// (고가, 저가, 종가) 목록으로 시계열 생성
pub fn series_from_hlc(rows: &[(f64, f64, f64)]) -> PriceSeries {
    let bars = rows
        .iter()
        .enumerate()
        .map(|(i, (high, low, close))| {
            PriceBar::new(trade_date(i), *close, *high, *low, *close, 1000.0)
        })
        .collect();
    PriceSeries::new(bars).unwrap()
}

/// 횡보 20개 뒤 급등 후 10개 상승 추세
pub fn step_up_closes() -> Vec<f64> {
    let mut closes = vec![10.0; 20];
    closes.extend((0..10).map(|i| 12.0 + i as f64 * 0.5));
    closes
}
