// 기술적 지표 모듈
// 각 지표는 가격 시계열에 지표 컬럼과 신호 플래그 컬럼을 추가합니다.

pub mod columns;
pub mod kdj;
pub mod ma;
pub mod macd;
pub mod rsi;
pub mod utils;

use crate::price_series::PriceSeries;
use std::fmt::Debug;

pub use kdj::KDJ;
pub use ma::MovingAverage;
pub use macd::MACD;
pub use rsi::RelativeStrengthIndex;

/// 기술적 지표 인터페이스
///
/// 모든 지표는 시계열을 받아 컬럼을 추가한 새 시계열을 돌려줍니다.
/// 행의 개수와 순서는 바뀌지 않습니다.
pub trait Indicator: Debug {
    /// 지표 이름 (보고서 표시용)
    fn name(&self) -> &'static str;

    /// 신호 계산에 필요한 지표 컬럼 목록
    fn required_columns(&self) -> &'static [&'static str];

    /// 지표 컬럼 계산
    ///
    /// # Arguments
    /// * `series` - 가격 시계열
    ///
    /// # Returns
    /// * `PriceSeries` - 지표 컬럼이 추가된 시계열
    fn calculate(&self, series: PriceSeries) -> PriceSeries;

    /// 지표 컬럼으로부터 신호 플래그 계산
    fn signals(&self, series: PriceSeries) -> PriceSeries;

    /// 신호 플래그 컬럼 생성
    ///
    /// 필요한 지표 컬럼이 이미 있으면 그대로 사용하고, 없을 때만 계산합니다.
    fn get_signal(&self, series: PriceSeries) -> PriceSeries {
        let calculated = self
            .required_columns()
            .iter()
            .all(|column| series.has_column(column));
        let series = if calculated {
            series
        } else {
            self.calculate(series)
        };
        self.signals(series)
    }

    /// 지정된 바에 대한 분석 문구
    ///
    /// 지표 값이 정의되지 않은 바에서는 "<이름> 데이터 부족"을 돌려줍니다.
    fn analysis_text(&self, series: &PriceSeries, index: usize) -> String;
}

/// 지표 값이 없을 때의 분석 문구
pub(crate) fn insufficient_data(name: &str) -> String {
    format!("{} 데이터 부족", name)
}

/// 지표 컬럼을 소유한 벡터로 복사 (컬럼이 없으면 전부 None)
pub(crate) fn column_values(series: &PriceSeries, name: &str) -> Vec<Option<f64>> {
    series
        .column(name)
        .map(|column| column.to_vec())
        .unwrap_or_else(|| vec![None; series.len()])
}
