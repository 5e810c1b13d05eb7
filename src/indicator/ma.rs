use crate::config::MAParams;
use crate::indicator::columns::{
    MA_DEATH_CROSS, MA_DIFF, MA_GOLDEN_CROSS, MA_LONG, MA_MEDIUM, MA_SHORT,
};
use crate::indicator::utils::{death_cross, difference, golden_cross, rolling_mean};
use crate::indicator::{Indicator, column_values, insufficient_data};
use crate::price_series::PriceSeries;
use log::debug;
use std::fmt::Display;

/// 이동평균선 배열 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MATrend {
    /// 정배열 (단기 > 중기 > 장기)
    Bullish,
    /// 역배열 (단기 < 중기 < 장기)
    Bearish,
    /// 혼조
    Tangled,
}

impl Display for MATrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MATrend::Bullish => write!(f, "정배열"),
            MATrend::Bearish => write!(f, "역배열"),
            MATrend::Tangled => write!(f, "혼조"),
        }
    }
}

/// 지정된 바의 이동평균선 배열 상태
///
/// 단기/중기 값이 없으면 None, 장기 값만 없으면 단기와 중기만 비교합니다.
pub fn ma_trend(series: &PriceSeries, index: usize) -> Option<MATrend> {
    let short = series.value(MA_SHORT, index)?;
    let medium = series.value(MA_MEDIUM, index)?;
    let trend = match series.value(MA_LONG, index) {
        Some(long) if short > medium && medium > long => MATrend::Bullish,
        Some(long) if short < medium && medium < long => MATrend::Bearish,
        None if short > medium => MATrend::Bullish,
        None if short < medium => MATrend::Bearish,
        _ => MATrend::Tangled,
    };
    Some(trend)
}

/// 이동평균선 지표
///
/// 종가의 단순이동평균 세 개(단기/중기/장기)를 계산하고,
/// 단기선과 중기선의 교차를 골든/데드 크로스로 표시합니다.
#[derive(Debug, Clone, Copy)]
pub struct MovingAverage {
    params: MAParams,
}

impl MovingAverage {
    /// 새 이동평균 지표 생성
    ///
    /// # Panics
    /// * 기간 중 하나라도 0이면 패닉 발생
    pub fn new(params: MAParams) -> Self {
        if params.short_period == 0 || params.medium_period == 0 || params.long_period == 0 {
            panic!("이동평균 기간은 0보다 커야 합니다");
        }
        MovingAverage { params }
    }

    pub fn params(&self) -> &MAParams {
        &self.params
    }
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self::new(MAParams::default())
    }
}

impl Indicator for MovingAverage {
    fn name(&self) -> &'static str {
        "MA"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[MA_SHORT, MA_MEDIUM]
    }

    fn calculate(&self, mut series: PriceSeries) -> PriceSeries {
        let closes = series.closes();
        series.set_values(MA_SHORT, rolling_mean(&closes, self.params.short_period));
        series.set_values(MA_MEDIUM, rolling_mean(&closes, self.params.medium_period));
        series.set_values(MA_LONG, rolling_mean(&closes, self.params.long_period));

        debug!(
            "MA 지표 계산 완료, 단기/중기/장기: {}/{}/{}",
            self.params.short_period, self.params.medium_period, self.params.long_period
        );
        series
    }

    fn signals(&self, mut series: PriceSeries) -> PriceSeries {
        let diff = difference(
            &column_values(&series, MA_SHORT),
            &column_values(&series, MA_MEDIUM),
        );
        series.set_flags(MA_GOLDEN_CROSS, golden_cross(&diff));
        series.set_flags(MA_DEATH_CROSS, death_cross(&diff));
        series.set_values(MA_DIFF, diff);
        series
    }

    fn analysis_text(&self, series: &PriceSeries, index: usize) -> String {
        let (Some(bar), Some(short), Some(medium)) = (
            series.bar(index),
            series.value(MA_SHORT, index),
            series.value(MA_MEDIUM, index),
        ) else {
            return insufficient_data(self.name());
        };

        let long = series
            .value(MA_LONG, index)
            .map(|value| format!("{:.2}", value))
            .unwrap_or_else(|| "데이터 부족".to_string());
        let trend = ma_trend(series, index).unwrap_or(MATrend::Tangled);
        let position = if bar.close > short { "위" } else { "아래" };

        let mut lines = vec![
            "【MA 이동평균 분석】".to_string(),
            format!("현재 가격: {:.2}", bar.close),
            format!("단기 이동평균({}): {:.2}", self.params.short_period, short),
            format!("중기 이동평균({}): {:.2}", self.params.medium_period, medium),
            format!("장기 이동평균({}): {}", self.params.long_period, long),
            format!("이동평균 배열: {}", trend),
            format!("가격 위치: 단기 이동평균 {}", position),
        ];

        if series.flag(MA_GOLDEN_CROSS, index) {
            lines.push("[골든 크로스 발생 (매수 참고)]".to_string());
        } else if series.flag(MA_DEATH_CROSS, index) {
            lines.push("[데드 크로스 발생 (매도 참고)]".to_string());
        }

        lines.join("\n")
    }
}
