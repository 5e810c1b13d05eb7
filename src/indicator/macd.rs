use crate::config::MACDParams;
use crate::indicator::columns::{
    MACD as MACD_LINE, MACD_DEATH_CROSS, MACD_DIFF, MACD_GOLDEN_CROSS, MACD_HIST, MACD_SIGNAL,
};
use crate::indicator::utils::{death_cross, difference, ewm, ewm_dense, golden_cross, span_alpha};
use crate::indicator::{Indicator, column_values, insufficient_data};
use crate::price_series::PriceSeries;
use log::debug;
use std::fmt::Display;

/// MACD(Moving Average Convergence Divergence) 기술적 지표
///
/// 빠른 EMA와 느린 EMA의 차이(MACD 라인)와 그 EMA(시그널 라인)를 계산합니다.
/// EMA는 첫 값으로 시작하는 조정 없는 방식이므로 모든 바에서 값이 정의됩니다.
#[derive(Debug, Clone, Copy)]
pub struct MACD {
    params: MACDParams,
}

impl Display for MACD {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({},{},{})",
            self.params.fast_period, self.params.slow_period, self.params.signal_period
        )
    }
}

impl MACD {
    /// 새 MACD 지표 생성
    ///
    /// # Arguments
    /// * `params` - 빠른/느린/시그널 기간
    ///
    /// # Panics
    /// * 기간 중 하나라도 0이거나 빠른 기간이 느린 기간 이상이면 패닉 발생
    pub fn new(params: MACDParams) -> Self {
        if params.fast_period == 0 || params.slow_period == 0 || params.signal_period == 0 {
            panic!("MACD 기간은 0보다 커야 합니다");
        }
        if params.fast_period >= params.slow_period {
            panic!("빠른 기간은 느린 기간보다 작아야 합니다");
        }
        MACD { params }
    }

    pub fn params(&self) -> &MACDParams {
        &self.params
    }
}

impl Default for MACD {
    fn default() -> Self {
        Self::new(MACDParams::default())
    }
}

impl Indicator for MACD {
    fn name(&self) -> &'static str {
        "MACD"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[MACD_LINE, MACD_SIGNAL]
    }

    fn calculate(&self, mut series: PriceSeries) -> PriceSeries {
        let closes = series.closes();
        let fast = ewm_dense(&closes, span_alpha(self.params.fast_period));
        let slow = ewm_dense(&closes, span_alpha(self.params.slow_period));
        let macd = difference(&fast, &slow);
        let signal = ewm(&macd, span_alpha(self.params.signal_period));
        let hist = difference(&macd, &signal);

        series.set_values(MACD_LINE, macd);
        series.set_values(MACD_SIGNAL, signal);
        series.set_values(MACD_HIST, hist);

        debug!("{} 지표 계산 완료", self);
        series
    }

    fn signals(&self, mut series: PriceSeries) -> PriceSeries {
        let diff = difference(
            &column_values(&series, MACD_LINE),
            &column_values(&series, MACD_SIGNAL),
        );
        series.set_flags(MACD_GOLDEN_CROSS, golden_cross(&diff));
        series.set_flags(MACD_DEATH_CROSS, death_cross(&diff));
        series.set_values(MACD_DIFF, diff);
        series
    }

    fn analysis_text(&self, series: &PriceSeries, index: usize) -> String {
        let (Some(macd), Some(signal)) = (
            series.value(MACD_LINE, index),
            series.value(MACD_SIGNAL, index),
        ) else {
            return insufficient_data(self.name());
        };
        let hist = series.value(MACD_HIST, index).unwrap_or(macd - signal);

        let trend = if macd > 0.0 { "상승" } else { "하락" };
        let momentum = if hist > 0.0 { "강화" } else { "약화" };

        let mut lines = vec![
            "【MACD 분석】".to_string(),
            format!("MACD: {:.4}", macd),
            format!("시그널: {:.4}", signal),
            format!("히스토그램: {:.4}", hist),
            format!("추세: {} 추세", trend),
            format!("모멘텀: {}", momentum),
        ];

        if series.flag(MACD_GOLDEN_CROSS, index) {
            lines.push("[MACD 골든 크로스 발생 (매수 참고)]".to_string());
        } else if series.flag(MACD_DEATH_CROSS, index) {
            lines.push("[MACD 데드 크로스 발생 (매도 참고)]".to_string());
        }

        lines.join("\n")
    }
}
