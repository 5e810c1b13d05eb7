use crate::config::RSIParams;
use crate::indicator::columns::{RSI, RSI_OVERBOUGHT, RSI_OVERSOLD};
use crate::indicator::utils::{above, below, rolling_mean};
use crate::indicator::{Indicator, column_values, insufficient_data};
use crate::price_series::PriceSeries;
use log::debug;

/// RSI 계산 함수
///
/// 전일 대비 종가 변화를 상승분/하락분으로 나누고 각각의 단순이동평균으로 RS를 구합니다.
/// 첫 바의 변화량은 0으로 취급하므로 값은 `period - 1`번째 바부터 정의됩니다.
/// 평균 하락분이 0이면 RSI는 100입니다.
fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());

    for i in 0..closes.len() {
        let change = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let avg_gains = rolling_mean(&gains, period);
    let avg_losses = rolling_mean(&losses, period);

    avg_gains
        .into_iter()
        .zip(avg_losses)
        .map(|(avg_gain, avg_loss)| match (avg_gain, avg_loss) {
            (Some(_), Some(avg_loss)) if avg_loss == 0.0 => Some(100.0),
            (Some(avg_gain), Some(avg_loss)) => {
                let rs = avg_gain / avg_loss;
                Some(100.0 - (100.0 / (1.0 + rs)))
            }
            _ => None,
        })
        .collect()
}

/// 상대강도지수(RSI) 지표
///
/// RSI가 과매도 기준보다 낮은 모든 바에 `RSI_OVERSOLD`,
/// 과매수 기준보다 높은 모든 바에 `RSI_OVERBOUGHT`를 표시합니다.
#[derive(Debug, Clone, Copy)]
pub struct RelativeStrengthIndex {
    params: RSIParams,
}

impl RelativeStrengthIndex {
    /// 새 RSI 지표 생성
    ///
    /// # Panics
    /// * 기간이 0이면 패닉 발생
    pub fn new(params: RSIParams) -> Self {
        if params.period == 0 {
            panic!("RSI 기간은 0보다 커야 합니다");
        }
        RelativeStrengthIndex { params }
    }

    pub fn params(&self) -> &RSIParams {
        &self.params
    }
}

impl Default for RelativeStrengthIndex {
    fn default() -> Self {
        Self::new(RSIParams::default())
    }
}

impl Indicator for RelativeStrengthIndex {
    fn name(&self) -> &'static str {
        "RSI"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[RSI]
    }

    fn calculate(&self, mut series: PriceSeries) -> PriceSeries {
        let rsi = calculate_rsi(&series.closes(), self.params.period);
        series.set_values(RSI, rsi);
        debug!("RSI 지표 계산 완료, 기간: {}", self.params.period);
        series
    }

    fn signals(&self, mut series: PriceSeries) -> PriceSeries {
        let rsi = column_values(&series, RSI);
        series.set_flags(RSI_OVERSOLD, below(&rsi, self.params.oversold));
        series.set_flags(RSI_OVERBOUGHT, above(&rsi, self.params.overbought));
        series
    }

    fn analysis_text(&self, series: &PriceSeries, index: usize) -> String {
        let Some(rsi) = series.value(RSI, index) else {
            return insufficient_data(self.name());
        };

        let interpretation = if rsi > self.params.overbought {
            "[RSI 과매수] 가격 조정 가능성 (매도 참고)"
        } else if rsi < self.params.oversold {
            "[RSI 과매도] 가격 반등 가능성 (매수 참고)"
        } else if rsi > 50.0 {
            "[RSI>50] 매수세 우위"
        } else {
            "[RSI<=50] 매도세 우위"
        };

        [
            "【RSI 분석】".to_string(),
            format!("현재 RSI: {:.2}", rsi),
            format!("과매수 기준: {}", self.params.overbought),
            format!("과매도 기준: {}", self.params.oversold),
            interpretation.to_string(),
        ]
        .join("\n")
    }
}
