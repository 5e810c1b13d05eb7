use crate::config::KDJParams;
use crate::indicator::columns::{
    KDJ_D, KDJ_J, KDJ_K, KDJ_KD_DEATH_CROSS, KDJ_KD_GOLDEN_CROSS, KDJ_OVERBOUGHT, KDJ_OVERSOLD,
};
use crate::indicator::utils::{
    above, below, death_cross, difference, ewm, golden_cross, period_alpha, rolling_max,
    rolling_min,
};
use crate::indicator::{Indicator, column_values, insufficient_data};
use crate::price_series::PriceSeries;
use log::debug;

/// 고저 범위가 없는 첫 윈도우의 RSV
const FLAT_WINDOW_RSV: f64 = 50.0;

/// RSV(Raw Stochastic Value) 계산
///
/// 고가와 저가가 같은 윈도우에서는 직전 RSV를 그대로 쓰고,
/// 직전 값이 없으면 중간값 50을 사용합니다.
fn calculate_rsv(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let high_n = rolling_max(highs, period);
    let low_n = rolling_min(lows, period);

    let mut previous: Option<f64> = None;
    closes
        .iter()
        .zip(high_n.iter().zip(low_n.iter()))
        .map(|(close, window)| {
            let (Some(high), Some(low)) = window else {
                return None;
            };
            let rsv = if high == low {
                previous.unwrap_or(FLAT_WINDOW_RSV)
            } else {
                (close - low) / (high - low) * 100.0
            };
            previous = Some(rsv);
            Some(rsv)
        })
        .collect()
}

/// KDJ(스토캐스틱) 지표
///
/// K는 RSV의 지수평활(alpha = 1 / d_period), D는 K의 지수평활(alpha = 1 / j_period),
/// J = 3K - 2D 입니다. J는 [0, 100] 범위로 제한하지 않습니다.
#[derive(Debug, Clone, Copy)]
pub struct KDJ {
    params: KDJParams,
}

impl KDJ {
    /// 새 KDJ 지표 생성
    ///
    /// # Panics
    /// * 기간 중 하나라도 0이면 패닉 발생
    pub fn new(params: KDJParams) -> Self {
        if params.k_period == 0 || params.d_period == 0 || params.j_period == 0 {
            panic!("KDJ 기간은 0보다 커야 합니다");
        }
        KDJ { params }
    }

    pub fn params(&self) -> &KDJParams {
        &self.params
    }
}

impl Default for KDJ {
    fn default() -> Self {
        Self::new(KDJParams::default())
    }
}

impl Indicator for KDJ {
    fn name(&self) -> &'static str {
        "KDJ"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[KDJ_K, KDJ_D]
    }

    fn calculate(&self, mut series: PriceSeries) -> PriceSeries {
        let rsv = calculate_rsv(
            &series.highs(),
            &series.lows(),
            &series.closes(),
            self.params.k_period,
        );
        let k = ewm(&rsv, period_alpha(self.params.d_period));
        let d = ewm(&k, period_alpha(self.params.j_period));
        let j = k
            .iter()
            .zip(d.iter())
            .map(|(k, d)| match (k, d) {
                (Some(k), Some(d)) => Some(3.0 * k - 2.0 * d),
                _ => None,
            })
            .collect();

        series.set_values(KDJ_K, k);
        series.set_values(KDJ_D, d);
        series.set_values(KDJ_J, j);

        debug!(
            "KDJ 지표 계산 완료, 기간: {}/{}/{}",
            self.params.k_period, self.params.d_period, self.params.j_period
        );
        series
    }

    fn signals(&self, mut series: PriceSeries) -> PriceSeries {
        let k = column_values(&series, KDJ_K);
        let diff = difference(&k, &column_values(&series, KDJ_D));

        series.set_flags(KDJ_OVERSOLD, below(&k, self.params.oversold));
        series.set_flags(KDJ_OVERBOUGHT, above(&k, self.params.overbought));
        series.set_flags(KDJ_KD_GOLDEN_CROSS, golden_cross(&diff));
        series.set_flags(KDJ_KD_DEATH_CROSS, death_cross(&diff));
        series
    }

    fn analysis_text(&self, series: &PriceSeries, index: usize) -> String {
        let (Some(k), Some(d)) = (series.value(KDJ_K, index), series.value(KDJ_D, index)) else {
            return insufficient_data(self.name());
        };
        let j = series.value(KDJ_J, index).unwrap_or(3.0 * k - 2.0 * d);

        let mut lines = vec![
            "【KDJ 분석】".to_string(),
            format!("K: {:.2}, D: {:.2}, J: {:.2}", k, d, j),
        ];

        if k > self.params.overbought {
            lines.push(format!(
                "[KDJ 과매수] K가 {} 초과 (매도 참고)",
                self.params.overbought
            ));
        } else if k < self.params.oversold {
            lines.push(format!(
                "[KDJ 과매도] K가 {} 미만 (매수 참고)",
                self.params.oversold
            ));
        }

        if series.flag(KDJ_KD_GOLDEN_CROSS, index) {
            lines.push("[KD 골든 크로스 발생 (매수 참고)]".to_string());
        } else if series.flag(KDJ_KD_DEATH_CROSS, index) {
            lines.push("[KD 데드 크로스 발생 (매도 참고)]".to_string());
        }

        lines.join("\n")
    }
}
