use crate::config::{AnalyzerConfig, SignalConfig};
use crate::indicator::columns::{
    KDJ_OVERBOUGHT, KDJ_OVERSOLD, MA_DEATH_CROSS, MA_GOLDEN_CROSS, MACD_DEATH_CROSS,
    MACD_GOLDEN_CROSS, RSI_OVERBOUGHT, RSI_OVERSOLD,
};
use crate::indicator::{Indicator, KDJ, MACD, MovingAverage, RelativeStrengthIndex};
use crate::model::{ScoreRow, Signal};
use crate::price_series::PriceSeries;
use log::{debug, info};

/// 한 바의 점수 계산에 쓰이는 신호 플래그 8개
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BarFlags {
    pub ma_golden_cross: bool,
    pub rsi_oversold: bool,
    pub macd_golden_cross: bool,
    pub kdj_oversold: bool,
    pub ma_death_cross: bool,
    pub rsi_overbought: bool,
    pub macd_death_cross: bool,
    pub kdj_overbought: bool,
}

impl BarFlags {
    /// 시계열의 지정된 바에서 플래그 읽기 (없는 컬럼은 false)
    pub fn from_series(series: &PriceSeries, index: usize) -> Self {
        BarFlags {
            ma_golden_cross: series.flag(MA_GOLDEN_CROSS, index),
            rsi_oversold: series.flag(RSI_OVERSOLD, index),
            macd_golden_cross: series.flag(MACD_GOLDEN_CROSS, index),
            kdj_oversold: series.flag(KDJ_OVERSOLD, index),
            ma_death_cross: series.flag(MA_DEATH_CROSS, index),
            rsi_overbought: series.flag(RSI_OVERBOUGHT, index),
            macd_death_cross: series.flag(MACD_DEATH_CROSS, index),
            kdj_overbought: series.flag(KDJ_OVERBOUGHT, index),
        }
    }
}

fn weighted(flag: bool, weight: u32) -> u32 {
    if flag { weight } else { 0 }
}

/// 가중치 합 (u32 최대값에서 포화)
fn total_score(weights: [u32; 4]) -> u32 {
    weights.into_iter().fold(0, u32::saturating_add)
}

/// 한 바의 매수/매도 점수와 분류 결과 계산
///
/// 기본값은 HOLD이고, 매도 점수가 기준 이상이면 SELL, 그 다음 매수 점수가 기준 이상이면
/// BUY로 덮어씁니다. 두 기준을 모두 넘는 바는 BUY가 됩니다.
///
/// # Arguments
/// * `flags` - 바의 신호 플래그
/// * `config` - 가중치와 기준값
///
/// # Returns
/// * `ScoreRow` - 매수 점수, 매도 점수, 분류 결과
pub fn score_bar(flags: &BarFlags, config: &SignalConfig) -> ScoreRow {
    let buy = &config.buy_weights;
    let sell = &config.sell_weights;

    let buy_score = total_score([
        weighted(flags.ma_golden_cross, buy.ma_golden_cross),
        weighted(flags.rsi_oversold, buy.rsi_oversold),
        weighted(flags.macd_golden_cross, buy.macd_golden_cross),
        weighted(flags.kdj_oversold, buy.kdj_oversold),
    ]);
    let sell_score = total_score([
        weighted(flags.ma_death_cross, sell.ma_death_cross),
        weighted(flags.rsi_overbought, sell.rsi_overbought),
        weighted(flags.macd_death_cross, sell.macd_death_cross),
        weighted(flags.kdj_overbought, sell.kdj_overbought),
    ]);

    let mut signal = Signal::Hold;
    if sell_score >= config.sell_threshold {
        signal = Signal::Sell;
    }
    if buy_score >= config.buy_threshold {
        signal = Signal::Buy;
    }

    ScoreRow {
        buy_score,
        sell_score,
        signal,
    }
}

/// 매수/매도 신호 분석기
///
/// 이동평균, RSI, MACD, KDJ 순서로 지표와 신호 플래그를 계산한 뒤
/// 바마다 가중 점수를 매기고 BUY/SELL/HOLD로 분류합니다.
/// 분석기 자체는 상태를 갖지 않으므로 여러 시계열에 반복해서 사용할 수 있습니다.
#[derive(Debug, Clone)]
pub struct SignalAnalyzer {
    config: AnalyzerConfig,
    pub(crate) ma: MovingAverage,
    pub(crate) rsi: RelativeStrengthIndex,
    pub(crate) macd: MACD,
    pub(crate) kdj: KDJ,
}

impl SignalAnalyzer {
    /// 새 분석기 생성
    ///
    /// # Arguments
    /// * `config` - 지표 및 점수 설정
    ///
    /// # Panics
    /// * 지표 기간이 0이거나 MACD 빠른 기간이 느린 기간 이상이면 패닉 발생
    ///   (`ConfigValidation::validate`를 통과한 설정은 패닉하지 않음)
    pub fn new(config: AnalyzerConfig) -> Self {
        SignalAnalyzer {
            ma: MovingAverage::new(config.indicators.ma),
            rsi: RelativeStrengthIndex::new(config.indicators.rsi),
            macd: MACD::new(config.indicators.macd),
            kdj: KDJ::new(config.indicators.kdj),
            config,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// 지표 목록 (계산 순서)
    pub fn indicators(&self) -> [&dyn Indicator; 4] {
        [&self.ma, &self.rsi, &self.macd, &self.kdj]
    }

    /// 시계열 분석
    ///
    /// # Arguments
    /// * `series` - 가격 시계열
    ///
    /// # Returns
    /// * `PriceSeries` - 모든 지표/플래그 컬럼과 BUY_SCORE, SELL_SCORE, SIGNAL이 추가된 시계열
    pub fn analyze(&self, series: PriceSeries) -> PriceSeries {
        info!("주식 데이터 분석 시작: {}", series);

        // 기존 지표 컬럼이 있어도 현재 설정으로 다시 계산
        let mut series = series;
        for indicator in self.indicators() {
            series = indicator.signals(indicator.calculate(series));
            debug!("{} 신호 계산 완료", indicator.name());
        }

        let scores: Vec<ScoreRow> = (0..series.len())
            .map(|index| score_bar(&BarFlags::from_series(&series, index), &self.config.signal))
            .collect();

        let buy_count = scores.iter().filter(|s| s.signal == Signal::Buy).count();
        let sell_count = scores.iter().filter(|s| s.signal == Signal::Sell).count();
        series.set_scores(scores);

        info!(
            "분석 완료: 매수 신호 {}건, 매도 신호 {}건",
            buy_count, sell_count
        );
        series
    }
}

impl Default for SignalAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}
