use crate::config_loader::{ConfigError, ConfigResult, ConfigValidation};
use serde::{Deserialize, Serialize};

/// 이동평균 설정
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MAParams {
    /// 단기 이동평균 기간
    pub short_period: usize,
    /// 중기 이동평균 기간
    pub medium_period: usize,
    /// 장기 이동평균 기간
    pub long_period: usize,
}

impl Default for MAParams {
    fn default() -> Self {
        MAParams {
            short_period: 5,
            medium_period: 20,
            long_period: 60,
        }
    }
}

/// RSI 설정
///
/// 과매도 기준 35는 일반적인 30보다 민감하게 조정된 값입니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RSIParams {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RSIParams {
    fn default() -> Self {
        RSIParams {
            period: 14,
            overbought: 70.0,
            oversold: 35.0,
        }
    }
}

/// MACD 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct MACDParams {
    /// 빠른 EMA 기간
    pub fast_period: usize,
    /// 느린 EMA 기간
    pub slow_period: usize,
    /// 시그널 라인 기간
    pub signal_period: usize,
}

impl Default for MACDParams {
    fn default() -> Self {
        MACDParams {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// KDJ 설정
///
/// `d_period`는 RSV에서 K를, `j_period`는 K에서 D를 만드는 평활 기간입니다
/// (평활 계수 1/기간).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KDJParams {
    /// 최고가/최저가 구간 길이
    pub k_period: usize,
    pub d_period: usize,
    pub j_period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for KDJParams {
    fn default() -> Self {
        KDJParams {
            k_period: 9,
            d_period: 3,
            j_period: 3,
            overbought: 80.0,
            oversold: 25.0,
        }
    }
}

/// 지표별 설정 묶음
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub ma: MAParams,
    pub rsi: RSIParams,
    pub macd: MACDParams,
    pub kdj: KDJParams,
}

/// 매수 조건별 가중치
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyWeights {
    pub ma_golden_cross: u32,
    pub rsi_oversold: u32,
    pub macd_golden_cross: u32,
    pub kdj_oversold: u32,
}

impl Default for BuyWeights {
    fn default() -> Self {
        BuyWeights {
            ma_golden_cross: 3,
            rsi_oversold: 3,
            macd_golden_cross: 3,
            kdj_oversold: 3,
        }
    }
}

/// 매도 조건별 가중치
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SellWeights {
    pub ma_death_cross: u32,
    pub rsi_overbought: u32,
    pub macd_death_cross: u32,
    pub kdj_overbought: u32,
}

impl Default for SellWeights {
    fn default() -> Self {
        SellWeights {
            ma_death_cross: 3,
            rsi_overbought: 3,
            macd_death_cross: 3,
            kdj_overbought: 3,
        }
    }
}

/// 종합 점수 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// 매수 점수 기준값
    pub buy_threshold: u32,
    /// 매도 점수 기준값
    pub sell_threshold: u32,
    pub buy_weights: BuyWeights,
    pub sell_weights: SellWeights,
}

impl Default for SignalConfig {
    fn default() -> Self {
        SignalConfig {
            buy_threshold: 3,
            sell_threshold: 3,
            buy_weights: BuyWeights::default(),
            sell_weights: SellWeights::default(),
        }
    }
}

/// 분석기 전체 설정
///
/// 분석 시점에 값으로 전달되며 분석기 내부에서 변경되지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub indicators: IndicatorConfig,
    pub signal: SignalConfig,
}

fn validation_error(msg: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(msg.into())
}

/// 과매수/과매도 기준값 검사
fn validate_thresholds(name: &str, oversold: f64, overbought: f64) -> ConfigResult<()> {
    let in_range = |value: f64| (0.0..=100.0).contains(&value);
    if !in_range(oversold) || !in_range(overbought) {
        return Err(validation_error(format!(
            "{} 기준값은 0~100 범위여야 합니다: 과매도 {}, 과매수 {}",
            name, oversold, overbought
        )));
    }
    if oversold >= overbought {
        return Err(validation_error(format!(
            "{} 과매도 기준값({})은 과매수 기준값({})보다 작아야 합니다",
            name, oversold, overbought
        )));
    }
    Ok(())
}

impl ConfigValidation for MAParams {
    fn validate(&self) -> ConfigResult<()> {
        if self.short_period == 0 || self.medium_period == 0 || self.long_period == 0 {
            return Err(validation_error("이동평균 기간은 0보다 커야 합니다"));
        }
        if !(self.short_period < self.medium_period && self.medium_period < self.long_period) {
            return Err(validation_error(format!(
                "이동평균 기간은 오름차순이어야 합니다: {}/{}/{}",
                self.short_period, self.medium_period, self.long_period
            )));
        }
        Ok(())
    }
}

impl ConfigValidation for RSIParams {
    fn validate(&self) -> ConfigResult<()> {
        if self.period == 0 {
            return Err(validation_error("RSI 기간은 0보다 커야 합니다"));
        }
        validate_thresholds("RSI", self.oversold, self.overbought)
    }
}

impl ConfigValidation for MACDParams {
    fn validate(&self) -> ConfigResult<()> {
        if self.fast_period == 0 || self.slow_period == 0 || self.signal_period == 0 {
            return Err(validation_error("MACD 기간은 0보다 커야 합니다"));
        }
        if self.fast_period >= self.slow_period {
            return Err(validation_error("빠른 기간은 느린 기간보다 작아야 합니다"));
        }
        Ok(())
    }
}

impl ConfigValidation for KDJParams {
    fn validate(&self) -> ConfigResult<()> {
        if self.k_period == 0 || self.d_period == 0 || self.j_period == 0 {
            return Err(validation_error("KDJ 기간은 0보다 커야 합니다"));
        }
        validate_thresholds("KDJ", self.oversold, self.overbought)
    }
}

impl ConfigValidation for SignalConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.buy_threshold == 0 || self.sell_threshold == 0 {
            return Err(validation_error(
                "매수/매도 점수 기준값은 0보다 커야 합니다",
            ));
        }
        Ok(())
    }
}

impl ConfigValidation for AnalyzerConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.indicators.ma.validate()?;
        self.indicators.rsi.validate()?;
        self.indicators.macd.validate()?;
        self.indicators.kdj.validate()?;
        self.signal.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_loader::{ConfigFormat, ConfigLoader};

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.indicators.ma.short_period, 5);
        assert_eq!(config.indicators.ma.medium_period, 20);
        assert_eq!(config.indicators.ma.long_period, 60);
        assert_eq!(config.indicators.rsi.period, 14);
        assert_eq!(config.indicators.rsi.overbought, 70.0);
        assert_eq!(config.indicators.rsi.oversold, 35.0);
        assert_eq!(config.indicators.macd, MACDParams::default());
        assert_eq!(config.indicators.kdj.k_period, 9);
        assert_eq!(config.indicators.kdj.overbought, 80.0);
        assert_eq!(config.indicators.kdj.oversold, 25.0);
        assert_eq!(config.signal.buy_weights.kdj_oversold, 3);
        assert_eq!(config.signal.sell_weights.ma_death_cross, 3);
        assert_eq!(config.signal.buy_threshold, 3);
        assert_eq!(config.signal.sell_threshold, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_str = r#"
            [indicators.rsi]
            oversold = 30.0

            [signal]
            buy_threshold = 6
        "#;
        let config =
            ConfigLoader::load_from_string::<AnalyzerConfig>(toml_str, ConfigFormat::Toml)
                .unwrap();
        assert_eq!(config.indicators.rsi.oversold, 30.0);
        assert_eq!(config.indicators.rsi.overbought, 70.0);
        assert_eq!(config.signal.buy_threshold, 6);
        assert_eq!(config.signal.sell_threshold, 3);
        assert_eq!(config.indicators.ma, MAParams::default());
    }

    #[test]
    fn test_invalid_ma_order() {
        let json = r#"{"indicators":{"ma":{"short_period":20,"medium_period":5}}}"#;
        let result = ConfigLoader::load_from_string::<AnalyzerConfig>(json, ConfigFormat::Json);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_invalid_macd_periods() {
        let params = MACDParams {
            fast_period: 26,
            slow_period: 12,
            signal_period: 9,
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_invalid_thresholds() {
        let rsi = RSIParams {
            period: 14,
            overbought: 30.0,
            oversold: 70.0,
        };
        assert!(rsi.validate().is_err());

        let kdj = KDJParams {
            overbought: 120.0,
            ..KDJParams::default()
        };
        assert!(kdj.validate().is_err());
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let signal = SignalConfig {
            sell_threshold: 0,
            ..SignalConfig::default()
        };
        assert!(signal.validate().is_err());
    }
}
