use crate::analyzer::{AnalysisError, AnalysisResult, SignalAnalyzer};
use crate::indicator::columns::RSI;
use crate::indicator::ma::{MATrend, ma_trend};
use crate::model::{Signal, SignalRecord};
use crate::price_series::PriceSeries;
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

const RISK_NOTICE: &str =
    "[위험 고지] 기술적 분석은 참고용이며 투자 권유가 아닙니다. 투자에는 위험이 따르니 신중하게 판단하세요.";

/// 최신 바의 분석 요약 (일괄 분류용)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalSummary {
    pub date: NaiveDate,
    /// 종가
    pub price: f64,
    pub signal: Signal,
    pub buy_score: u32,
    pub sell_score: u32,
    pub rsi: Option<f64>,
    #[serde(serialize_with = "serialize_display")]
    pub ma_trend: MATrend,
}

fn serialize_display<S: serde::Serializer>(value: &MATrend, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// 거래량을 천 단위 구분 기호가 있는 정수 문자열로 변환
fn format_volume(volume: f64) -> String {
    let digits = format!("{:.0}", volume.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if volume < 0.0 && grouped != "0" {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn boxed(title: &str, lines: &[String]) -> String {
    let rule = "═".repeat(52);
    let mut text = format!("╔{}╗\n║  {}\n╠{}╣\n", rule, title, rule);
    for line in lines {
        text.push_str(&format!("║  {}\n", line));
    }
    text.push_str(&format!("╚{}╝", rule));
    text
}

/// 행 인덱스 확인 (None이면 마지막 행)
fn resolve_index(series: &PriceSeries, index: Option<usize>) -> AnalysisResult<usize> {
    if series.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }
    let index = index.unwrap_or(series.len() - 1);
    if index >= series.len() {
        return Err(AnalysisError::IndexOutOfRange {
            index,
            len: series.len(),
        });
    }
    Ok(index)
}

impl SignalAnalyzer {
    /// 지정된 바의 분석 보고서 생성
    ///
    /// 지표 값이 없는 구간은 해당 지표 부분만 "데이터 부족"으로 표시합니다.
    ///
    /// # Arguments
    /// * `series` - `analyze`를 거친 시계열
    /// * `index` - 대상 행 (None이면 마지막 행)
    ///
    /// # Returns
    /// * `AnalysisResult<String>` - 보고서 문자열, 빈 시계열이나 범위를 벗어난 인덱스는 에러
    pub fn get_analysis_report(
        &self,
        series: &PriceSeries,
        index: Option<usize>,
    ) -> AnalysisResult<String> {
        let index = resolve_index(series, index)?;
        let bar = series.bar(index).ok_or(AnalysisError::IndexOutOfRange {
            index,
            len: series.len(),
        })?;
        debug!("분석 보고서 생성: {}번째 행 ({})", index, bar.date);

        let mut report = boxed(
            "주식 기술적 분석 보고서",
            &[
                format!("거래일: {}", bar.date.format("%Y%m%d")),
                format!("종가: {:.2}", bar.close),
                format!("고가: {:.2}", bar.high),
                format!("저가: {:.2}", bar.low),
                format!("거래량: {}", format_volume(bar.volume)),
            ],
        );
        report.push_str("\n\n");

        for indicator in self.indicators() {
            report.push_str(&indicator.analysis_text(series, index));
            report.push_str("\n\n");
        }

        let score = series.score(index).unwrap_or_default();
        let signal_config = &self.config().signal;
        report.push_str(&boxed(
            "종합 점수와 매매 의견",
            &[
                format!(
                    "매수 신호 점수: {} / {}",
                    score.buy_score, signal_config.buy_threshold
                ),
                format!(
                    "매도 신호 점수: {} / {}",
                    score.sell_score, signal_config.sell_threshold
                ),
            ],
        ));

        let recommendation = match score.signal {
            Signal::Buy => "[매수 추천] 여러 매수 지표가 나타났습니다. 주목하세요!",
            Signal::Sell => "[매도 추천] 여러 매도 지표가 나타났습니다. 위험에 유의하세요!",
            Signal::Hold => "[관망 추천] 뚜렷한 매매 신호가 없습니다. 계속 지켜보세요.",
        };
        report.push_str("\n\n");
        report.push_str(recommendation);
        report.push_str("\n\n");
        report.push_str(RISK_NOTICE);

        Ok(report)
    }

    /// 최근 매매 신호 조회
    ///
    /// 마지막 `days`개 바 중 SIGNAL이 HOLD가 아닌 바만 시간 순서대로 돌려줍니다.
    pub fn get_recent_signals(&self, series: &PriceSeries, days: usize) -> Vec<SignalRecord> {
        let start = series.len().saturating_sub(days);
        series.bars()[start..]
            .iter()
            .enumerate()
            .filter_map(|(offset, bar)| {
                let score = series.score(start + offset)?;
                if score.signal == Signal::Hold {
                    return None;
                }
                Some(SignalRecord {
                    date: bar.date,
                    signal: score.signal,
                    price: bar.close,
                    buy_score: score.buy_score,
                    sell_score: score.sell_score,
                })
            })
            .collect()
    }

    /// 마지막 바의 분석 요약
    ///
    /// # Returns
    /// * `AnalysisResult<SignalSummary>` - 빈 시계열이거나 마지막 바에 이동평균 값이 없으면 에러
    pub fn latest_summary(&self, series: &PriceSeries) -> AnalysisResult<SignalSummary> {
        let index = resolve_index(series, None)?;
        let bar = series.bar(index).ok_or(AnalysisError::EmptySeries)?;
        let trend = ma_trend(series, index).ok_or(AnalysisError::InsufficientData("MA"))?;
        let score = series.score(index).unwrap_or_default();

        Ok(SignalSummary {
            date: bar.date,
            price: bar.close,
            signal: score.signal,
            buy_score: score.buy_score,
            sell_score: score.sell_score,
            rsi: series.value(RSI, index),
            ma_trend: trend,
        })
    }
}
