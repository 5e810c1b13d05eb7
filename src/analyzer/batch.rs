use crate::analyzer::{AnalysisError, SignalAnalyzer, SignalSummary};
use crate::config::AnalyzerConfig;
use crate::model::Signal;
use crate::price_series::PriceSeries;
use log::{info, warn};

/// 보고서에 표시할 관망 종목 수
const HOLD_DISPLAY_LIMIT: usize = 10;
/// 보고서에 표시할 실패 종목 수
const FAILED_DISPLAY_LIMIT: usize = 5;

/// 일괄 분석 대상 종목
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub code: String,
    pub name: String,
    pub series: PriceSeries,
}

impl BatchItem {
    pub fn new(code: impl Into<String>, name: impl Into<String>, series: PriceSeries) -> Self {
        BatchItem {
            code: code.into(),
            name: name.into(),
            series,
        }
    }
}

/// 분류된 종목
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStock {
    pub code: String,
    pub name: String,
    pub summary: SignalSummary,
}

/// 분석에 실패한 종목
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    pub code: String,
    pub name: String,
    pub reason: String,
}

/// 일괄 분석 결과
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub buy: Vec<BatchStock>,
    pub sell: Vec<BatchStock>,
    pub hold: Vec<BatchStock>,
    pub failed: Vec<BatchFailure>,
}

impl BatchResult {
    /// 분류에 성공한 종목 수
    pub fn succeeded(&self) -> usize {
        self.buy.len() + self.sell.len() + self.hold.len()
    }

    pub fn total(&self) -> usize {
        self.succeeded() + self.failed.len()
    }

    /// 텍스트 보고서 생성
    ///
    /// 관망 종목은 앞의 10개, 실패 종목은 앞의 5개만 나열합니다.
    pub fn render(&self) -> String {
        let rule = "=".repeat(80);
        let line = "-".repeat(80);
        let mut lines = vec![rule.clone(), "일괄 종목 분석 보고서".to_string(), rule.clone()];

        lines.push(format!("\n【매수 추천】({}종목)", self.buy.len()));
        lines.push(line.clone());
        if self.buy.is_empty() {
            lines.push("없음".to_string());
        }
        for (i, stock) in self.buy.iter().enumerate() {
            lines.push(format!("{}. {} ({})", i + 1, stock.name, stock.code));
            lines.push(format!(
                "   가격: {:.2} | 매수 점수: {} | RSI: {} | MA 배열: {}",
                stock.summary.price,
                stock.summary.buy_score,
                format_rsi(stock.summary.rsi),
                stock.summary.ma_trend
            ));
        }

        lines.push(format!("\n【매도 추천】({}종목)", self.sell.len()));
        lines.push(line.clone());
        if self.sell.is_empty() {
            lines.push("없음".to_string());
        }
        for (i, stock) in self.sell.iter().enumerate() {
            lines.push(format!("{}. {} ({})", i + 1, stock.name, stock.code));
            lines.push(format!(
                "   가격: {:.2} | 매도 점수: {} | RSI: {} | MA 배열: {}",
                stock.summary.price,
                stock.summary.sell_score,
                format_rsi(stock.summary.rsi),
                stock.summary.ma_trend
            ));
        }

        lines.push(format!("\n【관망 추천】({}종목)", self.hold.len()));
        lines.push(line.clone());
        if self.hold.is_empty() {
            lines.push("없음".to_string());
        }
        for (i, stock) in self.hold.iter().take(HOLD_DISPLAY_LIMIT).enumerate() {
            lines.push(format!("{}. {} ({})", i + 1, stock.name, stock.code));
            lines.push(format!(
                "   가격: {:.2} | 매수 점수: {} | 매도 점수: {} | RSI: {}",
                stock.summary.price,
                stock.summary.buy_score,
                stock.summary.sell_score,
                format_rsi(stock.summary.rsi)
            ));
        }
        if self.hold.len() > HOLD_DISPLAY_LIMIT {
            lines.push(format!(
                "   ... 외 {}종목",
                self.hold.len() - HOLD_DISPLAY_LIMIT
            ));
        }

        if !self.failed.is_empty() {
            lines.push(format!("\n【분석 실패】({}종목)", self.failed.len()));
            lines.push(line);
            for (i, failure) in self.failed.iter().take(FAILED_DISPLAY_LIMIT).enumerate() {
                lines.push(format!(
                    "{}. {} ({}) - {}",
                    i + 1,
                    failure.name,
                    failure.code,
                    failure.reason
                ));
            }
            if self.failed.len() > FAILED_DISPLAY_LIMIT {
                lines.push(format!(
                    "   ... 외 {}종목",
                    self.failed.len() - FAILED_DISPLAY_LIMIT
                ));
            }
        }

        lines.push(format!("\n{}", rule));
        lines.push(format!(
            "합계: 분석 성공 {}종목, 실패 {}종목",
            self.succeeded(),
            self.failed.len()
        ));
        lines.push(rule);
        lines.join("\n")
    }
}

fn format_rsi(rsi: Option<f64>) -> String {
    rsi.map(|value| format!("{:.2}", value))
        .unwrap_or_else(|| "-".to_string())
}

/// 여러 종목을 분석해 최신 바의 신호로 분류하는 일괄 분석기
#[derive(Debug, Clone, Default)]
pub struct BatchAnalyzer {
    analyzer: SignalAnalyzer,
}

impl BatchAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        BatchAnalyzer {
            analyzer: SignalAnalyzer::new(config),
        }
    }

    pub fn analyzer(&self) -> &SignalAnalyzer {
        &self.analyzer
    }

    fn classify(&self, series: PriceSeries) -> Result<SignalSummary, AnalysisError> {
        if series.is_empty() {
            return Err(AnalysisError::EmptySeries);
        }
        let series = self.analyzer.analyze(series);
        self.analyzer.latest_summary(&series)
    }

    /// 종목 목록 일괄 분석
    ///
    /// 각 종목은 독립적으로 분석되며 한 종목의 실패가 나머지 분석을 중단하지 않습니다.
    ///
    /// # Arguments
    /// * `items` - 분석 대상 종목
    ///
    /// # Returns
    /// * `BatchResult` - 매수/매도/관망/실패로 분류된 결과
    pub fn analyze_batch(&self, items: Vec<BatchItem>) -> BatchResult {
        let total = items.len();
        info!("일괄 분석 시작: {}종목", total);

        let mut result = BatchResult::default();
        for (i, item) in items.into_iter().enumerate() {
            info!("[{}/{}] {} ({}) 분석", i + 1, total, item.name, item.code);

            let BatchItem { code, name, series } = item;
            match self.classify(series) {
                Ok(summary) => {
                    let signal = summary.signal;
                    let stock = BatchStock {
                        code,
                        name,
                        summary,
                    };
                    match signal {
                        Signal::Buy => result.buy.push(stock),
                        Signal::Sell => result.sell.push(stock),
                        Signal::Hold => result.hold.push(stock),
                    }
                }
                Err(err) => {
                    warn!("{} ({}) 분석 실패: {}", name, code, err);
                    result.failed.push(BatchFailure {
                        code,
                        name,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            "일괄 분석 완료: 매수 {}, 매도 {}, 관망 {}, 실패 {}",
            result.buy.len(),
            result.sell.len(),
            result.hold.len(),
            result.failed.len()
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::ma::MATrend;
    use crate::test_utils::{series_from_closes, trade_date};

    fn summary(price: f64, signal: Signal) -> SignalSummary {
        SignalSummary {
            date: trade_date(0),
            price,
            signal,
            buy_score: 0,
            sell_score: 0,
            rsi: Some(50.0),
            ma_trend: MATrend::Tangled,
        }
    }

    fn stock(i: usize) -> BatchStock {
        BatchStock {
            code: format!("{:06}", i),
            name: format!("종목{}", i),
            summary: summary(100.0, Signal::Hold),
        }
    }

    #[test]
    fn test_failures_do_not_abort_batch() {
        let items = vec![
            BatchItem::new("000001", "빈 데이터", PriceSeries::new(vec![]).unwrap()),
            BatchItem::new("000002", "짧은 데이터", series_from_closes(&[10.0; 5])),
            BatchItem::new(
                "000003",
                "상승",
                series_from_closes(&(0..40).map(|i| 100.0 + i as f64).collect::<Vec<_>>()),
            ),
        ];
        let result = BatchAnalyzer::default().analyze_batch(items);

        assert_eq!(result.failed.len(), 2);
        assert_eq!(result.failed[0].reason, "데이터 없음");
        assert_eq!(result.failed[1].reason, "MA 데이터 부족");
        assert_eq!(result.sell.len(), 1);
        assert_eq!(result.sell[0].code, "000003");
        assert_eq!(result.total(), 3);
        assert_eq!(result.succeeded(), 1);
    }

    #[test]
    fn test_render_limits_hold_and_failed_lists() {
        let result = BatchResult {
            buy: vec![],
            sell: vec![],
            hold: (0..12).map(stock).collect(),
            failed: (0..7)
                .map(|i| BatchFailure {
                    code: format!("F{}", i),
                    name: format!("실패{}", i),
                    reason: "데이터 없음".to_string(),
                })
                .collect(),
        };
        let text = result.render();

        assert!(text.contains("【매수 추천】(0종목)"));
        assert!(text.contains("【관망 추천】(12종목)"));
        assert!(text.contains("10. 종목9 (000009)"));
        assert!(!text.contains("종목10"));
        assert!(text.contains("... 외 2종목"));
        assert!(text.contains("5. 실패4 (F4) - 데이터 없음"));
        assert!(!text.contains("실패5"));
        assert!(text.contains("합계: 분석 성공 12종목, 실패 7종목"));
    }
}
