use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 일봉 가격 데이터
///
/// 하루치 시가/고가/저가/종가와 거래량을 담습니다. 한 번 생성되면 변경되지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// 거래일
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// 거래량 (원본 데이터에 없으면 0)
    #[serde(default)]
    pub volume: f64,
}

impl PriceBar {
    /// 새 가격 바 생성
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        PriceBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl Display for PriceBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PriceBar({}, o={:.2}, h={:.2}, l={:.2}, c={:.2}, v={:.0})",
            self.date, self.open, self.high, self.low, self.close, self.volume
        )
    }
}

/// 트레이딩 신호를 나타내는 열거형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    /// 매수 신호
    Buy,
    /// 매도 신호
    Sell,
    /// 관망 신호
    #[default]
    Hold,
}

impl Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

/// 한 바에 대한 종합 점수와 분류 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScoreRow {
    pub buy_score: u32,
    pub sell_score: u32,
    pub signal: Signal,
}

/// 최근 신호 조회 결과의 한 항목
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalRecord {
    pub date: NaiveDate,
    pub signal: Signal,
    /// 해당 바의 종가
    pub price: f64,
    pub buy_score: u32,
    pub sell_score: u32,
}

impl Display for SignalRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.signal {
            Signal::Buy => "[매수]",
            Signal::Sell => "[매도]",
            Signal::Hold => "[관망]",
        };
        write!(
            f,
            "{} | 날짜: {} | 가격: {:.2} | 매수 점수: {} | 매도 점수: {}",
            label, self.date, self.price, self.buy_score, self.sell_score
        )
    }
}
