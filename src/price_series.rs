use crate::model::{PriceBar, ScoreRow, Signal};
use chrono::NaiveDate;
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// 가격 시계열 관련 오류
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesError {
    /// 데이터가 비어 있음
    Empty,
    /// 날짜가 엄격한 오름차순이 아님 (중복 포함)
    NonMonotonicDates {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },
    /// 유한하지 않은 가격 값
    InvalidPrice { index: usize, field: &'static str },
    /// 컬럼 길이가 행 수와 다름
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    /// 날짜 문자열 파싱 실패
    InvalidDate { index: usize, value: String },
    /// CSV 처리 오류
    Csv(String),
    /// 입출력 오류
    Io(String),
}

impl Display for SeriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesError::Empty => write!(f, "가격 데이터가 비어 있습니다"),
            SeriesError::NonMonotonicDates {
                index,
                previous,
                current,
            } => write!(
                f,
                "날짜가 오름차순이 아닙니다: {}번째 행 {} (이전 {})",
                index, current, previous
            ),
            SeriesError::InvalidPrice { index, field } => {
                write!(f, "유효하지 않은 가격: {}번째 행의 {}", index, field)
            }
            SeriesError::LengthMismatch {
                column,
                expected,
                actual,
            } => write!(
                f,
                "컬럼 길이 불일치: {} (기대값 {}, 실제 {})",
                column, expected, actual
            ),
            SeriesError::InvalidDate { index, value } => {
                write!(f, "날짜 파싱 실패: {}번째 행 '{}'", index, value)
            }
            SeriesError::Csv(msg) => write!(f, "CSV 오류: {}", msg),
            SeriesError::Io(msg) => write!(f, "입출력 오류: {}", msg),
        }
    }
}

impl std::error::Error for SeriesError {}

impl From<csv::Error> for SeriesError {
    fn from(err: csv::Error) -> Self {
        SeriesError::Csv(err.to_string())
    }
}

impl From<std::io::Error> for SeriesError {
    fn from(err: std::io::Error) -> Self {
        SeriesError::Io(err.to_string())
    }
}

pub type SeriesResult<T> = Result<T, SeriesError>;

/// 이름이 붙은 컬럼 컬렉션
///
/// 추가된 순서대로 키를 유지하며, 같은 이름으로 다시 넣으면 값만 교체됩니다.
#[derive(Debug, Clone)]
pub struct Columns<T> {
    /// 순서가 유지되는 키 목록
    keys: Vec<String>,
    /// 키-값 쌍으로 저장된 컬럼 데이터
    data: HashMap<String, Vec<T>>,
}

impl<T> Default for Columns<T> {
    fn default() -> Self {
        Columns {
            keys: Vec::new(),
            data: HashMap::new(),
        }
    }
}

impl<T> Columns<T> {
    /// 키 목록 참조 반환
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// 지정된 키의 컬럼 반환
    pub fn get(&self, key: &str) -> Option<&[T]> {
        self.data.get(key).map(|values| values.as_slice())
    }

    /// 컬럼 삽입 (이미 있으면 교체)
    fn insert(&mut self, key: &str, values: Vec<T>) {
        if !self.data.contains_key(key) {
            self.keys.push(key.to_owned());
        }
        self.data.insert(key.to_owned(), values);
    }
}

/// 지표 컬럼이 붙는 가격 시계열
///
/// 행의 순서와 개수는 생성 이후 바뀌지 않으며, 각 단계는 컬럼만 추가합니다.
/// 지표 값은 `Option<f64>`로 저장되며 `None`은 이력이 부족해 정의되지 않은 값입니다.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
    /// 수치 지표 컬럼 (MA_SHORT, RSI, ...)
    values: Columns<Option<f64>>,
    /// 신호 플래그 컬럼 (MA_GOLDEN_CROSS, ...)
    flags: Columns<bool>,
    /// BUY_SCORE / SELL_SCORE / SIGNAL
    scores: Option<Vec<ScoreRow>>,
}

impl Display for PriceSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => write!(
                f,
                "PriceSeries({}건, {} ~ {}, 컬럼 {}개)",
                self.bars.len(),
                first.date,
                last.date,
                self.values.keys().len() + self.flags.keys().len()
            ),
            _ => write!(f, "PriceSeries(데이터 없음)"),
        }
    }
}

/// 거래일 문자열 파싱 (`YYYYMMDD`, `YYYY-MM-DD`, `YYYY/MM/DD`)
pub fn parse_trade_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    ["%Y%m%d", "%Y-%m-%d", "%Y/%m/%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// CSV 한 행
#[derive(Debug, Deserialize)]
struct CsvBar {
    #[serde(alias = "date")]
    trade_date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default, alias = "vol")]
    volume: Option<f64>,
}

impl PriceSeries {
    /// 가격 바 목록으로 시계열 생성
    ///
    /// 날짜는 중복 없이 오름차순이어야 하고 가격은 유한한 값이어야 합니다.
    /// 빈 목록은 허용됩니다 (모든 지표 컬럼이 길이 0이 됨).
    pub fn new(bars: Vec<PriceBar>) -> SeriesResult<PriceSeries> {
        for (index, bar) in bars.iter().enumerate() {
            let fields = [
                ("open", bar.open),
                ("high", bar.high),
                ("low", bar.low),
                ("close", bar.close),
                ("volume", bar.volume),
            ];
            if let Some((field, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
                return Err(SeriesError::InvalidPrice {
                    index,
                    field: *field,
                });
            }
        }

        if let Some(index) = bars.windows(2).position(|pair| pair[1].date <= pair[0].date) {
            return Err(SeriesError::NonMonotonicDates {
                index: index + 1,
                previous: bars[index].date,
                current: bars[index + 1].date,
            });
        }

        Ok(PriceSeries {
            bars,
            values: Columns::default(),
            flags: Columns::default(),
            scores: None,
        })
    }

    /// CSV 리더에서 시계열 로드
    ///
    /// `trade_date`(또는 `date`), `open`, `high`, `low`, `close` 컬럼이 필요하며
    /// `volume`(또는 `vol`)은 없으면 0으로 처리합니다.
    pub fn from_csv_reader<R: Read>(reader: R) -> SeriesResult<PriceSeries> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut bars = Vec::new();
        for (index, record) in csv_reader.deserialize::<CsvBar>().enumerate() {
            let record = record?;
            let date = parse_trade_date(&record.trade_date).ok_or_else(|| {
                SeriesError::InvalidDate {
                    index,
                    value: record.trade_date.clone(),
                }
            })?;
            bars.push(PriceBar::new(
                date,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume.unwrap_or(0.0),
            ));
        }

        debug!("CSV에서 {}개 행 로드", bars.len());
        PriceSeries::new(bars)
    }

    /// CSV 파일에서 시계열 로드
    pub fn from_csv_path(path: &Path) -> SeriesResult<PriceSeries> {
        info!("가격 데이터 로드: {}", path.display());
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// 시계열 전체를 CSV로 기록
    ///
    /// 가격 컬럼 다음에 지표 컬럼, 플래그(0/1), 점수와 신호 순서로 씁니다.
    /// 정의되지 않은 지표 값은 빈 칸으로 남깁니다.
    pub fn write_csv<W: Write>(&self, writer: W) -> SeriesResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header: Vec<String> = ["trade_date", "open", "high", "low", "close", "volume"]
            .iter()
            .map(|name| name.to_string())
            .collect();
        header.extend(self.values.keys().iter().cloned());
        header.extend(self.flags.keys().iter().cloned());
        if self.scores.is_some() {
            header.extend(["BUY_SCORE", "SELL_SCORE", "SIGNAL"].map(String::from));
        }
        csv_writer.write_record(&header)?;

        for (index, bar) in self.bars.iter().enumerate() {
            let mut row = vec![
                bar.date.format("%Y%m%d").to_string(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume.to_string(),
            ];
            for key in self.values.keys() {
                row.push(
                    self.value(key, index)
                        .map(|value| value.to_string())
                        .unwrap_or_default(),
                );
            }
            for key in self.flags.keys() {
                row.push(if self.flag(key, index) { "1" } else { "0" }.to_string());
            }
            if let Some(score) = self.score(index) {
                row.push(score.buy_score.to_string());
                row.push(score.sell_score.to_string());
                row.push(score.signal.to_string());
            }
            csv_writer.write_record(&row)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// 시계열 전체를 CSV 파일로 저장
    pub fn to_csv_path(&self, path: &Path) -> SeriesResult<()> {
        let file = File::create(path)?;
        self.write_csv(file)?;
        info!("분석 결과 저장 완료: {}", path.display());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// 모든 가격 바
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn bar(&self, index: usize) -> Option<&PriceBar> {
        self.bars.get(index)
    }

    /// 종가 배열
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// 고가 배열
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.high).collect()
    }

    /// 저가 배열
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.low).collect()
    }

    /// 이름으로 컬럼 존재 여부 확인 (지표, 플래그 모두)
    pub fn has_column(&self, name: &str) -> bool {
        self.values.contains(name) || self.flags.contains(name)
    }

    /// 지표 컬럼 이름 목록 (추가된 순서)
    pub fn value_columns(&self) -> &[String] {
        self.values.keys()
    }

    /// 플래그 컬럼 이름 목록 (추가된 순서)
    pub fn flag_columns(&self) -> &[String] {
        self.flags.keys()
    }

    /// 지표 컬럼 전체
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.values.get(name)
    }

    /// 지표 값 하나 (컬럼이 없거나 값이 정의되지 않았으면 None)
    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        self.values
            .get(name)
            .and_then(|column| column.get(index).copied().flatten())
    }

    /// 플래그 컬럼 전체
    pub fn flag_column(&self, name: &str) -> Option<&[bool]> {
        self.flags.get(name)
    }

    /// 플래그 값 하나 (컬럼이 없으면 false)
    pub fn flag(&self, name: &str, index: usize) -> bool {
        self.flags
            .get(name)
            .and_then(|column| column.get(index).copied())
            .unwrap_or(false)
    }

    /// 외부에서 계산한 지표 컬럼을 추가한 새 시계열 반환
    pub fn with_values(mut self, name: &str, values: Vec<Option<f64>>) -> SeriesResult<Self> {
        self.check_length(name, values.len())?;
        self.values.insert(name, values);
        Ok(self)
    }

    /// 외부에서 계산한 플래그 컬럼을 추가한 새 시계열 반환
    pub fn with_flags(mut self, name: &str, flags: Vec<bool>) -> SeriesResult<Self> {
        self.check_length(name, flags.len())?;
        self.flags.insert(name, flags);
        Ok(self)
    }

    /// 외부에서 계산한 점수 컬럼을 붙인 새 시계열 반환
    pub fn with_scores(mut self, scores: Vec<ScoreRow>) -> SeriesResult<Self> {
        self.check_length("SIGNAL", scores.len())?;
        self.scores = Some(scores);
        Ok(self)
    }

    /// 점수 컬럼
    pub fn scores(&self) -> Option<&[ScoreRow]> {
        self.scores.as_deref()
    }

    pub fn score(&self, index: usize) -> Option<ScoreRow> {
        self.scores
            .as_ref()
            .and_then(|scores| scores.get(index).copied())
    }

    /// 해당 바의 분류 결과 (점수가 없으면 HOLD)
    pub fn signal(&self, index: usize) -> Signal {
        self.score(index).map(|score| score.signal).unwrap_or_default()
    }

    pub(crate) fn set_values(&mut self, name: &str, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.bars.len(), "컬럼 길이 불일치: {}", name);
        self.values.insert(name, values);
    }

    pub(crate) fn set_flags(&mut self, name: &str, flags: Vec<bool>) {
        debug_assert_eq!(flags.len(), self.bars.len(), "컬럼 길이 불일치: {}", name);
        self.flags.insert(name, flags);
    }

    pub(crate) fn set_scores(&mut self, scores: Vec<ScoreRow>) {
        debug_assert_eq!(scores.len(), self.bars.len());
        self.scores = Some(scores);
    }

    fn check_length(&self, name: &str, actual: usize) -> SeriesResult<()> {
        if actual != self.bars.len() {
            return Err(SeriesError::LengthMismatch {
                column: name.to_owned(),
                expected: self.bars.len(),
                actual,
            });
        }
        Ok(())
    }
}
