// 신호 분석기 모듈
// 지표 신호를 가중 합산해 바마다 매수/매도/관망을 분류하고 보고서를 만듭니다.

pub mod batch;
pub mod report;
pub mod signal_analyzer;

use crate::price_series::SeriesError;
use std::fmt::Display;

pub use batch::{BatchAnalyzer, BatchFailure, BatchItem, BatchResult, BatchStock};
pub use report::SignalSummary;
pub use signal_analyzer::{BarFlags, SignalAnalyzer, score_bar};

/// 분석 결과 조회 에러
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// 요청한 행이 시계열 범위를 벗어남
    IndexOutOfRange { index: usize, len: usize },
    /// 데이터가 없는 시계열
    EmptySeries,
    /// 요약에 필요한 지표 값이 정의되지 않음
    InsufficientData(&'static str),
    /// 시계열 생성/입출력 에러
    Series(SeriesError),
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::IndexOutOfRange { index, len } => {
                write!(f, "인덱스 범위 초과: {} (데이터 {}건)", index, len)
            }
            AnalysisError::EmptySeries => write!(f, "데이터 없음"),
            AnalysisError::InsufficientData(name) => write!(f, "{} 데이터 부족", name),
            AnalysisError::Series(err) => write!(f, "시계열 에러: {}", err),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<SeriesError> for AnalysisError {
    fn from(err: SeriesError) -> Self {
        AnalysisError::Series(err)
    }
}

/// 분석 결과 타입 별칭
pub type AnalysisResult<T> = Result<T, AnalysisError>;
