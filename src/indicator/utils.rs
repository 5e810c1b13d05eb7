//! 지표 계산에 쓰이는 시계열 연산
//!
//! 모든 함수는 입력과 같은 길이의 결과를 돌려주며, 이력이 부족한 구간은 `None`입니다.

/// 이동 윈도우 집계 (윈도우가 채워지기 전까지 None)
fn rolling(values: &[f64], period: usize, aggregate: impl Fn(&[f64]) -> f64) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if period == 0 || i + 1 < period {
                None
            } else {
                Some(aggregate(&values[i + 1 - period..=i]))
            }
        })
        .collect()
}

/// 단순이동평균
///
/// 윈도우마다 합을 새로 구하므로 누적 오차가 생기지 않습니다.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |window| {
        window.iter().sum::<f64>() / window.len() as f64
    })
}

/// 이동 최대값
pub fn rolling_max(values: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |window| {
        window.iter().copied().fold(f64::MIN, f64::max)
    })
}

/// 이동 최소값
pub fn rolling_min(values: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |window| {
        window.iter().copied().fold(f64::MAX, f64::min)
    })
}

/// span 기준 평활 계수 (2 / (span + 1))
pub fn span_alpha(span: usize) -> f64 {
    2.0 / (span + 1) as f64
}

/// 기간 기준 평활 계수 (1 / period, 중심질량 period - 1과 같음)
pub fn period_alpha(period: usize) -> f64 {
    1.0 / period as f64
}

/// 지수평활 (조정 없는 방식)
///
/// 첫 번째 정의된 값으로 시작하고 이후 `prev + alpha * (value - prev)`로 갱신합니다.
/// 시작 이후의 None은 직전 평활값을 유지합니다.
pub fn ewm(values: &[Option<f64>], alpha: f64) -> Vec<Option<f64>> {
    let mut prev: Option<f64> = None;
    values
        .iter()
        .map(|value| {
            prev = match (prev, *value) {
                (Some(p), Some(v)) => Some(p + alpha * (v - p)),
                (None, Some(v)) => Some(v),
                (p, None) => p,
            };
            prev
        })
        .collect()
}

/// 값이 모두 정의된 시계열의 지수평활
pub fn ewm_dense(values: &[f64], alpha: f64) -> Vec<Option<f64>> {
    let wrapped: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    ewm(&wrapped, alpha)
}

/// 두 시계열의 차 (어느 한쪽이라도 None이면 None)
pub fn difference(lhs: &[Option<f64>], rhs: &[Option<f64>]) -> Vec<Option<f64>> {
    lhs.iter()
        .zip(rhs.iter())
        .map(|(l, r)| match (l, r) {
            (Some(l), Some(r)) => Some(l - r),
            _ => None,
        })
        .collect()
}

/// 직전 바와 현재 바의 값을 비교하는 엣지 검출
fn edge(diff: &[Option<f64>], is_edge: impl Fn(f64, f64) -> bool) -> Vec<bool> {
    (0..diff.len())
        .map(|i| {
            if i == 0 {
                return false;
            }
            match (diff[i - 1], diff[i]) {
                (Some(prev), Some(curr)) => is_edge(prev, curr),
                _ => false,
            }
        })
        .collect()
}

/// 골든 크로스: 차이가 직전 바 0 이하에서 현재 바 양수로 바뀜
pub fn golden_cross(diff: &[Option<f64>]) -> Vec<bool> {
    edge(diff, |prev, curr| curr > 0.0 && prev <= 0.0)
}

/// 데드 크로스: 차이가 직전 바 0 이상에서 현재 바 음수로 바뀜
pub fn death_cross(diff: &[Option<f64>]) -> Vec<bool> {
    edge(diff, |prev, curr| curr < 0.0 && prev >= 0.0)
}

/// 값이 기준보다 작은 모든 바 (정의되지 않은 값은 false)
pub fn below(values: &[Option<f64>], threshold: f64) -> Vec<bool> {
    values
        .iter()
        .map(|value| value.is_some_and(|v| v < threshold))
        .collect()
}

/// 값이 기준보다 큰 모든 바 (정의되지 않은 값은 false)
pub fn above(values: &[Option<f64>], threshold: f64) -> Vec<bool> {
    values
        .iter()
        .map(|value| value.is_some_and(|v| v > threshold))
        .collect()
}
