//! 롤링 통계.
//!
//! 가격 인덱스와 같은 길이의 시계열을 반환하며, 윈도우가 채워지지 않았거나
//! 윈도우 안에 결측값이 있으면 `None`입니다.

use perf_core::{pct_change, PerfError, PerfResult};

use crate::stats::{mean, std_dev};

fn check_window(window: usize) -> PerfResult<()> {
    if window == 0 {
        return Err(PerfError::InvalidInput(
            "윈도우 크기는 1 이상이어야 합니다".to_string(),
        ));
    }
    Ok(())
}

/// 후행 윈도우에 함수를 적용합니다.
fn rolling_apply<F>(values: &[Option<f64>], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![None; values.len()];
    if values.len() < window {
        return out;
    }

    for (end, slot) in out.iter_mut().enumerate().skip(window - 1) {
        let slice = &values[end + 1 - window..=end];
        let complete: Option<Vec<f64>> = slice.iter().copied().collect();
        *slot = complete.map(|w| f(&w)).filter(|v| !v.is_nan());
    }
    out
}

/// 단순 이동평균.
pub fn moving_average(prices: &[Option<f64>], window: usize) -> PerfResult<Vec<Option<f64>>> {
    check_window(window)?;
    Ok(rolling_apply(prices, window, mean))
}

/// 일간 수익률의 롤링 표본 표준편차 (연율화하지 않음).
///
/// 수익률은 가격 인덱스 전체에서 계산하므로 첫 값은 항상 결측이고,
/// 결과 길이는 가격 길이와 같습니다.
pub fn rolling_volatility(
    prices: &[Option<f64>],
    window: usize,
) -> PerfResult<Vec<Option<f64>>> {
    check_window(window)?;

    let mut returns = Vec::with_capacity(prices.len());
    if !prices.is_empty() {
        returns.push(None);
        returns.extend(pct_change(prices));
    }

    Ok(rolling_apply(&returns, window, std_dev))
}
