//! 표본 통계 기초 함수.
//!
//! 표준편차/분산/공분산은 모두 표본 통계(n - 1 분모)입니다.
//! 관측치가 부족하거나 분모가 0이면 패닉 없이 NaN을 반환합니다.

/// 산술 평균. 빈 입력이면 NaN.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 표본 분산. 관측치가 2개 미만이면 NaN.
pub fn variance(values: &[f64]) -> f64 {
    covariance(values, values)
}

/// 표본 표준편차. 관측치가 2개 미만이면 NaN.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// 표본 공분산.
///
/// 길이가 다르거나 관측치가 2개 미만이면 NaN.
pub fn covariance(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return f64::NAN;
    }

    let mean_x = mean(x);
    let mean_y = mean(y);
    let sum: f64 = x
        .iter()
        .zip(y)
        .map(|(a, b)| (a - mean_x) * (b - mean_y))
        .sum();

    sum / (x.len() - 1) as f64
}

/// 선형 보간 분위수 (`q` ∈ [0, 1]).
///
/// 정렬된 입력을 가정합니다. 빈 입력이면 NaN.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_sample_variance() {
        // 편차 제곱합 = 5, n - 1 = 3
        let values = [1.0, 2.0, 3.0, 4.0];
        assert!((variance(&values) - 5.0 / 3.0).abs() < 1e-12);
        assert!((std_dev(&values) - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs_are_nan() {
        assert!(std_dev(&[0.5]).is_nan());
        assert!(std_dev(&[]).is_nan());
        assert!(covariance(&[1.0, 2.0], &[1.0]).is_nan());
        assert_eq!(variance(&[0.5, 0.5, 0.5]), 0.0);
    }

    #[test]
    fn test_covariance() {
        let x = [1.0, 2.0, 3.0];
        let y = [2.0, 4.0, 6.0];
        assert!((covariance(&x, &y) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_sorted() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile_sorted(&sorted, 0.5), 3.0);
        assert_eq!(quantile_sorted(&sorted, 0.25), 2.0);
        assert_eq!(quantile_sorted(&[1.0, 2.0], 0.5), 1.5);
        assert!(quantile_sorted(&[], 0.5).is_nan());
    }
}
