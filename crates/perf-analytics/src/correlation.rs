//! 상관계수 계산 모듈.
//!
//! - **Pearson 상관계수**: 두 시계열 간 선형 상관관계
//! - **상관행렬**: 가격 테이블의 모든 컬럼 간 상관관계 (N×N)
//!
//! # 예시
//!
//! ```rust,ignore
//! use perf_analytics::correlation::calculate_correlation;
//!
//! let returns_a = vec![0.01, -0.02, 0.015, 0.005];
//! let returns_b = vec![0.008, -0.015, 0.012, 0.003];
//!
//! let corr = calculate_correlation(&returns_a, &returns_b);
//! println!("상관계수: {:.4}", corr);
//! ```

use perf_core::PriceTable;
use serde::{Deserialize, Serialize};

/// 상관행렬 결과.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// 컬럼 이름 (행/열 순서)
    pub labels: Vec<String>,
    /// 상관계수 행렬 (N×N, -1.0 ~ 1.0, 계산 불가 시 NaN)
    pub matrix: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// 두 컬럼 사이의 상관계수를 조회합니다.
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == col)?;
        Some(self.matrix[i][j])
    }
}

/// Pearson 상관계수 계산.
///
/// # 반환
///
/// 상관계수 (-1.0 ~ 1.0). 길이가 다르거나 관측치가 2개 미만이거나
/// 한쪽 분산이 0이면 NaN.
pub fn calculate_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return f64::NAN;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // 0/0 → NaN 그대로 반환
    let corr = cov / (var_x.sqrt() * var_y.sqrt());
    if corr.is_finite() {
        corr.clamp(-1.0, 1.0)
    } else {
        f64::NAN
    }
}

/// 두 컬럼에서 모두 값이 있는 행만 골라 상관계수를 계산합니다.
fn pairwise_correlation(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let (a, b): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .unzip();
    calculate_correlation(&a, &b)
}

/// 가격 테이블 전체 컬럼의 상관행렬을 계산합니다.
///
/// 수익률이 아닌 컬럼 원값을 사용합니다. 대각 원소는 분산이 있으면 1.0,
/// 상수 컬럼이면 NaN입니다.
pub fn column_correlation_matrix(table: &PriceTable) -> CorrelationMatrix {
    let columns = table.columns();
    let n = columns.len();
    let mut matrix = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        for j in i..n {
            let corr = if i == j {
                let self_corr = pairwise_correlation(&columns[i].values, &columns[i].values);
                if self_corr.is_nan() {
                    f64::NAN
                } else {
                    1.0
                }
            } else {
                pairwise_correlation(&columns[i].values, &columns[j].values)
            };
            matrix[i][j] = corr;
            matrix[j][i] = corr;
        }
    }

    CorrelationMatrix {
        labels: columns.iter().map(|c| c.name.clone()).collect(),
        matrix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_correlation_perfect_positive() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![2.0, 4.0, 6.0, 8.0, 10.0];
        assert!((calculate_correlation(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_perfect_negative() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![10.0, 8.0, 6.0, 4.0, 2.0];
        assert!((calculate_correlation(&x, &y) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_degenerate() {
        assert!(calculate_correlation(&[1.0], &[2.0]).is_nan());
        assert!(calculate_correlation(&[1.0, 2.0, 3.0], &[1.0, 2.0]).is_nan());
        // 분산 0
        assert!(calculate_correlation(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
    }

    #[test]
    fn test_column_correlation_matrix() {
        let dates: Vec<NaiveDate> = (1..=6)
            .map(|d| NaiveDate::from_ymd_opt(2024, 2, d).unwrap())
            .collect();
        let table = PriceTable::new(dates)
            .unwrap()
            .with_values("A", vec![100.0, 105.0, 102.0, 110.0, 108.0, 115.0])
            .unwrap()
            .with_values("B", vec![50.0, 52.5, 51.0, 55.0, 54.0, 57.5])
            .unwrap()
            .with_column(
                "C",
                vec![Some(120.0), Some(115.0), None, Some(110.0), Some(112.0), Some(105.0)],
            )
            .unwrap()
            .with_values("Flat", vec![1.0; 6])
            .unwrap();

        let m = column_correlation_matrix(&table);
        assert_eq!(m.labels, vec!["A", "B", "C", "Flat"]);

        assert_eq!(m.get("A", "A"), Some(1.0));
        assert!((m.get("A", "B").unwrap() - 1.0).abs() < 1e-9);
        assert!(m.get("A", "C").unwrap() < -0.5);
        assert_eq!(m.get("A", "C"), m.get("C", "A"));
        assert!(m.get("Flat", "Flat").unwrap().is_nan());
        assert!(m.get("A", "Flat").unwrap().is_nan());
        assert_eq!(m.get("A", "Missing"), None);
    }
}
