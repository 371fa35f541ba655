//! 가격 테이블.
//!
//! 거래일마다 한 행을 가지며 날짜 오름차순으로 정렬된 테이블입니다.
//! 컬럼은 이름으로 조회하며, 없는 컬럼을 요청하면 즉시
//! [`PerfError::MissingField`]를 반환합니다.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PerfError, PerfResult};

/// 시가 컬럼 이름
pub const OPEN: &str = "Open";
/// 고가 컬럼 이름
pub const HIGH: &str = "High";
/// 저가 컬럼 이름
pub const LOW: &str = "Low";
/// 종가 컬럼 이름
pub const CLOSE: &str = "Close";
/// 수정 종가 컬럼 이름 (모든 지표의 기본 입력)
pub const ADJ_CLOSE: &str = "Adj Close";
/// 거래량 컬럼 이름
pub const VOLUME: &str = "Volume";

/// 표준 OHLCV 컬럼 순서.
pub const STANDARD_COLUMNS: [&str; 6] = [OPEN, HIGH, LOW, CLOSE, ADJ_CLOSE, VOLUME];

/// 이름이 붙은 가격 컬럼.
///
/// 누락된 값은 `None`으로 표현합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceColumn {
    /// 컬럼 이름 (예: "Adj Close")
    pub name: String,
    /// 날짜별 값
    pub values: Vec<Option<f64>>,
}

/// 날짜 인덱스 가격 테이블.
///
/// 역직렬화도 [`PriceTable::new`]와 같은 검증을 거칩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceTable")]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    columns: Vec<PriceColumn>,
}

/// 검증 전 역직렬화 형태.
#[derive(Deserialize)]
struct RawPriceTable {
    dates: Vec<NaiveDate>,
    #[serde(default)]
    columns: Vec<PriceColumn>,
}

impl TryFrom<RawPriceTable> for PriceTable {
    type Error = PerfError;

    fn try_from(raw: RawPriceTable) -> PerfResult<Self> {
        let mut table = Self::new(raw.dates)?;
        for column in raw.columns {
            if table.has_column(&column.name) {
                return Err(PerfError::InvalidInput(format!(
                    "중복된 컬럼: {}",
                    column.name
                )));
            }
            table.insert_column(column.name, column.values)?;
        }
        Ok(table)
    }
}

impl PriceTable {
    /// 날짜 인덱스로 빈 테이블을 생성합니다.
    ///
    /// 날짜는 엄격한 오름차순이어야 합니다 (중복 불가).
    pub fn new(dates: Vec<NaiveDate>) -> PerfResult<Self> {
        if let Some(pair) = dates.windows(2).find(|w| w[1] <= w[0]) {
            return Err(PerfError::InvalidInput(format!(
                "날짜는 중복 없이 오름차순이어야 합니다: {} 다음에 {}",
                pair[0], pair[1]
            )));
        }

        Ok(Self {
            dates,
            columns: Vec::new(),
        })
    }

    /// 컬럼을 추가한 테이블을 반환합니다.
    ///
    /// 같은 이름의 컬럼이 있으면 교체합니다.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> PerfResult<Self> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    /// 결측값이 없는 컬럼을 추가한 테이블을 반환합니다.
    pub fn with_values(self, name: impl Into<String>, values: Vec<f64>) -> PerfResult<Self> {
        self.with_column(name, values.into_iter().map(Some).collect())
    }

    /// 컬럼을 추가하거나 교체합니다.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> PerfResult<()> {
        let name = name.into();
        if values.len() != self.dates.len() {
            return Err(PerfError::InvalidInput(format!(
                "컬럼 '{}' 길이 {}가 날짜 수 {}와 다릅니다",
                name,
                values.len(),
                self.dates.len()
            )));
        }

        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(PriceColumn { name, values }),
        }
        Ok(())
    }

    /// 날짜 인덱스.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// 행 수.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// 행이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// 모든 컬럼 (삽입 순서).
    pub fn columns(&self) -> &[PriceColumn] {
        &self.columns
    }

    /// 컬럼 이름 목록 (삽입 순서).
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// 컬럼 존재 여부.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// 이름으로 컬럼 값을 조회합니다.
    pub fn column(&self, name: &str) -> PerfResult<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| PerfError::missing_field(name))
    }

    /// 요청한 컬럼이 모두 존재하는지 확인합니다.
    ///
    /// 첫 번째로 누락된 컬럼 이름으로 에러를 반환합니다.
    pub fn require_columns<S: AsRef<str>>(&self, names: &[S]) -> PerfResult<()> {
        match names.iter().find(|n| !self.has_column(n.as_ref())) {
            Some(missing) => Err(PerfError::missing_field(missing.as_ref())),
            None => Ok(()),
        }
    }

    /// `start..=end` 범위의 행만 남긴 테이블을 반환합니다.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> PriceTable {
        let from = self.dates.partition_point(|d| *d < start);
        let to = self.dates.partition_point(|d| *d <= end).max(from);

        PriceTable {
            dates: self.dates[from..to].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| PriceColumn {
                    name: c.name.clone(),
                    values: c.values[from..to].to_vec(),
                })
                .collect(),
        }
    }

    /// 두 테이블에 공통으로 존재하는 날짜만 남깁니다.
    ///
    /// 반환되는 두 테이블은 같은 날짜 인덱스를 가집니다.
    pub fn intersect_dates(&self, other: &PriceTable) -> (PriceTable, PriceTable) {
        let mut left = Vec::new();
        let mut right = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < self.dates.len() && j < other.dates.len() {
            match self.dates[i].cmp(&other.dates[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    left.push(i);
                    right.push(j);
                    i += 1;
                    j += 1;
                }
            }
        }

        (self.take_rows(&left), other.take_rows(&right))
    }

    fn take_rows(&self, rows: &[usize]) -> PriceTable {
        PriceTable {
            dates: rows.iter().map(|&r| self.dates[r]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| PriceColumn {
                    name: c.name.clone(),
                    values: rows.iter().map(|&r| c.values[r]).collect(),
                })
                .collect(),
        }
    }

    /// 단일 컬럼을 날짜와 묶은 가격 시계열로 꺼냅니다.
    pub fn price_series(&self, field: &str) -> PerfResult<PriceSeries> {
        let values = self.column(field)?;
        Ok(PriceSeries {
            field: field.to_string(),
            dates: self.dates.clone(),
            prices: values.to_vec(),
        })
    }
}

/// 단일 가격 컬럼의 시계열.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// 원본 컬럼 이름
    pub field: String,
    /// 날짜 (오름차순)
    pub dates: Vec<NaiveDate>,
    /// 가격 (결측 = None)
    pub prices: Vec<Option<f64>>,
}

impl PriceSeries {
    /// 길이.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
