//! 가격 데이터 수집 및 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - `PriceProvider` 트레이트와 Yahoo Finance / 로컬 CSV 구현
//! - 가격 테이블 CSV 읽기/쓰기
//! - 종목별 `DataLoader`

pub mod error;
pub mod loader;
pub mod provider;
pub mod storage;

pub use error::{DataError, Result};
pub use loader::DataLoader;
pub use provider::{trim_to_period, CsvPriceProvider, PriceProvider, YahooPriceProvider};
pub use storage::{read_price_csv, read_price_table, write_price_csv, write_price_table};
