//! 가격 데이터 저장소.

pub mod price_csv;

pub use price_csv::{read_price_csv, read_price_table, write_price_csv, write_price_table};
