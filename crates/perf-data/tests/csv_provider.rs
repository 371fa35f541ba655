//! CSV Provider 통합 테스트
//!
//! 가격 테이블을 파일로 저장한 뒤 Provider와 DataLoader로 다시 읽습니다.

use std::path::PathBuf;

use chrono::NaiveDate;
use perf_core::{PriceTable, ADJ_CLOSE, CLOSE};
use perf_data::{write_price_csv, CsvPriceProvider, DataError, DataLoader, PriceProvider};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("perf-data-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 6, d).unwrap()
}

fn sample_table() -> PriceTable {
    PriceTable::new(vec![day(1), day(2), day(3), day(4)])
        .unwrap()
        .with_values(CLOSE, vec![50.0, 51.0, 52.0, 49.0])
        .unwrap()
        .with_column(ADJ_CLOSE, vec![Some(49.0), Some(50.0), None, Some(48.0)])
        .unwrap()
}

#[tokio::test]
async fn directory_provider_reads_ticker_file() {
    let dir = scratch_dir("dir");
    write_price_csv(&sample_table(), dir.join("MSFT.csv")).unwrap();

    let provider = CsvPriceProvider::new(&dir);
    assert_eq!(provider.name(), "csv");

    let table = provider.fetch_prices("MSFT", day(2), day(4)).await.unwrap();
    assert_eq!(table.dates(), &[day(2), day(3)]);
    assert_eq!(table.column(ADJ_CLOSE).unwrap()[1], None);

    let through_end = provider.fetch_prices("MSFT", day(2), day(5)).await.unwrap();
    assert_eq!(through_end.dates(), &[day(2), day(3), day(4)]);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn missing_file_is_fetch_error() {
    let dir = scratch_dir("missing");
    let provider = CsvPriceProvider::new(&dir);

    let err = provider.fetch_prices("NOPE", day(1), day(4)).await.unwrap_err();
    assert!(matches!(err, DataError::FetchError(_)));

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn loader_derives_returns_from_file() {
    let dir = scratch_dir("loader");
    let path = dir.join("nested").join("prices.csv");
    write_price_csv(&sample_table(), &path).unwrap();

    let provider = CsvPriceProvider::from_file(&path);
    let loader = DataLoader::new("ANY").with_range(day(1), day(30));
    let table = loader.load_data(&provider).await.unwrap();
    let returns = loader.get_returns(&table).unwrap();

    assert_eq!(returns.len(), 3);
    assert_eq!(returns.values()[1], None);
    assert_eq!(returns.values()[2], None);
    assert_eq!(returns.valid_values().len(), 1);

    std::fs::remove_dir_all(&dir).ok();
}
