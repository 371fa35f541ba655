//! 가격 테이블 CSV 저장소.
//!
//! 파일 형식:
//!
//! ```text
//! Date,Open,High,Low,Close,Adj Close,Volume
//! 2010-01-04,7.62,7.66,7.58,7.64,6.53,493729600
//! ```
//!
//! 첫 컬럼은 날짜(`YYYY-MM-DD`)이며 나머지 컬럼은 이름 그대로 테이블 컬럼이 됩니다.
//! 빈 칸과 `NaN`/`null`은 결측값으로 읽습니다.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use perf_core::PriceTable;
use tracing::debug;

use crate::error::{DataError, Result};

/// 날짜 컬럼 헤더.
pub const DATE_HEADER: &str = "Date";

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(raw: &str, line: usize) -> Result<NaiveDate> {
    // "2010-01-04 00:00:00-05:00" 같은 타임스탬프는 날짜 부분만 사용
    let date_part = raw.trim().get(..10).unwrap_or(raw.trim());
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .map_err(|e| DataError::ParseError(format!("{}행 날짜 '{}': {}", line, raw, e)))
}

fn parse_value(raw: &str, column: &str, line: usize) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") || trimmed == "null" {
        return Ok(None);
    }

    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|e| DataError::ParseError(format!("{}행 '{}' 값 '{}': {}", line, column, raw, e)))
}

/// CSV 스트림에서 가격 테이블을 읽습니다.
///
/// 행은 날짜순으로 정렬되며, 같은 날짜가 두 번 나오면 에러입니다.
pub fn read_price_table<R: Read>(reader: R) -> Result<PriceTable> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut header_iter = headers.iter();
    match header_iter.next() {
        Some(first) if first.eq_ignore_ascii_case(DATE_HEADER) => {}
        other => {
            return Err(DataError::InvalidData(format!(
                "첫 컬럼은 '{}'이어야 합니다 (실제: {:?})",
                DATE_HEADER, other
            )))
        }
    }
    let names: Vec<String> = header_iter.map(str::to_string).collect();

    let mut rows: Vec<(NaiveDate, Vec<Option<f64>>)> = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        let line = idx + 2;

        let date = parse_date(record.get(0).unwrap_or_default(), line)?;
        let values = names
            .iter()
            .enumerate()
            .map(|(i, name)| parse_value(record.get(i + 1).unwrap_or_default(), name, line))
            .collect::<Result<Vec<_>>>()?;
        rows.push((date, values));
    }
    rows.sort_by_key(|(date, _)| *date);

    let dates = rows.iter().map(|(d, _)| *d).collect();
    let mut table = PriceTable::new(dates)?;
    for (i, name) in names.iter().enumerate() {
        let values = rows.iter().map(|(_, v)| v[i]).collect();
        table.insert_column(name.as_str(), values)?;
    }

    debug!(rows = table.len(), columns = names.len(), "CSV 가격 테이블 로드");
    Ok(table)
}

/// CSV 파일에서 가격 테이블을 읽습니다.
pub fn read_price_csv(path: impl AsRef<Path>) -> Result<PriceTable> {
    let file = fs::File::open(path.as_ref())?;
    read_price_table(file)
}

/// 가격 테이블을 CSV 스트림으로 씁니다.
pub fn write_price_table<W: Write>(table: &PriceTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![DATE_HEADER];
    header.extend(table.column_names());
    wtr.write_record(&header)?;

    for (row, date) in table.dates().iter().enumerate() {
        let mut record = vec![date.format(DATE_FORMAT).to_string()];
        record.extend(
            table
                .columns()
                .iter()
                .map(|c| c.values[row].map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// 가격 테이블을 CSV 파일로 저장합니다. 상위 디렉토리가 없으면 생성합니다.
pub fn write_price_csv(table: &PriceTable, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = fs::File::create(path)?;
    write_price_table(table, file)?;
    debug!(path = %path.display(), rows = table.len(), "CSV 가격 테이블 저장");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use perf_core::{ADJ_CLOSE, CLOSE, VOLUME};

    const SAMPLE: &str = "\
Date,Close,Adj Close,Volume
2020-01-03,101.0,100.5,1200
2020-01-02,100.0,99.5,1000
2020-01-06,,NaN,900
";

    #[test]
    fn test_read_sorts_rows_and_maps_missing_values() {
        let table = read_price_table(SAMPLE.as_bytes()).unwrap();

        assert_eq!(table.column_names(), vec![CLOSE, ADJ_CLOSE, VOLUME]);
        assert_eq!(
            table.dates()[0],
            NaiveDate::from_ymd_opt(2020, 1, 2).unwrap()
        );
        assert_eq!(table.column(ADJ_CLOSE).unwrap(), &[Some(99.5), Some(100.5), None]);
        assert_eq!(table.column(CLOSE).unwrap()[2], None);
        assert_eq!(table.column(VOLUME).unwrap()[2], Some(900.0));
    }

    #[test]
    fn test_timestamp_dates_use_date_part() {
        let csv = "Date,Adj Close\n2020-01-02 00:00:00-05:00,10\n";
        let table = read_price_table(csv.as_bytes()).unwrap();
        assert_eq!(table.dates()[0], NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            read_price_table("Close\n1.0\n".as_bytes()),
            Err(DataError::InvalidData(_))
        ));
        assert!(matches!(
            read_price_table("Date,Close\n2020-01-02,abc\n".as_bytes()),
            Err(DataError::ParseError(_))
        ));
        assert!(matches!(
            read_price_table("Date,Close\n2020-01-02,1\n2020-01-02,2\n".as_bytes()),
            Err(DataError::Domain(_))
        ));
    }

    #[test]
    fn test_write_then_read_preserves_missing_cells() {
        let table = read_price_table(SAMPLE.as_bytes()).unwrap();

        let mut buf = Vec::new();
        write_price_table(&table, &mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("Date,Close,Adj Close,Volume\n"));
        assert!(text.contains("2020-01-06,,,900\n"));

        assert_eq!(read_price_table(buf.as_slice()).unwrap(), table);
    }
}
