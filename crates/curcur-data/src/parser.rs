//! 은행 환율 테이블 파서.
//!
//! 렌더링된 마크업에서 행 셀렉터로 테이블 행을 찾고, 은행별 열 배치에 따라
//! 통화명/코드/현찰 살 때/현찰 팔 때 값을 추출합니다.
//!
//! 행 단위 실패는 경고만 남기고 건너뛰며, 유효한 행이 하나도 없으면 에러입니다.

use curcur_core::{is_valid_code, ProviderError, RateRecord, RateSnapshot};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// 행에 필요한 최소 열 수.
pub const MIN_COLUMNS: usize = 5;

/// 은행별 환율 테이블 배치.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateTableLayout {
    /// 데이터 행 셀렉터
    pub row_selector: &'static str,
    /// 최소 열 수 (미만이면 행을 건너뜀)
    pub min_columns: usize,
    /// 통화명 열
    pub name_column: usize,
    /// 통화 코드 열
    pub code_column: usize,
    /// 현찰 살 때 열
    pub buy_column: usize,
    /// 현찰 팔 때 열
    pub sell_column: usize,
}

impl RateTableLayout {
    /// 행 셀렉터와 열 위치로 배치를 정의합니다.
    pub const fn new(
        row_selector: &'static str,
        name_column: usize,
        code_column: usize,
        buy_column: usize,
        sell_column: usize,
    ) -> Self {
        Self {
            row_selector,
            min_columns: MIN_COLUMNS,
            name_column,
            code_column,
            buy_column,
            sell_column,
        }
    }
}

/// 행 추출 실패 사유.
#[derive(Debug)]
enum RowError {
    MissingColumn(usize),
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowError::MissingColumn(idx) => write!(f, "missing column {}", idx),
        }
    }
}

/// 마크업에서 환율 테이블을 파싱합니다.
///
/// # Errors
///
/// - `ProviderError::Parse`: 셀렉터가 잘못되었거나 유효한 행이 없음
pub fn parse_rate_table(
    markup: &str,
    layout: &RateTableLayout,
    provider: &str,
    country: &str,
) -> Result<RateSnapshot, ProviderError> {
    let row_selector = Selector::parse(layout.row_selector).map_err(|e| {
        ProviderError::parse(format!("Invalid row selector '{}': {}", layout.row_selector, e))
    })?;
    let cell_selector =
        Selector::parse("td").map_err(|e| ProviderError::parse(format!("{}", e)))?;

    let document = Html::parse_document(markup);
    let mut records = Vec::new();

    for (index, row) in document.select(&row_selector).enumerate() {
        let cells = cell_texts(row, &cell_selector);

        if cells.len() < layout.min_columns {
            debug!(row = index, columns = cells.len(), "Skipping short row");
            continue;
        }

        match extract_record(&cells, layout, provider, country) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => debug!(row = index, "Skipping row without currency code"),
            Err(e) => warn!(row = index, error = %e, "Failed to parse rate row"),
        }
    }

    if records.is_empty() {
        return Err(ProviderError::parse(format!(
            "No exchange rate data found for {}",
            provider
        )));
    }

    debug!(provider, count = records.len(), "Parsed rate table");
    Ok(records)
}

fn cell_texts(row: ElementRef<'_>, cell_selector: &Selector) -> Vec<String> {
    row.select(cell_selector)
        .map(|cell| {
            cell.text()
                .collect::<Vec<_>>()
                .join(" ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn extract_record(
    cells: &[String],
    layout: &RateTableLayout,
    provider: &str,
    country: &str,
) -> Result<Option<RateRecord>, RowError> {
    let cell = |idx: usize| {
        cells
            .get(idx)
            .map(String::as_str)
            .ok_or(RowError::MissingColumn(idx))
    };

    let code = cell(layout.code_column)?;
    if !is_valid_code(code) {
        return Ok(None);
    }

    Ok(Some(RateRecord {
        currency: cell(layout.name_column)?.to_string(),
        code: code.to_uppercase(),
        cash_buy: cell(layout.buy_column)?.to_string(),
        cash_sell: cell(layout.sell_column)?.to_string(),
        provider: provider.to_string(),
        country: country.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: RateTableLayout = RateTableLayout::new("table#rates > tbody > tr", 0, 1, 2, 4);

    fn table(rows: &str) -> String {
        format!("<html><body><table id=\"rates\"><tbody>{}</tbody></table></body></html>", rows)
    }

    #[test]
    fn test_parse_valid_rows() {
        let markup = table(
            "<tr><td>미국 USD</td><td>usd</td><td>1,380.50</td><td>x</td><td>1,340.20</td></tr>\
             <tr><td>일본 JPY 100</td><td>JPY</td><td>950.10</td><td>x</td><td>920.00</td></tr>",
        );

        let records = parse_rate_table(&markup, &LAYOUT, "Test Bank", "KR").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].code, "USD");
        assert_eq!(records[0].currency, "미국 USD");
        assert_eq!(records[0].cash_buy, "1,380.50");
        assert_eq!(records[0].cash_sell, "1,340.20");
        assert_eq!(records[0].provider, "Test Bank");
        assert_eq!(records[0].country, "KR");
        assert_eq!(records[1].code, "JPY");
    }

    #[test]
    fn test_short_and_placeholder_rows_are_skipped() {
        let markup = table(
            "<tr><td>header</td><td>only</td></tr>\
             <tr><td>합계</td><td>-</td><td>1</td><td>x</td><td>2</td></tr>\
             <tr><td>빈칸</td><td> </td><td>1</td><td>x</td><td>2</td></tr>\
             <tr><td>유로</td><td>EUR</td><td>1,500</td><td>x</td><td>1,450</td></tr>",
        );

        let records = parse_rate_table(&markup, &LAYOUT, "Test Bank", "KR").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, "EUR");
    }

    #[test]
    fn test_placeholder_rates_are_kept() {
        let markup = table("<tr><td>중국</td><td>CNY</td><td>-</td><td>x</td><td>-</td></tr>");

        let records = parse_rate_table(&markup, &LAYOUT, "Test Bank", "KR").unwrap();

        assert_eq!(records[0].cash_buy, "-");
        assert_eq!(records[0].cash_sell, "-");
    }

    #[test]
    fn test_empty_table_is_parse_error() {
        let err = parse_rate_table(&table(""), &LAYOUT, "Test Bank", "KR").unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));

        let err = parse_rate_table("<html></html>", &LAYOUT, "Test Bank", "KR").unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[test]
    fn test_row_missing_a_mapped_column_is_skipped() {
        let wide = RateTableLayout::new("table#rates > tbody > tr", 0, 1, 2, 7);
        let markup = table(
            "<tr><td>미국</td><td>USD</td><td>1</td><td>x</td><td>2</td></tr>\
             <tr><td>유로</td><td>EUR</td><td>1</td><td>x</td><td>2</td><td>3</td><td>4</td><td>5</td></tr>",
        );

        let records = parse_rate_table(&markup, &wide, "Test Bank", "KR").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, "EUR");
        assert_eq!(records[0].cash_sell, "5");
    }
}
