//! 출력 형식 (table, csv, json).

use curcur_core::RateRecord;
use rust_decimal::Decimal;

use crate::error::CliError;

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, CliError> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(CliError::InvalidInput(format!(
                "Invalid format: {}. Use: table, csv, json",
                s
            ))),
        }
    }
}

/// 환율 목록을 지정한 형식으로 렌더링합니다.
pub fn render_rates(
    title: &str,
    rates: &[RateRecord],
    format: OutputFormat,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(format_table(title, rates)),
        OutputFormat::Csv => Ok(format_csv(rates)),
        OutputFormat::Json => format_json(rates),
    }
}

/// 테이블 형식 출력.
fn format_table(title: &str, rates: &[RateRecord]) -> String {
    let mut output = String::new();

    output.push_str(title);
    output.push('\n');
    output.push_str(&format!(
        "{:<24} {:<6} {:>12} {:>12}\n",
        "CURRENCY", "CODE", "CASH_BUY", "CASH_SELL"
    ));
    output.push_str(&"-".repeat(57));
    output.push('\n');

    for rate in rates {
        output.push_str(&format!(
            "{:<24} {:<6} {:>12} {:>12}\n",
            truncate(&rate.currency, 24),
            rate.code,
            rate.cash_buy,
            rate.cash_sell
        ));
    }

    output.push('\n');
    output.push_str(&format!("Total: {} currencies", rates.len()));

    output
}

/// CSV 형식 출력.
fn format_csv(rates: &[RateRecord]) -> String {
    let mut output = String::new();

    output.push_str("currency,code,cash_buy,cash_sell,provider,country\n");

    for rate in rates {
        output.push_str(&format!(
            "{},{},{},{},{},{}\n",
            escape_csv(&rate.currency),
            escape_csv(&rate.code),
            escape_csv(&rate.cash_buy),
            escape_csv(&rate.cash_sell),
            escape_csv(&rate.provider),
            escape_csv(&rate.country)
        ));
    }

    output
}

/// JSON 형식 출력.
fn format_json(rates: &[RateRecord]) -> Result<String, CliError> {
    serde_json::to_string_pretty(rates).map_err(|e| CliError::Output(e.to_string()))
}

/// Provider 목록 테이블.
pub fn format_providers(identifiers: &[String]) -> String {
    let mut output = String::new();

    output.push_str(&format!("{:<16} {:<8} {:<12}\n", "IDENTIFIER", "COUNTRY", "BANK"));
    output.push_str(&"-".repeat(38));
    output.push('\n');

    for identifier in identifiers {
        let (country, bank) = identifier.split_once('.').unwrap_or(("", identifier));
        output.push_str(&format!(
            "{:<16} {:<8} {:<12}\n",
            identifier,
            country.to_uppercase(),
            capitalize(bank)
        ));
    }

    output.push('\n');
    output.push_str(&format!("Total: {} providers", identifiers.len()));

    output
}

/// 소수점 둘째 자리까지 반올림하고 천 단위 구분자를 넣습니다 (예: 130,000.00).
pub fn format_amount(value: Decimal) -> String {
    let formatted = format!("{:.2}", value.round_dp(2));
    let (sign, digits) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}.{}", sign, grouped, frac_part)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 문자열 자르기 (UTF-8 안전).
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// CSV 이스케이프 (콤마나 따옴표 포함 시 따옴표로 감싸기).
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
