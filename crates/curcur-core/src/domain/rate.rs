//! 환율 레코드와 환율 문자열 파싱.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ConversionError;

/// 통화 코드 자리표시자 (은행 테이블에서 값이 없을 때 표시).
pub const PLACEHOLDER: &str = "-";

/// 은행 환율표의 한 행.
///
/// 환율 값은 표시용 문자열 그대로 보관합니다 (예: `"1,300.00"`).
/// 숫자 변환은 환전 시점에 [`parse_rate`]로 수행합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    /// 통화명 (예: "미국 달러")
    pub currency: String,
    /// 통화 코드 (대문자, 예: "USD")
    pub code: String,
    /// 현찰 살 때 환율
    pub cash_buy: String,
    /// 현찰 팔 때 환율
    pub cash_sell: String,
    /// Provider 이름
    pub provider: String,
    /// 국가 코드 (예: "KR")
    pub country: String,
}

impl RateRecord {
    /// 거래 유형에 해당하는 환율 문자열.
    pub fn rate_for(&self, transaction: TransactionType) -> &str {
        match transaction {
            TransactionType::CashBuy => &self.cash_buy,
            TransactionType::CashSell => &self.cash_sell,
        }
    }

    /// 통화 코드 일치 여부 (대소문자 무시).
    pub fn matches_code(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code.trim())
    }
}

/// 한 번의 조회로 얻은 환율 목록.
pub type RateSnapshot = Vec<RateRecord>;

/// 통화 코드가 유효한지 확인 (비어 있거나 자리표시자면 무효).
pub fn is_valid_code(code: &str) -> bool {
    let code = code.trim();
    !code.is_empty() && code != PLACEHOLDER
}

/// 현찰 거래 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// 현찰 살 때
    CashBuy,
    /// 현찰 팔 때
    CashSell,
}

impl TransactionType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CashBuy => "cash_buy",
            Self::CashSell => "cash_sell",
        }
    }
}

impl Default for TransactionType {
    fn default() -> Self {
        Self::CashBuy
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash_buy" => Ok(Self::CashBuy),
            "cash_sell" => Ok(Self::CashSell),
            other => Err(ConversionError::InvalidTransactionType(other.to_string())),
        }
    }
}

/// 환율 문자열을 사용할 수 없는 이유.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidRate {
    #[error("empty rate value")]
    Empty,

    #[error("placeholder rate value '-'")]
    Placeholder,

    #[error("non-numeric rate value '{0}'")]
    NotNumeric(String),

    #[error("non-positive rate value {0}")]
    NonPositive(Decimal),
}

/// 표시용 환율 문자열 파싱.
///
/// 천 단위 구분자(쉼표)와 공백을 제거한 뒤 Decimal로 변환합니다.
/// - "1,300.00" -> 1300.00
/// - " 9.12 " -> 9.12
/// - "-", "", "N/A", "0" -> 에러
pub fn parse_rate(text: &str) -> Result<Decimal, InvalidRate> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err(InvalidRate::Empty);
    }
    if trimmed == PLACEHOLDER {
        return Err(InvalidRate::Placeholder);
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    let value: Decimal = cleaned
        .parse()
        .map_err(|_| InvalidRate::NotNumeric(trimmed.to_string()))?;

    if value <= Decimal::ZERO {
        return Err(InvalidRate::NonPositive(value));
    }

    Ok(value)
}
