//! 환전 계산.
//!
//! 은행 테이블의 현찰 환율은 모두 원화(KRW) 기준이므로,
//! `금액 × 환율`로 외화를 원화로 환산합니다. 교차 환율은 지원하지 않습니다.

use curcur_core::{parse_rate, ConversionError, RateRecord, TransactionType};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// 환산 대상 통화.
pub const BASE_CURRENCY: &str = "KRW";

/// 검증된 환전 요청.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub amount: Decimal,
    pub from: String,
    pub to: String,
    pub transaction: TransactionType,
}

impl ConversionRequest {
    /// 입력값을 검증해 요청을 만듭니다.
    ///
    /// 통화 코드는 대문자로 정규화됩니다.
    ///
    /// # Errors
    ///
    /// - `ConversionError::NegativeAmount`: 금액이 음수
    /// - `ConversionError::InvalidTransactionType`: `cash_buy`/`cash_sell`이 아님
    pub fn new(
        amount: Decimal,
        from: &str,
        to: &str,
        transaction_type: &str,
    ) -> Result<Self, ConversionError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ConversionError::NegativeAmount(amount.to_string()));
        }
        let transaction = transaction_type.parse()?;

        Ok(Self {
            amount,
            from: from.trim().to_uppercase(),
            to: to.trim().to_uppercase(),
            transaction,
        })
    }

    /// 환산 대상 통화를 지원하는지 여부.
    pub fn is_supported_target(&self) -> bool {
        self.to == BASE_CURRENCY
    }
}

/// 스냅샷을 사용해 환전 금액을 계산합니다.
///
/// 다음 경우 `None`:
/// - 대상 통화가 KRW가 아님
/// - 원본 통화가 스냅샷에 없음
/// - 환율이 비어 있거나, `-`이거나, 숫자가 아니거나, 0 이하
pub fn convert(rates: &[RateRecord], request: &ConversionRequest) -> Option<Decimal> {
    if !request.is_supported_target() {
        warn!(to = %request.to, "Conversion target not yet supported");
        return None;
    }

    let Some(record) = rates.iter().find(|r| r.matches_code(&request.from)) else {
        warn!(from = %request.from, "Currency not found in rates");
        return None;
    };

    let rate = match parse_rate(record.rate_for(request.transaction)) {
        Ok(rate) => rate,
        Err(reason) => {
            warn!(
                currency = %record.code,
                transaction = %request.transaction,
                %reason,
                "Unusable exchange rate"
            );
            return None;
        }
    };

    let Some(result) = request.amount.checked_mul(rate) else {
        warn!(amount = %request.amount, %rate, "Conversion overflowed");
        return None;
    };

    debug!(
        amount = %request.amount,
        from = %request.from,
        %rate,
        %result,
        "Converted amount"
    );
    Some(result)
}
