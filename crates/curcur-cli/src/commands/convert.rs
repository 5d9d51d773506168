//! 환전 계산 (`convert`).

use curcur_core::TransactionType;
use curcur_data::RuntimeContext;
use rust_decimal::Decimal;

use crate::error::CliError;
use crate::output::format_amount;

/// 환전 설정.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub amount: Decimal,
    pub from: String,
    pub to: String,
    pub bank: String,
    pub transaction: TransactionType,
}

/// 환전 결과를 출력할 문자열로 만듭니다.
///
/// 환산할 수 없으면 `CliError::NotConvertible`.
pub async fn convert_amount(
    context: &RuntimeContext,
    config: &ConvertConfig,
) -> Result<String, CliError> {
    let service = context.service_for(&config.bank)?;
    let from = config.from.trim().to_uppercase();
    let to = config.to.trim().to_uppercase();

    let result = service
        .convert_amount(
            config.amount,
            &from,
            context.pages.as_ref(),
            &to,
            config.transaction.as_str(),
        )
        .await?;

    let Some(result) = result else {
        return Err(CliError::NotConvertible { from, to });
    };

    let rate_type = match config.transaction {
        TransactionType::CashBuy => "Cash Buy",
        TransactionType::CashSell => "Cash Sell",
    };

    Ok(format!(
        "{} {} = {} {}\nRate type: {}\nProvider: {}",
        format_amount(config.amount),
        from,
        format_amount(result),
        to,
        rate_type,
        service.provider().name()
    ))
}
