//! 환율 조회 (`show`).

use curcur_core::RateRecord;
use curcur_data::RuntimeContext;
use tracing::info;

use crate::error::CliError;
use crate::output::{render_rates, OutputFormat};

/// 조회 설정.
#[derive(Debug, Clone)]
pub struct ShowConfig {
    /// Provider 식별자 (예: hana, korea.hana)
    pub bank: String,
    /// 통화 코드 필터
    pub currency: Option<String>,
    /// 출력 형식
    pub format: OutputFormat,
    /// 캐시 사용 여부
    pub use_cache: bool,
}

/// 환율을 조회해 출력할 문자열을 만듭니다.
pub async fn show_rates(context: &RuntimeContext, config: &ShowConfig) -> Result<String, CliError> {
    let service = context.service_for(&config.bank)?;
    let provider_name = service.provider().name().to_string();

    info!(provider = %provider_name, use_cache = config.use_cache, "Showing exchange rates");

    let rates = service
        .get_rates(context.pages.as_ref(), config.use_cache)
        .await?;

    if rates.is_empty() {
        return Ok("No exchange rate data found.".to_string());
    }

    let rates = match &config.currency {
        Some(code) => {
            let filtered = filter_by_currency(rates, code);
            if filtered.is_empty() {
                return Ok(format!(
                    "No data found for currency: {}",
                    code.trim().to_uppercase()
                ));
            }
            filtered
        }
        None => rates,
    };

    render_rates(
        &format!("Exchange Rates from {}", provider_name),
        &rates,
        config.format,
    )
}

/// 통화 코드로 필터링 (대소문자 무시).
pub fn filter_by_currency(rates: Vec<RateRecord>, code: &str) -> Vec<RateRecord> {
    rates.into_iter().filter(|r| r.matches_code(code)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use curcur_core::AppConfig;
    use curcur_data::StaticPageFactory;
    use std::sync::Arc;

    const WOORI_MARKUP: &str = r#"
        <table class="table_type01"><tbody>
          <tr><td>USD</td><td>미국 달러</td><td>1,390.00</td><td>1.75</td><td>1,342.00</td></tr>
          <tr><td>EUR</td><td>유로</td><td>1,510.10</td><td>1.99</td><td>1,450.30</td></tr>
        </tbody></table>
    "#;

    fn context(dir: &std::path::Path) -> RuntimeContext {
        RuntimeContext::new(
            AppConfig::default(),
            dir.to_path_buf(),
            Arc::new(StaticPageFactory::new(WOORI_MARKUP)),
        )
    }

    fn config(currency: Option<&str>, format: OutputFormat) -> ShowConfig {
        ShowConfig {
            bank: "woori".to_string(),
            currency: currency.map(str::to_string),
            format,
            use_cache: false,
        }
    }

    #[tokio::test]
    async fn test_show_filters_currency_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();

        let output = show_rates(&context(dir.path()), &config(Some("eur"), OutputFormat::Csv))
            .await
            .unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("유로,EUR,"));
    }

    #[tokio::test]
    async fn test_show_unknown_currency_message() {
        let dir = tempfile::tempdir().unwrap();

        let output = show_rates(&context(dir.path()), &config(Some("gbp"), OutputFormat::Table))
            .await
            .unwrap();

        assert_eq!(output, "No data found for currency: GBP");
    }

    #[tokio::test]
    async fn test_show_table_title_uses_provider_name() {
        let dir = tempfile::tempdir().unwrap();

        let output = show_rates(&context(dir.path()), &config(None, OutputFormat::Table))
            .await
            .unwrap();

        assert!(output.starts_with("Exchange Rates from Woori Bank (Korea)"));
        assert!(output.ends_with("Total: 2 currencies"));
    }

    #[tokio::test]
    async fn test_show_unknown_bank() {
        let dir = tempfile::tempdir().unwrap();
        let mut show = config(None, OutputFormat::Json);
        show.bank = "citi".to_string();

        let err = show_rates(&context(dir.path()), &show).await.unwrap_err();

        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("korea.hana, korea.woori"));
    }
}
