//! 우리은행 환율 Provider.
//!
//! 열 배치: 0 통화 코드, 1 통화명, 2 현찰 살 때, 4 현찰 팔 때.

use async_trait::async_trait;
use curcur_core::{ProviderError, RateSnapshot};

use super::COUNTRY_CODE;
use crate::page_source::PageSourceFactory;
use crate::parser::RateTableLayout;
use crate::provider::{fetch_rate_table, ProviderOptions, RateProvider, RateTablePage};

/// 우리은행 환율 페이지.
pub const WOORI_PAGE: RateTablePage = RateTablePage {
    url: "https://spot.wooribank.com/pot/Dream?withyou=FXXRT0021",
    ready_selector: "table.table_type01 > tbody > tr",
    layout: RateTableLayout::new("table.table_type01 > tbody > tr", 1, 0, 2, 4),
};

/// 우리은행 Provider.
#[derive(Debug, Clone, Default)]
pub struct WooriBankProvider {
    options: ProviderOptions,
}

impl WooriBankProvider {
    pub const NAME: &'static str = "Woori Bank (Korea)";

    pub fn new(options: ProviderOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl RateProvider for WooriBankProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn country_code(&self) -> &str {
        COUNTRY_CODE
    }

    async fn fetch_rates(
        &self,
        pages: &dyn PageSourceFactory,
    ) -> Result<RateSnapshot, ProviderError> {
        fetch_rate_table(pages, &WOORI_PAGE, &self.options, self.name(), self.country_code())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_source::StaticPageFactory;

    #[tokio::test]
    async fn test_code_comes_before_name() {
        let markup = r#"
            <table class="table_type01"><tbody>
              <tr><td>usd</td><td>미국 달러</td><td>1,390.00</td><td>1.75</td><td>1,342.00</td></tr>
              <tr><td>EUR</td><td>유로</td><td>1,510.10</td><td>1.99</td><td>1,450.30</td><td>extra</td></tr>
            </tbody></table>
        "#;

        let records = WooriBankProvider::default()
            .fetch_rates(&StaticPageFactory::new(markup))
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].code, "USD");
        assert_eq!(records[0].currency, "미국 달러");
        assert_eq!(records[1].cash_sell, "1,450.30");
        assert_eq!(records[1].provider, "Woori Bank (Korea)");
    }

    #[tokio::test]
    async fn test_empty_table_shell_times_out() {
        let pages = StaticPageFactory::new("<table class=\"table_type01\"><tbody></tbody></table>");

        let err = WooriBankProvider::default().fetch_rates(&pages).await.unwrap_err();

        assert!(matches!(err, ProviderError::Timeout(_)));
    }
}
