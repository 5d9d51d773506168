//! KEB 하나은행 환율 Provider.
//!
//! 하나은행 환율 조회 페이지는 `#p_grid1_tb` 테이블의 행을 클라이언트 측에서 채우므로
//! 첫 행이 나타날 때까지 대기합니다.
//! 열 배치: 0 통화명, 1 통화 코드, 2 현찰 살 때, 4 현찰 팔 때.

use async_trait::async_trait;
use curcur_core::{ProviderError, RateSnapshot};

use super::COUNTRY_CODE;
use crate::page_source::PageSourceFactory;
use crate::parser::RateTableLayout;
use crate::provider::{fetch_rate_table, ProviderOptions, RateProvider, RateTablePage};

/// 하나은행 환율 페이지.
pub const HANA_PAGE: RateTablePage = RateTablePage {
    url: "https://www.kebhana.com/cont/mall/mall15/mall1501/index.jsp",
    ready_selector: "#p_grid1_tb > tbody > tr",
    layout: RateTableLayout::new("#p_grid1_tb > tbody > tr", 0, 1, 2, 4),
};

/// KEB 하나은행 Provider.
#[derive(Debug, Clone, Default)]
pub struct HanaBankProvider {
    options: ProviderOptions,
}

impl HanaBankProvider {
    pub const NAME: &'static str = "KEB Hana Bank (Korea)";

    pub fn new(options: ProviderOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl RateProvider for HanaBankProvider {
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
        fetch_rate_table(pages, &HANA_PAGE, &self.options, self.name(), self.country_code()).await
    }
}
