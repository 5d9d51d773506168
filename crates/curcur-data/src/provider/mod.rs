//! 환율 Provider.
//!
//! 각 Provider는 은행 하나의 환율 페이지를 열어 테이블을 읽어 옵니다.
//! 재시도와 캐시는 [`RateService`](crate::service::RateService)가 담당하고,
//! Provider는 한 번의 조회만 수행합니다.

pub mod korea;

use async_trait::async_trait;
use curcur_core::{BrowserConfig, ProviderError, RateSnapshot};
use tracing::{debug, info};

use crate::page_source::{PageSourceFactory, RenderedPageSource};
use crate::parser::{parse_rate_table, RateTableLayout};

pub use korea::{HanaBankProvider, WooriBankProvider};

/// 은행 환율 Provider.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// 표시용 은행 이름 (예: "KEB Hana Bank (Korea)").
    fn name(&self) -> &str;

    /// 국가 코드 (예: "KR").
    fn country_code(&self) -> &str;

    /// 환율 테이블을 한 번 조회합니다.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Network`: 페이지 이동 실패
    /// - `ProviderError::Timeout`: 테이블이 제한 시간 안에 나타나지 않음
    /// - `ProviderError::Parse`: 유효한 행이 없음
    async fn fetch_rates(&self, pages: &dyn PageSourceFactory)
        -> Result<RateSnapshot, ProviderError>;
}

/// Provider 실행 옵션.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderOptions {
    /// 페이지 이동 타임아웃 (밀리초)
    pub timeout_ms: u64,
    /// 테이블 대기 타임아웃 (밀리초)
    pub readiness_timeout_ms: u64,
}

impl ProviderOptions {
    /// 테이블 대기 타임아웃 (이동 타임아웃을 넘지 않음).
    pub fn readiness_timeout(&self) -> u64 {
        self.readiness_timeout_ms.min(self.timeout_ms)
    }
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self::from(&BrowserConfig::default())
    }
}

impl From<&BrowserConfig> for ProviderOptions {
    fn from(config: &BrowserConfig) -> Self {
        Self {
            timeout_ms: config.timeout,
            readiness_timeout_ms: config.readiness_timeout,
        }
    }
}

/// 테이블을 가진 은행 페이지.
#[derive(Debug, Clone, Copy)]
pub struct RateTablePage {
    /// 환율 페이지 URL
    pub url: &'static str,
    /// 테이블이 준비되었음을 나타내는 셀렉터
    pub ready_selector: &'static str,
    /// 테이블 배치
    pub layout: RateTableLayout,
}

/// 페이지를 열어 환율 테이블을 읽고, 결과와 관계없이 페이지를 닫습니다.
pub async fn fetch_rate_table(
    pages: &dyn PageSourceFactory,
    target: &RateTablePage,
    options: &ProviderOptions,
    provider: &str,
    country: &str,
) -> Result<RateSnapshot, ProviderError> {
    info!(provider, url = target.url, "Fetching exchange rates");

    let mut page = pages.open_page().await?;
    let result = scrape(page.as_mut(), target, options, provider, country).await;
    page.close().await;

    if let Ok(records) = &result {
        info!(provider, count = records.len(), "Fetched exchange rates");
    }
    result
}

async fn scrape(
    page: &mut dyn RenderedPageSource,
    target: &RateTablePage,
    options: &ProviderOptions,
    provider: &str,
    country: &str,
) -> Result<RateSnapshot, ProviderError> {
    page.navigate(target.url, options.timeout_ms).await?;

    debug!(selector = target.ready_selector, "Waiting for rate table");
    page.wait_for_selector(target.ready_selector, options.readiness_timeout())
        .await?;

    let markup = page.content().await?;
    parse_rate_table(&markup, &target.layout, provider, country)
}
