//! 렌더링된 페이지 소스.
//!
//! 은행 환율 페이지는 클라이언트 측에서 테이블을 채우므로, Provider는 원본 HTTP 응답이 아닌
//! "렌더링된 마크업"을 필요로 합니다. 이 모듈은 그 능력을 trait으로 추상화합니다.
//!
//! - [`RenderedPageSource`]: 페이지 이동, 셀렉터 대기, 마크업 조회
//! - [`PageSourceFactory`]: 조회 한 번에 사용할 페이지를 생성
//! - [`HttpPageFactory`]: reqwest 기반 구현 (서버 렌더링 마크업을 폴링)
//! - [`StaticPageFactory`]: 고정 마크업을 반환하는 오프라인 구현

use std::time::Duration;

use async_trait::async_trait;
use curcur_core::{BrowserConfig, ProviderError};
use reqwest::Client;
use scraper::{Html, Selector};
use tokio::time::Instant;
use tracing::debug;

/// 렌더링된 페이지 하나.
///
/// 페이지는 `fetch_rates` 한 번의 호출 범위에서만 사용되며,
/// 사용이 끝나면 모든 경로에서 [`close`](RenderedPageSource::close)가 호출되어야 합니다.
#[async_trait]
pub trait RenderedPageSource: Send {
    /// URL로 이동합니다.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Network`: 이동 실패
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<(), ProviderError>;

    /// 셀렉터가 나타날 때까지 대기합니다.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Timeout`: 제한 시간 안에 셀렉터가 나타나지 않음
    async fn wait_for_selector(&mut self, selector: &str, timeout_ms: u64)
        -> Result<(), ProviderError>;

    /// 현재 마크업을 반환합니다.
    async fn content(&mut self) -> Result<String, ProviderError>;

    /// 페이지 자원을 해제합니다.
    async fn close(&mut self);
}

/// 페이지 생성기.
#[async_trait]
pub trait PageSourceFactory: Send + Sync {
    /// 새 페이지를 엽니다.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Network`: 브라우저/클라이언트 실행 실패
    async fn open_page(&self) -> Result<Box<dyn RenderedPageSource>, ProviderError>;
}

/// 마크업에 셀렉터와 일치하는 요소가 있는지 확인.
pub fn markup_has_selector(markup: &str, selector: &str) -> Result<bool, ProviderError> {
    let selector = Selector::parse(selector)
        .map_err(|e| ProviderError::parse(format!("Invalid selector '{}': {}", selector, e)))?;
    let document = Html::parse_document(markup);
    let found = document.select(&selector).next().is_some();
    Ok(found)
}

// =============================================================================
// HTTP 구현
// =============================================================================

/// reqwest 기반 페이지 생성기.
///
/// JavaScript를 실행하지 않으므로 서버에서 렌더링된 테이블만 읽을 수 있습니다.
/// 셀렉터 대기 중에는 `poll_interval` 간격으로 페이지를 다시 받아옵니다.
#[derive(Debug, Clone)]
pub struct HttpPageFactory {
    client: Client,
    poll_interval: Duration,
}

impl HttpPageFactory {
    /// 브라우저 설정으로 생성.
    pub fn new(config: &BrowserConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ProviderError::network(format!("Failed to launch HTTP client: {}", e)))?;

        debug!(headless = config.headless, "HTTP page source ready");

        Ok(Self {
            client,
            poll_interval: Duration::from_millis(500),
        })
    }

    /// 셀렉터 대기 중 재요청 간격을 설정합니다.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

#[async_trait]
impl PageSourceFactory for HttpPageFactory {
    async fn open_page(&self) -> Result<Box<dyn RenderedPageSource>, ProviderError> {
        Ok(Box::new(HttpPage {
            client: self.client.clone(),
            poll_interval: self.poll_interval,
            url: None,
            timeout: Duration::from_secs(30),
            markup: None,
        }))
    }
}

/// reqwest로 받아온 페이지.
struct HttpPage {
    client: Client,
    poll_interval: Duration,
    url: Option<String>,
    timeout: Duration,
    markup: Option<String>,
}

impl HttpPage {
    async fn load(&self, url: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::network(format!("Navigation to {} timed out: {}", url, e))
                } else {
                    ProviderError::network(format!("Failed to navigate to {}: {}", url, e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::network(format!(
                "Failed to navigate to {}: HTTP {}",
                url, status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("Failed to read {}: {}", url, e)))
    }
}

#[async_trait]
impl RenderedPageSource for HttpPage {
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<(), ProviderError> {
        self.timeout = Duration::from_millis(timeout_ms);
        let markup = self.load(url).await?;
        self.url = Some(url.to_string());
        self.markup = Some(markup);
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout_ms: u64,
    ) -> Result<(), ProviderError> {
        let url = self
            .url
            .clone()
            .ok_or_else(|| ProviderError::network("wait_for_selector called before navigate"))?;
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            let markup = self.markup.as_deref().unwrap_or_default();
            if markup_has_selector(markup, selector)? {
                return Ok(());
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(ProviderError::timeout(format!(
                    "Timeout waiting for '{}' after {}ms",
                    selector, timeout_ms
                )));
            }

            tokio::time::sleep(self.poll_interval.min(deadline - now)).await;

            match self.load(&url).await {
                Ok(markup) => self.markup = Some(markup),
                Err(e) => debug!(error = %e, "Reload while waiting for selector failed"),
            }
        }
    }

    async fn content(&mut self) -> Result<String, ProviderError> {
        self.markup
            .clone()
            .ok_or_else(|| ProviderError::network("content requested before navigate"))
    }

    async fn close(&mut self) {
        self.markup = None;
        self.url = None;
    }
}

// =============================================================================
// 고정 마크업 구현
// =============================================================================

/// 고정 마크업을 반환하는 페이지 생성기 (오프라인 테스트용).
#[derive(Debug, Clone, Default)]
pub struct StaticPageFactory {
    markup: String,
}

impl StaticPageFactory {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }
}

#[async_trait]
impl PageSourceFactory for StaticPageFactory {
    async fn open_page(&self) -> Result<Box<dyn RenderedPageSource>, ProviderError> {
        Ok(Box::new(StaticPage {
            markup: self.markup.clone(),
            navigated: false,
        }))
    }
}

struct StaticPage {
    markup: String,
    navigated: bool,
}

#[async_trait]
impl RenderedPageSource for StaticPage {
    async fn navigate(&mut self, _url: &str, _timeout_ms: u64) -> Result<(), ProviderError> {
        self.navigated = true;
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout_ms: u64,
    ) -> Result<(), ProviderError> {
        if self.navigated && markup_has_selector(&self.markup, selector)? {
            Ok(())
        } else {
            Err(ProviderError::timeout(format!(
                "Timeout waiting for '{}' after {}ms",
                selector, timeout_ms
            )))
        }
    }

    async fn content(&mut self) -> Result<String, ProviderError> {
        Ok(self.markup.clone())
    }

    async fn close(&mut self) {
        self.navigated = false;
    }
}
