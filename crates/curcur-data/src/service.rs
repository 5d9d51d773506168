//! 환율 조회 서비스.
//!
//! Provider 조회 앞뒤로 캐시와 재시도를 적용합니다:
//!
//! 1. 캐시 사용 시 유효한 항목이 있으면 즉시 반환
//! 2. 없으면 재시도 정책에 따라 Provider 조회
//! 3. 캐시가 켜져 있으면 비어 있지 않은 결과를 저장 (`use_cache`와 무관)

use std::sync::Arc;

use curcur_core::{CurcurResult, RateSnapshot};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::cache::{CacheParams, CacheStore};
use crate::conversion::{convert, ConversionRequest, BASE_CURRENCY};
use crate::page_source::PageSourceFactory;
use crate::provider::RateProvider;
use crate::retry::RetryPolicy;

/// Provider 하나에 대한 환율 조회 서비스.
#[derive(Clone)]
pub struct RateService {
    provider: Arc<dyn RateProvider>,
    cache: Option<Arc<CacheStore>>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for RateService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateService")
            .field("provider", &self.provider.name())
            .field("cache", &self.cache)
            .field("retry", &self.retry)
            .finish()
    }
}

impl RateService {
    /// 캐시 없이 기본 재시도 정책으로 생성.
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self {
            provider,
            cache: None,
            retry: RetryPolicy::default(),
        }
    }

    /// 캐시를 설정합니다.
    pub fn with_cache(mut self, cache: Option<Arc<CacheStore>>) -> Self {
        self.cache = cache;
        self
    }

    /// 재시도 정책을 설정합니다.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// 대상 Provider.
    pub fn provider(&self) -> &dyn RateProvider {
        self.provider.as_ref()
    }

    /// 환율을 조회합니다.
    ///
    /// # Errors
    ///
    /// - `CurcurError::Provider`: 모든 재시도가 실패 (마지막 에러)
    /// - `CurcurError::Cache`: 캐시 읽기 중 예상하지 못한 I/O 실패
    pub async fn get_rates(
        &self,
        pages: &dyn PageSourceFactory,
        use_cache: bool,
    ) -> CurcurResult<RateSnapshot> {
        let name = self.provider.name();
        let params = CacheParams::new();

        if let Some(cache) = self.cache.as_deref().filter(|_| use_cache) {
            match cache.get(name, &params)? {
                Some(cached) if !cached.is_empty() => {
                    info!(provider = name, count = cached.len(), "Using cached exchange rates");
                    return Ok(cached);
                }
                _ => debug!(provider = name, "No usable cache entry"),
            }
        }

        let provider = self.provider.as_ref();
        let records = self
            .retry
            .run(name, move || provider.fetch_rates(pages))
            .await?;

        if let Some(cache) = self.cache.as_deref() {
            cache.set(name, &records, &params);
        }

        Ok(records)
    }

    /// 금액을 원화로 환산합니다.
    ///
    /// 입력값 검증은 환율 조회 전에 수행됩니다.
    /// 통화를 찾을 수 없거나 환율을 사용할 수 없으면 `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - `CurcurError::Conversion`: 음수 금액 또는 잘못된 거래 유형
    /// - `get_rates`의 에러
    pub async fn convert_amount(
        &self,
        amount: Decimal,
        from: &str,
        pages: &dyn PageSourceFactory,
        to: &str,
        transaction_type: &str,
    ) -> CurcurResult<Option<Decimal>> {
        let request = ConversionRequest::new(amount, from, to, transaction_type)?;

        if !request.is_supported_target() {
            warn!(
                to = %request.to,
                base = BASE_CURRENCY,
                "Conversion target not yet supported"
            );
            return Ok(None);
        }

        let rates = self.get_rates(pages, true).await?;
        if rates.is_empty() {
            return Ok(None);
        }

        Ok(convert(&rates, &request))
    }
}
