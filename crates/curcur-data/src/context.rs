//! 실행 컨텍스트.
//!
//! CLI 명령 하나를 실행하는 데 필요한 설정, 캐시, 페이지 소스, 레지스트리를 묶습니다.

use std::path::PathBuf;
use std::sync::Arc;

use curcur_core::{default_cache_dir, AppConfig, ProviderError, RegistryError};

use crate::cache::CacheStore;
use crate::page_source::{HttpPageFactory, PageSourceFactory};
use crate::provider::ProviderOptions;
use crate::registry::{ProviderRegistry, ResolvedProvider};
use crate::service::RateService;

/// 명령 실행 컨텍스트.
#[derive(Clone)]
pub struct RuntimeContext {
    /// 적용된 설정
    pub config: AppConfig,
    /// 캐시 (비활성화 시 `None`)
    pub cache: Option<Arc<CacheStore>>,
    /// 페이지 소스
    pub pages: Arc<dyn PageSourceFactory>,
    /// Provider 레지스트리
    pub registry: ProviderRegistry,
}

impl RuntimeContext {
    /// 구성 요소를 직접 지정해 생성합니다.
    pub fn new(config: AppConfig, cache_dir: PathBuf, pages: Arc<dyn PageSourceFactory>) -> Self {
        let cache = config
            .cache
            .enabled
            .then(|| Arc::new(CacheStore::new(cache_dir, config.cache.ttl_minutes)));

        Self {
            config,
            cache,
            pages,
            registry: ProviderRegistry::builtin(),
        }
    }

    /// 기본 캐시 디렉토리와 HTTP 페이지 소스로 생성합니다.
    pub fn from_config(config: AppConfig) -> Result<Self, ProviderError> {
        let pages = Arc::new(HttpPageFactory::new(&config.browser)?);
        Ok(Self::new(config, default_cache_dir(), pages))
    }

    /// Provider 실행 옵션.
    pub fn provider_options(&self) -> ProviderOptions {
        ProviderOptions::from(&self.config.browser)
    }

    /// 식별자로 Provider를 찾습니다.
    pub fn resolve(&self, identifier: &str) -> Result<ResolvedProvider, RegistryError> {
        self.registry.create(identifier, self.provider_options())
    }

    /// 식별자에 대한 환율 서비스를 만듭니다.
    pub fn service_for(&self, identifier: &str) -> Result<RateService, RegistryError> {
        let resolved = self.resolve(identifier)?;
        Ok(RateService::new(resolved.provider).with_cache(self.cache.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_source::StaticPageFactory;

    #[test]
    fn test_cache_follows_config() {
        let dir = tempfile::tempdir().unwrap();
        let pages: Arc<dyn PageSourceFactory> = Arc::new(StaticPageFactory::default());

        let enabled = RuntimeContext::new(AppConfig::default(), dir.path().into(), pages.clone());
        assert_eq!(enabled.cache.as_ref().unwrap().dir(), dir.path());

        let mut config = AppConfig::default();
        config.cache.enabled = false;
        let disabled = RuntimeContext::new(config, dir.path().into(), pages);
        assert!(disabled.cache.is_none());
    }

    #[test]
    fn test_service_for_unknown_provider() {
        let dir = tempfile::tempdir().unwrap();
        let context = RuntimeContext::new(
            AppConfig::default(),
            dir.path().into(),
            Arc::new(StaticPageFactory::default()),
        );

        assert!(context.service_for("korea.woori").is_ok());
        assert!(matches!(
            context.service_for("nowhere"),
            Err(RegistryError::NotFound { .. })
        ));
    }
}
