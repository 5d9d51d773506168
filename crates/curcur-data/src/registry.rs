//! Provider 레지스트리.
//!
//! Provider는 `국가.은행` 형태의 식별자로 등록됩니다 (예: `korea.hana`).
//! 식별자 해석 순서:
//!
//! 1. 정확히 일치하는 `국가.은행`
//! 2. 기본 국가(`korea`)의 은행 이름
//! 3. 모든 국가에서 은행 이름이 일치하는 첫 항목 (국가/은행 이름 순)

use std::collections::BTreeMap;
use std::sync::Arc;

use curcur_core::RegistryError;
use tracing::debug;

use crate::provider::{HanaBankProvider, ProviderOptions, RateProvider, WooriBankProvider};

/// 기본 국가.
pub const DEFAULT_COUNTRY: &str = "korea";

/// Provider 생성 함수.
pub type ProviderFactory = fn(ProviderOptions) -> Arc<dyn RateProvider>;

fn hana(options: ProviderOptions) -> Arc<dyn RateProvider> {
    Arc::new(HanaBankProvider::new(options))
}

fn woori(options: ProviderOptions) -> Arc<dyn RateProvider> {
    Arc::new(WooriBankProvider::new(options))
}

/// 해석된 Provider.
#[derive(Clone)]
pub struct ResolvedProvider {
    /// 정규 식별자 (`국가.은행`)
    pub identifier: String,
    /// Provider 인스턴스
    pub provider: Arc<dyn RateProvider>,
}

/// 국가 → 은행 → 생성 함수.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    countries: BTreeMap<String, BTreeMap<String, ProviderFactory>>,
}

impl ProviderRegistry {
    /// 빈 레지스트리.
    pub fn new() -> Self {
        Self::default()
    }

    /// 기본 Provider(`korea.hana`, `korea.woori`)가 등록된 레지스트리.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register("korea", "hana", hana)
            .register("korea", "woori", woori);
        registry
    }

    /// Provider를 등록합니다. 같은 식별자가 있으면 교체합니다.
    pub fn register(&mut self, country: &str, bank: &str, factory: ProviderFactory) -> &mut Self {
        self.countries
            .entry(country.to_string())
            .or_default()
            .insert(bank.to_string(), factory);
        self
    }

    /// 등록된 모든 식별자 (정렬됨).
    pub fn identifiers(&self) -> Vec<String> {
        self.countries
            .iter()
            .flat_map(|(country, banks)| {
                banks.keys().map(move |bank| format!("{}.{}", country, bank))
            })
            .collect()
    }

    fn lookup(&self, country: &str, bank: &str) -> Option<(String, ProviderFactory)> {
        self.countries
            .get(country)?
            .get(bank)
            .map(|factory| (format!("{}.{}", country, bank), *factory))
    }

    fn find(&self, identifier: &str) -> Option<(String, ProviderFactory)> {
        if let Some((country, bank)) = identifier.split_once('.') {
            if let Some(found) = self.lookup(country, bank) {
                return Some(found);
            }
        }

        if let Some(found) = self.lookup(DEFAULT_COUNTRY, identifier) {
            return Some(found);
        }

        self.countries.iter().find_map(|(country, banks)| {
            banks
                .get(identifier)
                .map(|factory| (format!("{}.{}", country, identifier), *factory))
        })
    }

    /// 식별자로 Provider를 생성합니다.
    ///
    /// # Errors
    ///
    /// - `RegistryError::NotFound`: 일치하는 Provider 없음 (등록된 식별자 목록 포함)
    pub fn create(
        &self,
        identifier: &str,
        options: ProviderOptions,
    ) -> Result<ResolvedProvider, RegistryError> {
        let (resolved, factory) = self
            .find(identifier)
            .ok_or_else(|| self.not_found(identifier))?;

        debug!(requested = identifier, resolved = %resolved, "Resolved provider");

        Ok(ResolvedProvider {
            identifier: resolved,
            provider: factory(options),
        })
    }

    fn not_found(&self, identifier: &str) -> RegistryError {
        RegistryError::NotFound {
            identifier: identifier.to_string(),
            available: self.identifiers(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_identifiers() {
        let registry = ProviderRegistry::builtin();

        assert_eq!(registry.identifiers(), vec!["korea.hana", "korea.woori"]);
    }

    #[test]
    fn test_resolution_order() {
        let mut registry = ProviderRegistry::builtin();
        registry.register("japan", "mufg", hana);

        let resolve = |identifier: &str| {
            registry
                .create(identifier, ProviderOptions::default())
                .map(|resolved| resolved.identifier)
                .unwrap()
        };

        assert_eq!(resolve("korea.hana"), "korea.hana");
        assert_eq!(resolve("woori"), "korea.woori");
        assert_eq!(resolve("mufg"), "japan.mufg");
        assert_eq!(resolve("japan.mufg"), "japan.mufg");
    }

    #[test]
    fn test_unknown_identifier_lists_available() {
        let registry = ProviderRegistry::builtin();

        let err = registry
            .create("korea.unknown", ProviderOptions::default())
            .err()
            .unwrap();

        assert_eq!(
            err,
            RegistryError::NotFound {
                identifier: "korea.unknown".to_string(),
                available: vec!["korea.hana".to_string(), "korea.woori".to_string()],
            }
        );
        assert!(err.to_string().contains("korea.hana, korea.woori"));
    }

    #[test]
    fn test_create_returns_named_provider() {
        let registry = ProviderRegistry::builtin();

        let resolved = registry.create("hana", ProviderOptions::default()).unwrap();

        assert_eq!(resolved.identifier, "korea.hana");
        assert_eq!(resolved.provider.name(), "KEB Hana Bank (Korea)");
        assert_eq!(resolved.provider.country_code(), "KR");
    }
}
