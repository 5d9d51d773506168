//! Provider 목록 (`list-providers`).

use curcur_data::ProviderRegistry;

use crate::output::format_providers;

/// 등록된 Provider 목록을 테이블로 만듭니다.
pub fn list_providers(registry: &ProviderRegistry) -> String {
    format_providers(&registry.identifiers())
}
