//! 캐시 삭제 (`clear-cache`).

use curcur_data::CacheStore;

use crate::error::CliError;

/// 캐시 디렉토리를 삭제합니다.
pub fn clear_cache(cache: &CacheStore) -> Result<String, CliError> {
    if cache.clear()? {
        Ok("Cache cleared successfully!".to_string())
    } else {
        Ok("No cache to clear.".to_string())
    }
}
