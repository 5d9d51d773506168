//! 환율 스냅샷 파일 캐시.
//!
//! 항목 하나가 JSON 파일 하나이며, 파일명은 Provider 이름과 파라미터로 만든
//! SHA-256 해시입니다. 쓰기는 임시 파일에 기록한 뒤 rename으로 교체하므로
//! 읽는 쪽은 완성된 파일만 보게 됩니다.
//!
//! 캐시는 최선 노력(best effort)으로 동작합니다:
//! - 손상되었거나 만료된 항목은 삭제 후 miss로 처리
//! - 쓰기 실패는 경고만 남김
//! - 예상하지 못한 읽기 I/O 실패만 [`CacheError`]로 반환

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use curcur_core::{CacheError, RateSnapshot};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

/// 캐시 키 파라미터 (키 순서와 무관하게 같은 해시를 만들도록 정렬된 맵).
pub type CacheParams = BTreeMap<String, String>;

/// TTL 상한 (분).
const MAX_TTL_MINUTES: u64 = 1_000_000_000;

/// 디스크에 기록되는 항목.
#[derive(Debug, Serialize)]
struct CacheEntry<'a> {
    timestamp: String,
    provider: &'a str,
    data: &'a RateSnapshot,
}

/// 파일 기반 환율 캐시.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
    ttl: Duration,
}

impl CacheStore {
    /// 캐시를 생성합니다. 디렉토리는 첫 쓰기 때 만들어집니다.
    pub fn new(dir: impl Into<PathBuf>, ttl_minutes: u64) -> Self {
        let minutes = ttl_minutes.min(MAX_TTL_MINUTES) as i64;
        Self {
            dir: dir.into(),
            ttl: Duration::minutes(minutes),
        }
    }

    /// 캐시 디렉토리.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 항목 유효 기간.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Provider 이름과 파라미터로 캐시 키를 만듭니다.
    ///
    /// `"{provider}_{정렬된 파라미터 JSON}"`의 SHA-256 hex 값입니다.
    pub fn cache_key(provider: &str, params: &CacheParams) -> String {
        let params_json = serde_json::to_string(params).unwrap_or_default();
        let digest = Sha256::digest(format!("{}_{}", provider, params_json).as_bytes());
        hex::encode(digest)
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// 현재 시각 기준으로 항목을 조회합니다.
    pub fn get(
        &self,
        provider: &str,
        params: &CacheParams,
    ) -> Result<Option<RateSnapshot>, CacheError> {
        self.get_at(provider, params, Utc::now())
    }

    /// 주어진 시각 기준으로 항목을 조회합니다.
    ///
    /// 항목이 없거나, 손상되었거나, `now - timestamp > ttl`이면 `None`.
    pub fn get_at(
        &self,
        provider: &str,
        params: &CacheParams,
        now: DateTime<Utc>,
    ) -> Result<Option<RateSnapshot>, CacheError> {
        let path = self.entry_path(&Self::cache_key(provider, params));

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(provider, "Cache miss");
                return Ok(None);
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(path = %path.display(), error = %e, "Corrupted cache entry, removing");
                remove_entry(&path);
                return Ok(None);
            }
            Err(e) => return Err(CacheError::Io { path, source: e }),
        };

        let (timestamp, data) = match decode_entry(&content) {
            Ok(entry) => entry,
            Err(reason) => {
                warn!(path = %path.display(), reason, "Corrupted cache entry, removing");
                remove_entry(&path);
                return Ok(None);
            }
        };

        if now.signed_duration_since(timestamp) > self.ttl {
            debug!(provider, %timestamp, "Cache entry expired");
            remove_entry(&path);
            return Ok(None);
        }

        debug!(provider, count = data.len(), "Cache hit");
        Ok(Some(data))
    }

    /// 현재 시각으로 항목을 저장합니다.
    pub fn set(&self, provider: &str, data: &RateSnapshot, params: &CacheParams) -> bool {
        self.set_at(provider, data, params, Utc::now())
    }

    /// 주어진 시각으로 항목을 저장합니다.
    ///
    /// 빈 스냅샷은 저장하지 않습니다. 실패는 경고만 남기고 `false`를 반환합니다.
    pub fn set_at(
        &self,
        provider: &str,
        data: &RateSnapshot,
        params: &CacheParams,
        now: DateTime<Utc>,
    ) -> bool {
        if data.is_empty() {
            debug!(provider, "Skipping cache write for empty snapshot");
            return false;
        }

        let key = Self::cache_key(provider, params);
        let entry = CacheEntry {
            timestamp: now.to_rfc3339(),
            provider,
            data,
        };

        match self.write_entry(&key, &entry) {
            Ok(()) => {
                debug!(provider, count = data.len(), "Cached exchange rates");
                true
            }
            Err(e) => {
                warn!(provider, error = %e, "Failed to write cache entry");
                false
            }
        }
    }

    fn write_entry(&self, key: &str, entry: &CacheEntry<'_>) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let content = serde_json::to_string_pretty(entry)?;
        let tmp_path = self.dir.join(format!("{}.tmp", key));
        let final_path = self.entry_path(key);

        let written = fs::write(&tmp_path, content).and_then(|_| fs::rename(&tmp_path, &final_path));
        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        written
    }

    /// 캐시 디렉토리 전체를 삭제합니다.
    ///
    /// 삭제했으면 `true`, 디렉토리가 없었으면 `false`.
    pub fn clear(&self) -> Result<bool, CacheError> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => {
                debug!(dir = %self.dir.display(), "Cache cleared");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CacheError::Io {
                path: self.dir.clone(),
                source: e,
            }),
        }
    }
}

fn remove_entry(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to remove cache entry");
        }
    }
}

/// 항목을 해석합니다. `timestamp`와 `data` 필드가 모두 있어야 합니다.
fn decode_entry(content: &str) -> Result<(DateTime<Utc>, RateSnapshot), &'static str> {
    let value: Value = serde_json::from_str(content).map_err(|_| "invalid json")?;
    let object = value.as_object().ok_or("not an object")?;

    let timestamp = object
        .get("timestamp")
        .and_then(Value::as_str)
        .ok_or("missing timestamp")?;
    let timestamp = parse_timestamp(timestamp).ok_or("invalid timestamp")?;

    let data = object.get("data").cloned().ok_or("missing data")?;
    let data: RateSnapshot = serde_json::from_value(data).map_err(|_| "invalid data")?;

    Ok((timestamp, data))
}

/// RFC 3339 또는 시간대가 없는 ISO 8601 (UTC로 간주).
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use curcur_core::RateRecord;

    fn snapshot() -> RateSnapshot {
        vec![RateRecord {
            currency: "미국 USD".to_string(),
            code: "USD".to_string(),
            cash_buy: "1,380.00".to_string(),
            cash_sell: "1,340.00".to_string(),
            provider: "Test Bank".to_string(),
            country: "KR".to_string(),
        }]
    }

    fn params(pairs: &[(&str, &str)]) -> CacheParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_cache_key_is_order_independent() {
        let a = params(&[("currency", "USD"), ("type", "cash")]);
        let mut b = CacheParams::new();
        b.insert("type".to_string(), "cash".to_string());
        b.insert("currency".to_string(), "USD".to_string());

        assert_eq!(
            CacheStore::cache_key("hana", &a),
            CacheStore::cache_key("hana", &b)
        );
        assert_ne!(
            CacheStore::cache_key("hana", &a),
            CacheStore::cache_key("woori", &a)
        );
        assert_eq!(CacheStore::cache_key("hana", &a).len(), 64);
    }

    #[test]
    fn test_round_trip_and_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path(), 30);
        let now = Utc::now();
        let p = CacheParams::new();

        assert!(store.set_at("hana", &snapshot(), &p, now));

        let hit = store.get_at("hana", &p, now + Duration::minutes(29)).unwrap();
        assert_eq!(hit, Some(snapshot()));

        let expired = store.get_at("hana", &p, now + Duration::minutes(31)).unwrap();
        assert_eq!(expired, None);

        // 만료된 항목은 삭제되었으므로 과거 시각으로도 조회되지 않음
        assert_eq!(store.get_at("hana", &p, now).unwrap(), None);
    }

    #[test]
    fn test_empty_snapshot_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("cache"), 30);

        assert!(!store.set("hana", &Vec::new(), &CacheParams::new()));
        assert!(!dir.path().join("cache").exists());
    }

    #[test]
    fn test_empty_snapshot_keeps_existing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path(), 30);
        let p = CacheParams::new();

        assert!(store.set("hana", &snapshot(), &p));
        assert!(!store.set("hana", &Vec::new(), &p));

        assert_eq!(store.get("hana", &p).unwrap(), Some(snapshot()));
    }

    #[test]
    fn test_corrupted_entry_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path(), 30);
        let p = CacheParams::new();
        let path = store.entry_path(&CacheStore::cache_key("hana", &p));

        fs::write(&path, "{ broken").unwrap();
        assert_eq!(store.get("hana", &p).unwrap(), None);
        assert!(!path.exists());

        fs::write(&path, r#"{"timestamp": "2024-01-01T00:00:00"}"#).unwrap();
        assert_eq!(store.get("hana", &p).unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_naive_timestamp_is_read_as_utc() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path(), 30);
        let p = CacheParams::new();
        let path = store.entry_path(&CacheStore::cache_key("hana", &p));
        let data = serde_json::to_string(&snapshot()).unwrap();
        fs::write(
            &path,
            format!(r#"{{"timestamp": "2024-05-01T12:00:00.123456", "data": {}}}"#, data),
        )
        .unwrap();

        let now = parse_timestamp("2024-05-01T12:10:00Z").unwrap();
        assert_eq!(store.get_at("hana", &p, now).unwrap(), Some(snapshot()));
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("cache"), 30);

        assert!(!store.clear().unwrap());
        store.set("hana", &snapshot(), &CacheParams::new());
        assert!(store.clear().unwrap());
        assert!(!store.dir().exists());
    }
}
