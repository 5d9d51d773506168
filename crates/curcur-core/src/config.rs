//! 설정 관리.
//!
//! 사용자 설정은 `~/.getcurcur/config.json`에 JSON으로 저장됩니다.
//! 로드 시 기본값 위에 파일 내용을 키 단위로 재귀 병합하고,
//! 타입이 있는 [`AppConfig`]를 만들 때는 `GETCURCUR__` 환경 변수를 추가로 적용합니다.
//! 설정 파일을 읽을 수 없으면 경고를 남기고 기본값을 사용합니다.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::ConfigError;

/// 환경 변수 접두사 (예: `GETCURCUR__CACHE__ENABLED=false`).
pub const ENV_PREFIX: &str = "GETCURCUR";

/// 애플리케이션 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 기본 Provider 식별자
    pub default_provider: String,
    /// 캐시 설정
    pub cache: CacheConfig,
    /// 브라우저(페이지 소스) 설정
    pub browser: BrowserConfig,
    /// 출력 설정
    pub output: OutputConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_provider: "korea.hana".to_string(),
            cache: CacheConfig::default(),
            browser: BrowserConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// 캐시 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 캐시 사용 여부
    pub enabled: bool,
    /// 캐시 TTL (분)
    pub ttl_minutes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_minutes: 30,
        }
    }
}

/// 브라우저 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// 헤드리스 모드
    pub headless: bool,
    /// 페이지 이동 타임아웃 (밀리초)
    pub timeout: u64,
    /// 환율 테이블 대기 타임아웃 (밀리초)
    pub readiness_timeout: u64,
    /// User-Agent
    pub user_agent: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            timeout: 30_000,
            readiness_timeout: 10_000,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

/// 출력 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// 기본 출력 형식 (table, json, csv)
    pub default_format: String,
    /// 기본 통화 필터
    pub default_currency: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "table".to_string(),
            default_currency: None,
        }
    }
}

/// 애플리케이션 데이터 디렉토리 (`~/.getcurcur`).
pub fn app_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".getcurcur")
}

/// 기본 캐시 디렉토리 (`~/.getcurcur/cache`).
pub fn default_cache_dir() -> PathBuf {
    app_dir().join("cache")
}

fn default_values() -> Value {
    serde_json::to_value(AppConfig::default()).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// 파일에 저장되는 사용자 설정.
///
/// 점(.)으로 구분된 키 경로로 값을 읽고 쓸 수 있습니다 (예: `cache.ttl_minutes`).
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    values: Value,
}

impl ConfigStore {
    /// 기본 설정 파일 경로.
    pub fn default_path() -> PathBuf {
        app_dir().join("config.json")
    }

    /// 설정을 로드합니다. 실패하면 경고 후 기본값을 사용합니다.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::try_load(&path) {
            Ok(store) => store,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load config, using defaults");
                Self {
                    path,
                    values: default_values(),
                }
            }
        }
    }

    /// 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값으로 새 파일을 만듭니다 (쓰기 실패는 무시).
    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let store = Self {
                path: path.to_path_buf(),
                values: default_values(),
            };
            if let Err(e) = store.save() {
                warn!(error = %e, "Failed to create default config file");
            }
            return Ok(store);
        }

        let built = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::from(path).format(config::FileFormat::Json))
            .build()
            .map_err(|e| ConfigError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let values: Value = built.try_deserialize()?;
        debug!(path = %path.display(), "Configuration loaded");

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    /// 설정 파일 경로.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 병합된 전체 설정 값.
    pub fn values(&self) -> &Value {
        &self.values
    }

    /// 환경 변수 오버라이드를 적용한 타입 설정.
    ///
    /// 값이 잘못되어 있으면 경고 후 기본값을 반환합니다.
    pub fn settings(&self) -> AppConfig {
        match self.try_settings() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Invalid configuration values, using defaults");
                AppConfig::default()
            }
        }
    }

    fn try_settings(&self) -> Result<AppConfig, ConfigError> {
        let built = config::Config::builder()
            .add_source(config::Config::try_from(&self.values)?)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(built.try_deserialize()?)
    }

    /// 점 경로로 값을 조회합니다.
    pub fn get(&self, key: &str) -> Option<&Value> {
        key.split('.')
            .try_fold(&self.values, |value, part| value.as_object()?.get(part))
    }

    /// 점 경로에 값을 설정하고 파일에 저장합니다.
    ///
    /// 중간 경로가 없거나 객체가 아니면 빈 객체로 만듭니다.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let (last, parents) = parts
            .split_last()
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let unknown = || ConfigError::UnknownKey(key.to_string());

        let mut current = &mut self.values;
        for part in parents {
            current = ensure_object(current)
                .ok_or_else(unknown)?
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        ensure_object(current)
            .ok_or_else(unknown)?
            .insert(last.to_string(), value);

        self.save()
    }

    /// 기본값으로 초기화하고 저장합니다.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.values = default_values();
        self.save()
    }

    /// 현재 값을 파일에 저장합니다.
    pub fn save(&self) -> Result<(), ConfigError> {
        let write_err = |message: String| ConfigError::Write {
            path: self.path.clone(),
            message,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }

        let content =
            serde_json::to_string_pretty(&self.values).map_err(|e| write_err(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| write_err(e.to_string()))?;

        debug!(path = %self.path.display(), "Configuration saved");
        Ok(())
    }
}

fn ensure_object(value: &mut Value) -> Option<&mut Map<String, Value>> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    value.as_object_mut()
}
