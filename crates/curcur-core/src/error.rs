//! 환율 조회 파이프라인의 에러 타입.
//!
//! 에러 분류:
//! - [`ProviderError`]: 네트워크/타임아웃/파싱 실패 (재시도 대상)
//! - [`CacheError`]: 예상하지 못한 캐시 I/O 장애
//! - [`ConfigError`]: 설정 파일 읽기/쓰기 실패 (치명적이지 않음)
//! - [`RegistryError`]: Provider 식별자 해석 실패
//! - [`ConversionError`]: 환전 입력값 거부

use std::path::PathBuf;

use thiserror::Error;

/// Provider 에러 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Network,
    Timeout,
    Parse,
}

/// 환율 Provider 에러.
///
/// Provider가 호출자에게 전달하는 에러는 모두 이 세 가지 중 하나입니다.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// 페이지 이동 또는 브라우저 실행 실패
    #[error("Network error: {0}")]
    Network(String),

    /// 준비 셀렉터 대기 시간 초과
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// 파싱 결과 사용 가능한 행이 없음
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ProviderError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// 에러 분류 반환.
    pub const fn kind(&self) -> ProviderErrorKind {
        match self {
            Self::Network(_) => ProviderErrorKind::Network,
            Self::Timeout(_) => ProviderErrorKind::Timeout,
            Self::Parse(_) => ProviderErrorKind::Parse,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Network(msg) | Self::Timeout(msg) | Self::Parse(msg) => msg,
        }
    }
}

/// 캐시 에러.
///
/// 파일 없음, 손상된 내용, 만료는 캐시 미스로 처리되며 이 에러가 되지 않습니다.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 설정 에러.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 설정 파일 읽기 실패
    #[error("Failed to read config {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    /// 설정 파일 쓰기 실패
    #[error("Failed to write config {}: {message}", path.display())]
    Write { path: PathBuf, message: String },

    /// 잘못된 설정 값
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// 존재하지 않는 설정 키
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

/// Provider 레지스트리 에러.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Provider '{identifier}' not found (available: {})", available.join(", "))]
    NotFound {
        identifier: String,
        available: Vec<String>,
    },
}

/// 환전 요청 입력값 에러.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(String),

    #[error("Invalid transaction type: {0}. Must be 'cash_buy' or 'cash_sell'")]
    InvalidTransactionType(String),
}

/// getcurcur 통합 에러.
#[derive(Debug, Error)]
pub enum CurcurError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// getcurcur 작업을 위한 Result 타입.
pub type CurcurResult<T> = Result<T, CurcurError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_kind() {
        assert_eq!(
            ProviderError::network("connection refused").kind(),
            ProviderErrorKind::Network
        );
        assert_eq!(
            ProviderError::timeout("selector").kind(),
            ProviderErrorKind::Timeout
        );
        assert_eq!(ProviderError::parse("no rows").kind(), ProviderErrorKind::Parse);
        assert_eq!(ProviderError::parse("no rows").message(), "no rows");
    }

    #[test]
    fn test_registry_error_lists_identifiers() {
        let err = RegistryError::NotFound {
            identifier: "kb".to_string(),
            available: vec!["korea.hana".to_string(), "korea.woori".to_string()],
        };
        let text = err.to_string();
        assert!(text.contains("'kb'"));
        assert!(text.contains("korea.hana, korea.woori"));
    }
}
