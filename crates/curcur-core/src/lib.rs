//! # Curcur Core
//!
//! 은행 환율 조회 도구의 핵심 타입을 제공합니다:
//! - 환율 레코드 및 거래 유형 ([`RateRecord`], [`TransactionType`])
//! - 환율 문자열 파싱 ([`parse_rate`])
//! - 에러 분류 ([`ProviderError`], [`CacheError`], [`ConfigError`] 등)
//! - 설정 관리 ([`ConfigStore`], [`AppConfig`])
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use self::config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
