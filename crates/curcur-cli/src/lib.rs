//! getcurcur CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 환율 조회 및 출력 (table, csv, json)
//! - 원화 환산
//! - Provider 목록, 캐시 삭제, 설정 관리

pub mod commands;
pub mod error;
pub mod output;

pub use error::CliError;
pub use output::OutputFormat;
