//! CLI 명령어 구현 모듈.

pub mod cache;
pub mod config;
pub mod convert;
pub mod providers;
pub mod show;
