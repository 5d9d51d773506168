//! # Curcur Data
//!
//! 은행 환율 수집과 환산을 담당합니다.
//!
//! ## 구성
//!
//! - **page_source**: 렌더링된 페이지 추상화 (HTTP / 고정 마크업)
//! - **parser**: 환율 테이블 파싱
//! - **provider**: 은행별 Provider (하나은행, 우리은행)
//! - **retry**: 고정 간격 재시도
//! - **cache**: TTL 기반 파일 캐시
//! - **conversion**: 원화 환산
//! - **service**: 캐시 + 재시도 + Provider 조합
//! - **registry**: `국가.은행` 식별자 해석
//! - **context**: 명령 실행 컨텍스트

pub mod cache;
pub mod context;
pub mod conversion;
pub mod page_source;
pub mod parser;
pub mod provider;
pub mod registry;
pub mod retry;
pub mod service;

pub use cache::{CacheParams, CacheStore};
pub use context::RuntimeContext;
pub use conversion::{convert, ConversionRequest, BASE_CURRENCY};
pub use page_source::{
    HttpPageFactory, PageSourceFactory, RenderedPageSource, StaticPageFactory,
};
pub use parser::{parse_rate_table, RateTableLayout};
pub use provider::{
    HanaBankProvider, ProviderOptions, RateProvider, RateTablePage, WooriBankProvider,
};
pub use registry::{ProviderRegistry, ResolvedProvider, DEFAULT_COUNTRY};
pub use retry::RetryPolicy;
pub use service::RateService;
