//! 한국 은행 Provider.

pub mod hana;
pub mod woori;

pub use hana::HanaBankProvider;
pub use woori::WooriBankProvider;

/// 한국 국가 코드.
pub const COUNTRY_CODE: &str = "KR";
