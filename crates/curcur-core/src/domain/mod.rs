//! 도메인 모델.

pub mod rate;

pub use rate::{
    is_valid_code, parse_rate, InvalidRate, RateRecord, RateSnapshot, TransactionType,
    PLACEHOLDER,
};
