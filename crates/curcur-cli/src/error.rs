//! CLI 에러와 종료 코드.

use curcur_core::{
    CacheError, ConfigError, ConversionError, CurcurError, ProviderError, ProviderErrorKind,
    RegistryError,
};
use thiserror::Error;

/// 명령 실행 에러.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Invalid input: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot convert {from} to {to}")]
    NotConvertible { from: String, to: String },

    #[error("Failed to render output: {0}")]
    Output(String),
}

impl From<CurcurError> for CliError {
    fn from(err: CurcurError) -> Self {
        match err {
            CurcurError::Provider(e) => Self::Provider(e),
            CurcurError::Cache(e) => Self::Cache(e),
            CurcurError::Config(e) => Self::Config(e),
            CurcurError::Registry(e) => Self::Registry(e),
            CurcurError::Conversion(e) => Self::Conversion(e),
        }
    }
}

impl CliError {
    /// 프로세스 종료 코드.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NotConvertible { .. } | Self::Output(_) => 1,
            Self::Registry(_) | Self::Conversion(_) | Self::InvalidInput(_) => 2,
            Self::Provider(e) => match e.kind() {
                ProviderErrorKind::Network => 3,
                ProviderErrorKind::Timeout => 4,
                ProviderErrorKind::Parse => 5,
            },
            Self::Cache(_) => 6,
            Self::Config(_) => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_failure() {
        assert_eq!(CliError::from(ProviderError::network("x")).exit_code(), 3);
        assert_eq!(CliError::from(ProviderError::timeout("x")).exit_code(), 4);
        assert_eq!(CliError::from(ProviderError::parse("x")).exit_code(), 5);
        assert_eq!(
            CliError::from(ConfigError::UnknownKey("a.b".into())).exit_code(),
            7
        );
        assert_eq!(
            CliError::NotConvertible {
                from: "USD".into(),
                to: "EUR".into()
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn test_curcur_error_keeps_kind() {
        let err = CliError::from(CurcurError::from(ProviderError::timeout("slow")));

        assert!(matches!(err, CliError::Provider(ProviderError::Timeout(_))));
        assert_eq!(err.to_string(), "Timeout error: slow");
    }

    #[test]
    fn test_not_convertible_message() {
        let err = CliError::NotConvertible {
            from: "XYZ".into(),
            to: "KRW".into(),
        };

        assert_eq!(err.to_string(), "Cannot convert XYZ to KRW");
    }
}
