//! getcurcur CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 기본 은행(하나은행) 환율 보기
//! getcurcur show
//!
//! # 우리은행 USD 환율만 JSON으로
//! getcurcur show -b woori -c USD -f json
//!
//! # 100 USD를 원화로 (현찰 살 때)
//! getcurcur convert 100 USD
//!
//! # Provider 목록 / 캐시 삭제
//! getcurcur list-providers
//! getcurcur clear-cache
//!
//! # 설정
//! getcurcur config set cache.ttl_minutes 10
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use curcur_core::{default_cache_dir, init_logging, ConfigStore, LogConfig, TransactionType};
use curcur_data::{CacheStore, ProviderRegistry, RuntimeContext};
use rust_decimal::Decimal;
use tracing::{debug, error};

use curcur_cli::commands::cache::clear_cache;
use curcur_cli::commands::config::{run_config, ConfigAction};
use curcur_cli::commands::convert::{convert_amount, ConvertConfig};
use curcur_cli::commands::providers::list_providers;
use curcur_cli::commands::show::{show_rates, ShowConfig};
use curcur_cli::{CliError, OutputFormat};

#[derive(Parser)]
#[command(name = "getcurcur")]
#[command(about = "Get current currency exchange rates from various banks", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로 (기본: ~/.getcurcur/config.json)
    #[arg(long = "config", global = true)]
    config_path: Option<PathBuf>,

    /// 상세 로그 출력 (debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 은행 환율 보기
    Show {
        /// Provider (예: hana, korea.hana). 기본: 설정의 default_provider
        #[arg(short, long)]
        bank: Option<String>,

        /// 통화 코드 필터 (예: USD, EUR)
        #[arg(short, long)]
        currency: Option<String>,

        /// 출력 형식 (table, json, csv)
        #[arg(short, long)]
        format: Option<String>,

        /// 캐시를 사용하지 않고 새로 조회
        #[arg(long)]
        no_cache: bool,
    },

    /// 현재 환율로 금액 환산
    Convert {
        /// 금액
        #[arg(allow_negative_numbers = true)]
        amount: Decimal,

        /// 원본 통화 코드 (예: USD)
        from: String,

        /// 대상 통화 코드
        #[arg(short, long, default_value = "KRW")]
        to: String,

        /// Provider. 기본: 설정의 default_provider
        #[arg(short, long)]
        bank: Option<String>,

        /// 거래 유형 (buy: 현찰 살 때, sell: 현찰 팔 때)
        #[arg(long = "type", value_enum, default_value = "buy")]
        side: Side,
    },

    /// 사용 가능한 Provider 목록
    ListProviders,

    /// 캐시된 환율 삭제
    ClearCache,

    /// 설정 관리
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Buy,
    Sell,
}

impl From<Side> for TransactionType {
    fn from(side: Side) -> Self {
        match side {
            Side::Buy => TransactionType::CashBuy,
            Side::Sell => TransactionType::CashSell,
        }
    }
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// 전체 설정 보기
    Show,
    /// 설정 값 조회 (예: cache.ttl_minutes)
    Get { key: String },
    /// 설정 값 변경 (JSON으로 해석, 실패 시 문자열)
    Set { key: String, value: String },
    /// 기본값으로 초기화
    Reset,
}

impl From<ConfigCommand> for ConfigAction {
    fn from(command: ConfigCommand) -> Self {
        match command {
            ConfigCommand::Show => ConfigAction::Show,
            ConfigCommand::Get { key } => ConfigAction::Get { key },
            ConfigCommand::Set { key, value } => ConfigAction::Set { key, value },
            ConfigCommand::Reset => ConfigAction::Reset,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = init_logging(LogConfig::for_cli(cli.verbose)) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<String, CliError> {
    let config_path = cli.config_path.unwrap_or_else(ConfigStore::default_path);
    let mut store = ConfigStore::load(&config_path);
    let settings = store.settings();

    debug!(config = %config_path.display(), "Configuration resolved");

    match cli.command {
        Commands::Show {
            bank,
            currency,
            format,
            no_cache,
        } => {
            let format = OutputFormat::parse(
                format
                    .as_deref()
                    .unwrap_or(&settings.output.default_format),
            )?;
            let config = ShowConfig {
                bank: bank.unwrap_or_else(|| settings.default_provider.clone()),
                currency: currency.or_else(|| settings.output.default_currency.clone()),
                format,
                use_cache: !no_cache,
            };
            let context = RuntimeContext::from_config(settings)?;
            show_rates(&context, &config).await
        }

        Commands::Convert {
            amount,
            from,
            to,
            bank,
            side,
        } => {
            let config = ConvertConfig {
                amount,
                from,
                to,
                bank: bank.unwrap_or_else(|| settings.default_provider.clone()),
                transaction: side.into(),
            };
            let context = RuntimeContext::from_config(settings)?;
            convert_amount(&context, &config).await
        }

        Commands::ListProviders => Ok(list_providers(&ProviderRegistry::builtin())),

        Commands::ClearCache => {
            let cache = CacheStore::new(default_cache_dir(), settings.cache.ttl_minutes);
            clear_cache(&cache)
        }

        Commands::Config { action } => run_config(&mut store, &action.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use curcur_core::AppConfig;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_convert_arguments() {
        let cli = Cli::parse_from(["getcurcur", "convert", "100", "usd", "--type", "sell", "-b", "woori"]);

        match cli.command {
            Commands::Convert {
                amount,
                from,
                to,
                bank,
                side,
            } => {
                assert_eq!(amount, Decimal::from(100));
                assert_eq!(from, "usd");
                assert_eq!(to, "KRW");
                assert_eq!(bank.as_deref(), Some("woori"));
                assert_eq!(TransactionType::from(side), TransactionType::CashSell);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_default_config_is_used_without_flags() {
        let cli = Cli::parse_from(["getcurcur", "-v", "show", "--no-cache"]);

        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Show {
                bank: None,
                no_cache: true,
                ..
            }
        ));
        assert_eq!(AppConfig::default().default_provider, "korea.hana");
    }
}
