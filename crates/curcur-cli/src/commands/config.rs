//! 설정 관리 (`config show|get|set|reset`).

use curcur_core::{ConfigError, ConfigStore};
use serde_json::Value;

use crate::error::CliError;

/// 설정 하위 명령.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    Show,
    Get { key: String },
    Set { key: String, value: String },
    Reset,
}

/// 설정 명령을 실행하고 출력할 문자열을 반환합니다.
pub fn run_config(store: &mut ConfigStore, action: &ConfigAction) -> Result<String, CliError> {
    match action {
        ConfigAction::Show => {
            let json = serde_json::to_string_pretty(store.values())
                .map_err(|e| CliError::Output(e.to_string()))?;
            Ok(format!("# {}\n{}", store.path().display(), json))
        }
        ConfigAction::Get { key } => {
            let value = store
                .get(key)
                .ok_or_else(|| ConfigError::UnknownKey(key.clone()))?;
            Ok(display_value(value))
        }
        ConfigAction::Set { key, value } => {
            let parsed = parse_value(value);
            let shown = display_value(&parsed);
            store.set(key, parsed)?;
            Ok(format!("Set {} = {}", key, shown))
        }
        ConfigAction::Reset => {
            store.reset()?;
            Ok("Configuration reset to defaults.".to_string())
        }
    }
}

/// JSON으로 해석하고, 실패하면 문자열로 취급합니다.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
