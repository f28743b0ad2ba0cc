use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use rowwire::Zone;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "rowwire", about = "Диагностика типизированных значений и строк")]
pub struct Cli {
    /// Путь к TOML конфиг файлу
    #[arg(long, global = true, env = "ROWWIRE_CONFIG")]
    pub config: Option<String>,

    /// Часовой пояс (перекрывает time_zone из конфига): UTC, local, +05:30, Europe/Moscow
    #[arg(long, global = true)]
    pub zone: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Декодировать значение (JSON или hex protobuf) и показать local/client формы
    Decode(DecodeArgs),
    /// Закодировать JSON значение в wire сообщение (hex)
    Encode(EncodeArgs),
    /// Прочитать JSON строки через курсор и вывести строковые формы колонок
    Rows(RowsArgs),
}

#[derive(Args, Clone, Debug)]
pub struct DecodeArgs {
    /// Файл со значением; "-" читает stdin
    #[arg(default_value = "-")]
    pub input: String,

    /// Вход: hex protobuf сообщение вместо JSON
    #[arg(long)]
    pub wire: bool,
}

#[derive(Args, Clone, Debug)]
pub struct EncodeArgs {
    /// Файл с JSON значением; "-" читает stdin
    #[arg(default_value = "-")]
    pub input: String,

    /// Писать decimal в старом формате (NUMBER + bytes + scale)
    #[arg(long)]
    pub legacy: bool,
}

#[derive(Args, Clone, Debug)]
pub struct RowsArgs {
    /// JSON массив строк (объекты или массивы)
    pub rows: String,

    /// JSON список колонок
    #[arg(long)]
    pub columns: String,
}

// ---- TOML Config ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize)]
pub struct RowwireConfig {
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_output")]
    pub output: OutputFormat,
    #[serde(default = "default_legacy_wire")]
    pub legacy_wire: bool,
}

fn default_time_zone() -> String {
    "local".into()
}
fn default_output() -> OutputFormat {
    OutputFormat::Text
}
fn default_legacy_wire() -> bool {
    false
}

impl Default for RowwireConfig {
    fn default() -> Self {
        Self { time_zone: default_time_zone(), output: default_output(), legacy_wire: default_legacy_wire() }
    }
}

impl RowwireConfig {
    /// Без пути используется конфиг по умолчанию.
    pub fn load(path: Option<&str>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config { context: "read", detail: format!("'{path}': {e}") })?;
        toml::from_str(&content).map_err(|e| CliError::Config { context: "parse", detail: format!("'{path}': {e}") })
    }

    pub fn with_zone(mut self, zone: Option<String>) -> Self {
        if let Some(zone) = zone {
            self.time_zone = zone;
        }
        self
    }

    pub fn zone(&self) -> Result<Zone, CliError> {
        self.time_zone
            .parse()
            .map_err(|e| CliError::Config { context: "time_zone", detail: format!("{e}") })
    }
}

/// Содержимое файла, или stdin для "-".
pub fn read_input(path: &str) -> Result<String, CliError> {
    if path == "-" {
        return Ok(std::io::read_to_string(std::io::stdin())?);
    }
    std::fs::read_to_string(path).map_err(|e| CliError::Input(format!("'{path}': {e}")))
}
