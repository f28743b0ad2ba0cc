use prost::Message;
use rowwire::TypedValue;

use crate::config::{EncodeArgs, OutputFormat, RowwireConfig, read_input};
use crate::error::CliError;

pub fn run(args: &EncodeArgs, cfg: &RowwireConfig) -> Result<(), CliError> {
    let value = TypedValue::from_json(serde_json::from_str(&read_input(&args.input)?)?)?;
    let legacy = args.legacy || cfg.legacy_wire;
    let msg = if legacy { value.to_wire_legacy()? } else { value.to_wire()? };
    let bytes = msg.encode_to_vec();
    tracing::debug!(rep = %value.rep(), legacy, len = bytes.len(), "value encoded");

    let hex = super::to_hex(&bytes);
    match cfg.output {
        OutputFormat::Text => println!("{hex}"),
        OutputFormat::Json => println!("{}", serde_json::json!({ "hex": hex, "len": bytes.len(), "legacy": legacy })),
    }
    Ok(())
}
