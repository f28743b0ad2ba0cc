use prost::Message;
use rowwire::{TypedValue, WireValue};

use crate::config::{DecodeArgs, OutputFormat, RowwireConfig, read_input};
use crate::error::CliError;

pub fn run(args: &DecodeArgs, cfg: &RowwireConfig) -> Result<(), CliError> {
    let zone = cfg.zone()?;
    let input = read_input(&args.input)?;

    let value = if args.wire {
        let bytes = super::from_hex(&input)?;
        let msg = WireValue::decode(bytes.as_slice()).map_err(rowwire::RowwireError::from)?;
        TypedValue::from_wire(&msg)?
    } else {
        TypedValue::from_json(serde_json::from_str(&input)?)?
    };
    tracing::debug!(rep = %value.rep(), wire = args.wire, "value decoded");

    let local = value.to_local()?;
    let client = value.to_client_value(Some(&zone))?;

    match cfg.output {
        OutputFormat::Text => {
            println!("type:   {}", value.rep());
            if let Some(component) = value.component() {
                println!("component: {component}");
            }
            println!("serial: {}", value.to_json()?);
            println!("local:  {local:?}");
            println!("client: {client:?}");
        }
        OutputFormat::Json => {
            let out = serde_json::json!({
                "type": value.rep().name(),
                "component": value.component().map(|c| c.name()),
                "serial": value.to_json()?,
                "local": format!("{local:?}"),
                "client": format!("{client:?}"),
            });
            println!("{out}");
        }
    }
    Ok(())
}
