use rowwire::cursor::JsonRows;
use rowwire::{ColumnMetaData, ResultSet};

use crate::config::{OutputFormat, RowsArgs, RowwireConfig, read_input};
use crate::error::CliError;

pub fn run(args: &RowsArgs, cfg: &RowwireConfig) -> Result<(), CliError> {
    let zone = cfg.zone()?;
    let columns: Vec<ColumnMetaData> = serde_json::from_str(&read_input(&args.columns)?)?;
    let source = JsonRows::parse(&read_input(&args.rows)?, columns.clone())?;
    let mut rs = ResultSet::new(source, columns, Some(zone), None);

    if cfg.output == OutputFormat::Text {
        let header: Vec<&str> = rs.columns().iter().map(|c| c.name.as_str()).collect();
        println!("{}", header.join("\t"));
    }

    let mut count = 0usize;
    while rs.next()? {
        let cells = (0..rs.columns().len()).map(|i| rs.get_string(i)).collect::<Result<Vec<_>, _>>()?;
        match cfg.output {
            OutputFormat::Text => {
                let line: Vec<&str> = cells.iter().map(|c| c.as_deref().unwrap_or("NULL")).collect();
                println!("{}", line.join("\t"));
            }
            OutputFormat::Json => {
                let row: serde_json::Map<String, serde_json::Value> = rs
                    .columns()
                    .iter()
                    .zip(cells)
                    .map(|(c, cell)| (c.name.clone(), cell.map_or(serde_json::Value::Null, serde_json::Value::String)))
                    .collect();
                println!("{}", serde_json::Value::Object(row));
            }
        }
        count += 1;
    }
    rs.close();
    tracing::info!(rows = count, "rows read");
    Ok(())
}
