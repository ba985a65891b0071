//! Header listing for an input file.
//!
//! Shows each header with the zero-based position accepted by `#N` column
//! selectors and the first non-empty value beneath it, which helps when
//! writing a column mapping for an unfamiliar export.

use anyhow::Result;
use log::info;

use crate::{
    cli::ColumnsArgs,
    data::Table,
    io_utils::{self, InputOptions},
    table,
};

pub fn execute(args: &ColumnsArgs) -> Result<()> {
    let options = InputOptions {
        delimiter: args.delimiter,
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
        sheet: args.sheet.clone(),
    };
    let loaded = io_utils::load_table(&args.input, "input", &options)?;

    if loaded.headers.is_empty() {
        info!("{:?} does not have a header row", args.input);
        return Ok(());
    }

    let headers = vec!["#".to_string(), "name".to_string(), "sample".to_string()];
    table::print_table(&headers, &column_rows(&loaded));
    info!(
        "Listed {} column(s) from {:?}",
        loaded.headers.len(),
        args.input
    );
    Ok(())
}

fn column_rows(loaded: &Table) -> Vec<Vec<String>> {
    loaded
        .headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let sample = loaded
                .column(idx)
                .flatten()
                .next()
                .map(|value| value.as_display())
                .unwrap_or_default();
            vec![format!("#{idx}"), name.clone(), sample]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    #[test]
    fn rows_pair_positions_with_first_sample() {
        let loaded = Table::with_rows(
            vec!["Room".into(), "Guest".into()],
            vec![
                vec![Some(Value::Integer(101)), None],
                vec![Some(Value::Integer(102)), Some(Value::String("Ann".into()))],
            ],
        );
        assert_eq!(
            column_rows(&loaded),
            vec![
                vec!["#0".to_string(), "Room".to_string(), "101".to_string()],
                vec!["#1".to_string(), "Guest".to_string(), "Ann".to_string()],
            ]
        );
    }
}
