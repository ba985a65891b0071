use anyhow::Result;
use log::info;

use crate::{
    cli::PreviewArgs,
    io_utils::{self, InputOptions},
    table,
};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let options = InputOptions {
        delimiter: args.delimiter,
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
        sheet: args.sheet.clone(),
    };
    let loaded = io_utils::load_table(&args.input, "input", &options)?;
    let rows = loaded.display_rows(args.rows);

    table::print_table(&loaded.headers, &rows);
    info!(
        "Displayed {} of {} row(s) from {:?}",
        rows.len(),
        loaded.len(),
        args.input
    );
    Ok(())
}
