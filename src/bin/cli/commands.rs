//! Command implementations for the CLI tool.

use std::path::Path;

use csvsplice::{ByteStore, CsvTable, FileStore, Result, TableConfig, TableShape};

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::create_formatter;

/// Settings shared by every command.
pub struct Context<'a> {
    pub path: &'a Path,
    pub create: bool,
    pub config: TableConfig,
    pub format: OutputFormat,
}

/// What a read command prints.
#[derive(Debug, Clone, Copy)]
pub enum ReadTarget {
    Row(u32),
    Column(u32),
    Item { row: u32, column: u32 },
}

/// A mutation requested on the command line.
#[derive(Debug, Clone)]
pub enum Edit {
    WriteRow { row: u32, text: String },
    WriteColumn { column: u32, data: String },
    WriteItem { row: u32, column: u32, text: String },
    DeleteRow { row: u32 },
    DeleteColumn { column: u32 },
    DeleteItem { row: u32, column: u32 },
    Append { values: Vec<String> },
}

impl Edit {
    pub fn name(&self) -> &'static str {
        match self {
            Edit::WriteRow { .. } => "write-row",
            Edit::WriteColumn { .. } => "write-column",
            Edit::WriteItem { .. } => "write-item",
            Edit::DeleteRow { .. } => "delete-row",
            Edit::DeleteColumn { .. } => "delete-column",
            Edit::DeleteItem { .. } => "delete-item",
            Edit::Append { .. } => "append",
        }
    }

    fn apply<S: ByteStore>(&self, table: &mut CsvTable<S>) -> Result<()> {
        match self {
            Edit::WriteRow { row, text } => table.write_row(*row, text),
            Edit::WriteColumn { column, data } => table.write_column(*column, data),
            Edit::WriteItem { row, column, text } => table.write_item(*row, *column, text),
            Edit::DeleteRow { row } => table.delete_row(*row),
            Edit::DeleteColumn { column } => table.delete_column(*column),
            Edit::DeleteItem { row, column } => table.delete_item(*row, *column),
            Edit::Append { values } => {
                let mut writer = table.append()?;
                for value in values {
                    writer.value(value)?;
                }
                writer.finish().map(|_| ())
            }
        }
    }
}

/// Outcome of an edit, for reporting.
pub struct EditReport {
    pub operation: &'static str,
    pub before: TableShape,
    pub after: TableShape,
    pub size: u32,
}

/// Info command implementation
pub fn info(ctx: &Context<'_>) -> ExitCode {
    let formatter = create_formatter(ctx.format);
    let table = match open_table(ctx) {
        Ok(t) => t,
        Err(code) => return code,
    };
    let size = table.store().map_or(0, |s| s.size());
    print!("{}", formatter.format_info(ctx.path, table.shape(), size));
    ExitCode::Success
}

/// Read command implementation
pub fn read(ctx: &Context<'_>, target: ReadTarget) -> ExitCode {
    let formatter = create_formatter(ctx.format);
    let mut table = match open_table(ctx) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let text = match target {
        ReadTarget::Row(row) => table.read_row(row),
        ReadTarget::Column(column) => table.read_column(column),
        ReadTarget::Item { row, column } => table.read_item(row, column),
    };
    match text {
        Ok(text) => {
            print!("{}", formatter.format_read(target, &text));
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}

/// Edit command implementation
pub fn edit(ctx: &Context<'_>, edit: Edit) -> ExitCode {
    let formatter = create_formatter(ctx.format);
    let mut table = match open_table(ctx) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let before = table.shape();
    if let Err(e) = edit.apply(&mut table) {
        eprintln!("Error: {} failed: {}", edit.name(), e);
        return error_to_exit_code(&e);
    }
    let after = table.shape();

    let Some(mut store) = table.into_store() else {
        eprintln!("Error: table lost its file");
        return ExitCode::FatalError;
    };
    let size = store.size();
    if let Err(e) = store.close() {
        eprintln!("Error closing {}: {}", ctx.path.display(), e);
        return error_to_exit_code(&e);
    }

    print!(
        "{}",
        formatter.format_edit(&EditReport {
            operation: edit.name(),
            before,
            after,
            size,
        })
    );
    ExitCode::Success
}

fn open_table(ctx: &Context<'_>) -> std::result::Result<CsvTable<FileStore>, ExitCode> {
    let store = if ctx.create && !ctx.path.exists() {
        FileStore::create(ctx.path)
    } else {
        FileStore::open(ctx.path)
    };
    let store = match store {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error opening {}: {}", ctx.path.display(), e);
            return Err(error_to_exit_code(&e));
        }
    };

    CsvTable::open_with_config(store, ctx.config.clone()).map_err(|e| {
        eprintln!("Error reading table {}: {}", ctx.path.display(), e);
        error_to_exit_code(&e)
    })
}
