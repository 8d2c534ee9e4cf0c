//! CLI tool for csvsplice table editing.

mod commands;
mod exit_codes;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use csvsplice::{ColumnCountPolicy, DEFAULT_SCRATCH_LEN, LineEndings, TableConfig};

use commands::{Context, Edit, ReadTarget};

/// In-place editor for CRLF/comma tables
#[derive(Parser)]
#[command(name = "csvsplice")]
#[command(author, version, about = "In-place editor for CRLF/comma tables", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Table file to edit
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(
        long,
        short = 'f',
        value_enum,
        default_value = "human",
        env = "CSVSPLICE_FORMAT",
        global = true
    )]
    format: OutputFormat,

    /// Create the file if it does not exist
    #[arg(long, global = true)]
    create: bool,

    /// Also accept a bare LF as a row terminator
    #[arg(long, global = true)]
    lenient: bool,

    /// Recompute the column count after delete-column instead of decrementing it
    #[arg(long, global = true)]
    rescan_columns: bool,

    /// Scratch window size in bytes
    #[arg(long, default_value_t = DEFAULT_SCRATCH_LEN, global = true)]
    scratch: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Show row and column counts (alias: i)
    #[command(alias = "i")]
    Info,

    /// Print one row
    ReadRow {
        /// Row number, from 1
        row: u32,
    },

    /// Print one column, one cell per line
    ReadColumn {
        /// Column number from 1, or letter A-Z
        #[arg(value_parser = parse_column)]
        column: u32,
    },

    /// Print one cell
    ReadItem {
        /// Row number, from 1
        row: u32,
        /// Column number from 1, or letter A-Z
        #[arg(value_parser = parse_column)]
        column: u32,
    },

    /// Replace a row, appending empty rows if needed
    WriteRow {
        /// Row number, from 1
        row: u32,
        /// Comma-separated cells
        text: String,
    },

    /// Write a column, one cell per row starting at row 1
    WriteColumn {
        /// Column number from 1, or letter A-Z
        #[arg(value_parser = parse_column)]
        column: u32,
        /// Cells, one per row
        #[arg(required = true)]
        cells: Vec<String>,
    },

    /// Write one cell, padding the table as needed
    WriteItem {
        /// Row number, from 1
        row: u32,
        /// Column number from 1, or letter A-Z
        #[arg(value_parser = parse_column)]
        column: u32,
        /// Cell text
        text: String,
    },

    /// Remove a row
    DeleteRow {
        /// Row number, from 1
        row: u32,
    },

    /// Remove a column, shifting later cells left
    DeleteColumn {
        /// Column number from 1, or letter A-Z
        #[arg(value_parser = parse_column)]
        column: u32,
    },

    /// Clear one cell
    DeleteItem {
        /// Row number, from 1
        row: u32,
        /// Column number from 1, or letter A-Z
        #[arg(value_parser = parse_column)]
        column: u32,
    },

    /// Append one row of values (alias: a)
    #[command(alias = "a")]
    Append {
        /// Cell values
        #[arg(required = true)]
        values: Vec<String>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Accepts `3` or `C` for the third column.
fn parse_column(s: &str) -> Result<u32, String> {
    if let Ok(n) = s.parse::<u32>() {
        return Ok(n);
    }
    match s.as_bytes() {
        [c] if c.is_ascii_alphabetic() => Ok((c.to_ascii_uppercase() - b'A') as u32 + 1),
        _ => Err(format!("'{s}' is neither a column number nor a letter A-Z")),
    }
}

fn main() {
    let cli = Cli::parse();

    let config = TableConfig::new()
        .scratch_len(cli.scratch)
        .line_endings(if cli.lenient {
            LineEndings::LenientLf
        } else {
            LineEndings::CrLf
        })
        .column_count_on_delete(if cli.rescan_columns {
            ColumnCountPolicy::Rescan
        } else {
            ColumnCountPolicy::Decrement
        });

    let ctx = Context {
        path: &cli.file,
        create: cli.create,
        config,
        format: cli.format,
    };

    let exit_code = match cli.command {
        Commands::Info => commands::info(&ctx),

        Commands::ReadRow { row } => commands::read(&ctx, ReadTarget::Row(row)),
        Commands::ReadColumn { column } => commands::read(&ctx, ReadTarget::Column(column)),
        Commands::ReadItem { row, column } => {
            commands::read(&ctx, ReadTarget::Item { row, column })
        }

        Commands::WriteRow { row, text } => commands::edit(&ctx, Edit::WriteRow { row, text }),
        Commands::WriteColumn { column, cells } => commands::edit(
            &ctx,
            Edit::WriteColumn {
                column,
                data: cells.join("\r\n"),
            },
        ),
        Commands::WriteItem { row, column, text } => {
            commands::edit(&ctx, Edit::WriteItem { row, column, text })
        }
        Commands::DeleteRow { row } => commands::edit(&ctx, Edit::DeleteRow { row }),
        Commands::DeleteColumn { column } => commands::edit(&ctx, Edit::DeleteColumn { column }),
        Commands::DeleteItem { row, column } => {
            commands::edit(&ctx, Edit::DeleteItem { row, column })
        }

        Commands::Append { values } => commands::edit(&ctx, Edit::Append { values }),
    };

    std::process::exit(exit_code.code());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_column() {
        assert_eq!(parse_column("3"), Ok(3));
        assert_eq!(parse_column("A"), Ok(1));
        assert_eq!(parse_column("z"), Ok(26));
        assert!(parse_column("AB").is_err());
        assert!(parse_column("-").is_err());
    }

    #[test]
    fn test_cli_parses_file_before_command() {
        let cli = Cli::try_parse_from(["csvsplice", "t.csv", "write-item", "2", "B", "x"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("t.csv"));
        assert!(matches!(
            cli.command,
            Commands::WriteItem { row: 2, column: 2, .. }
        ));
    }
}
