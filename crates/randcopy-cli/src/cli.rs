//! Argument parsing and command dispatch for the `randcopy` binary.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use randcopy_config::{CopySettings, DEFAULT_EXTENSION, DEFAULT_FOLDER_FILE_LIMIT};
use randcopy_fsops::RandomCopyService;
use randcopy_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use tracing::debug;

use crate::commands::copy::handle_copy;
use crate::error::{CliError, CliResult};
use crate::output::print_error;

/// Parses CLI arguments, installs logging, and runs the copy. Returns the
/// process exit code.
#[must_use]
pub fn run() -> i32 {
    run_from(std::env::args_os())
}

fn run_from<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version requests are not errors.
            let code = i32::from(err.use_stderr());
            let _ = err.print();
            return code;
        }
    };

    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.into(),
    };
    if let Err(err) = init_logging(&logging) {
        let err = CliError::failure(err);
        print_error(&err);
        return err.exit_code();
    }

    match dispatch(&cli) {
        Ok(()) => 0,
        Err(err) => {
            print_error(&err);
            err.exit_code()
        }
    }
}

fn dispatch(cli: &Cli) -> CliResult<()> {
    let settings = cli.settings();
    debug!(?settings, "parsed run settings");
    let service = RandomCopyService::default();
    handle_copy(&service, &settings, cli.output, io::stdout().lock())
}

#[derive(Parser, Debug)]
#[command(
    name = "randcopy",
    version,
    about = "Copy a random selection of music files onto a size-limited device"
)]
pub(crate) struct Cli {
    /// Music library to pick files from.
    source_dir: PathBuf,
    /// Directory to copy the selection into.
    dest_dir: PathBuf,
    /// Total size to copy in megabytes; defaults to the destination's free space.
    #[arg(short = 's', long = "size", value_name = "MB")]
    size: Option<u64>,
    /// Stop after copying this many files.
    #[arg(short = 'n', long = "number-of-files", value_name = "N")]
    number_of_files: Option<u64>,
    /// Group copied files into numbered subfolders.
    #[arg(short = 'f', long = "use-folders")]
    use_folders: bool,
    /// Files per numbered subfolder.
    #[arg(
        short = 'l',
        long = "folder-file-limit",
        value_name = "N",
        default_value_t = DEFAULT_FOLDER_FILE_LIMIT
    )]
    folder_file_limit: u64,
    /// Skip files and folders whose name contains any of these substrings
    /// (case-insensitive).
    #[arg(short = 'e', long = "exclude", value_name = "PATTERN", num_args = 0..)]
    exclude: Vec<String>,
    /// Report what would be copied without writing anything.
    #[arg(short = 'd', long = "dry-run")]
    dry_run: bool,
    /// File extension to pick, with or without the leading dot.
    #[arg(
        short = 'x',
        long = "extension",
        env = "RANDCOPY_EXTENSION",
        default_value = DEFAULT_EXTENSION
    )]
    extension: String,
    /// Seed for a reproducible selection order.
    #[arg(long, env = "RANDCOPY_SEED")]
    seed: Option<u64>,
    #[arg(
        long = "output",
        env = "RANDCOPY_OUTPUT",
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Print progress lines (table) or one JSON report (json)"
    )]
    output: OutputFormat,
    #[arg(
        long = "log-format",
        env = "RANDCOPY_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormatArg::Pretty,
        help = "Format of diagnostic logs written to stderr"
    )]
    log_format: LogFormatArg,
    #[arg(
        long = "log-level",
        env = "RANDCOPY_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL,
        help = "Log filter directive; RUST_LOG takes precedence"
    )]
    log_level: String,
}

impl Cli {
    fn settings(&self) -> CopySettings {
        CopySettings {
            size_mb: self.size,
            max_files: self.number_of_files,
            use_folders: self.use_folders,
            folder_file_limit: self.folder_file_limit,
            excludes: self.exclude.clone(),
            extension: self.extension.clone(),
            dry_run: self.dry_run,
            seed: self.seed,
            ..CopySettings::new(&self.source_dir, &self.dest_dir)
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}
