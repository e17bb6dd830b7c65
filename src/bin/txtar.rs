//! txtar CLI
//!
//! Create, extract, list and reformat txtar archives (similar to tar command).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use txtar::{verify, Archive, Decoder, Encoder, File};

#[derive(Parser, Debug)]
#[command(name = "txtar")]
#[command(author = "nzinfo <li.monan@gmail.com>")]
#[command(version)]
#[command(about = "Txtar archive format tool")]
struct Cli {
    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a txtar archive from files/directories
    Create {
        /// Files and directories to archive
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output archive file (default: stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Archive comment
        #[arg(short = 'c', long)]
        comment: Option<String>,
    },

    /// Extract a txtar archive
    #[command(name = "x")]
    Extract {
        /// Archive file to extract (default: stdin)
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,

        /// Directory to extract to (default: current directory)
        #[arg(short = 'C', long, default_value = ".")]
        directory: PathBuf,
    },

    /// List contents of a txtar archive
    #[command(name = "t")]
    List {
        /// Archive file to list (default: stdin)
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,
    },

    /// Rewrite an archive in canonical form
    Fmt {
        /// Archive file to format (default: stdin)
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Fail if formatting is not stable under a second pass
        #[arg(long)]
        check: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Create { inputs, output, comment } => {
            create_archive(inputs, output, comment)?;
        }
        Commands::Extract { input, directory } => {
            extract_archive(input, directory, cli.verbose)?;
        }
        Commands::List { input } => {
            list_archive(input, cli.verbose)?;
        }
        Commands::Fmt { input, output, check } => {
            format_archive(input, output, check)?;
        }
    }

    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
    if let Some(input_path) = input {
        fs::read_to_string(input_path)
            .with_context(|| format!("Failed to read: {}", input_path.display()))
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read archive from stdin")?;
        Ok(buffer)
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    if let Some(output_path) = output {
        fs::write(output_path, content)
            .with_context(|| format!("Failed to write: {}", output_path.display()))
    } else {
        print!("{}", content);
        Ok(())
    }
}

fn create_archive(
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    comment: Option<String>,
) -> Result<()> {
    let mut archive = Archive::with_comment(comment.unwrap_or_default());

    for input in &inputs {
        if input.is_dir() {
            add_directory(&mut archive, input)?;
        } else {
            archive.add_file_from_path(input, None)?;
            info!("Added: {}", input.display());
        }
    }

    archive.check().context("Archive cannot be represented as txtar")?;

    let txtar_content = Encoder::new().encode(&archive);
    write_output(output.as_deref(), &txtar_content)?;

    if let Some(output_path) = output {
        info!("Created: {} ({} files)", output_path.display(), archive.files.len());
    }

    Ok(())
}

fn add_directory(archive: &mut Archive, dir: &Path) -> Result<()> {
    let entries = walkdir::WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .collect::<Vec<_>>();

    for entry in entries {
        let path = entry.path();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read text file: {}", path.display()))?;

        let relative_path = path.strip_prefix(dir)
            .map_err(|_| anyhow::anyhow!("Failed to get relative path"))?;

        let name = relative_path.to_string_lossy().replace('\\', "/");
        info!("Added: {} ({} bytes)", name, content.len());
        archive.add_file(File::new(name, content));
    }

    Ok(())
}

fn extract_archive(input: Option<PathBuf>, directory: PathBuf, verbose: u8) -> Result<()> {
    let txtar_content = read_input(input.as_deref())?;
    let archive = Decoder::new().with_verbose(verbose).decode(&txtar_content);

    info!("Files: {}", archive.files.len());

    for file in &archive.files {
        let output_path = directory.join(file.safe_path()?);

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create: {}", parent.display()))?;
        }

        fs::write(&output_path, &file.data)
            .with_context(|| format!("Failed to write: {}", output_path.display()))?;

        info!("Extracted: {}", file.name);
    }

    Ok(())
}

fn list_archive(input: Option<PathBuf>, verbose: u8) -> Result<()> {
    let txtar_content = read_input(input.as_deref())?;
    let archive = Decoder::new().with_verbose(verbose).decode(&txtar_content);

    for file in &archive.files {
        if verbose > 0 {
            println!("{}  {}", file.name, file.data.len());
        } else {
            println!("{}", file.name);
        }
    }

    Ok(())
}

fn format_archive(input: Option<PathBuf>, output: Option<PathBuf>, check: bool) -> Result<()> {
    let txtar_content = read_input(input.as_deref())?;

    let formatted = if check {
        verify::check_idempotent(&txtar_content).map_err(|d| {
            anyhow::anyhow!("{}\nfirst pass:\n{}\nsecond pass:\n{}", d, d.ours, d.theirs)
        })?
    } else {
        verify::normalize(&txtar_content)
    };

    write_output(output.as_deref(), &formatted)
}
