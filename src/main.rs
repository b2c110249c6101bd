use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use huffpack::config::{CodecConfig, TableFormat};
use huffpack::stats::StatsTable;
use huffpack::{CompressedOutput, Compressor};

const PACKED_EXTENSION: &str = "huff";

#[derive(Parser)]
#[command(name = "huffpack", version, about = "Huffman file compressor")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress a file, writing the packed stream and its code table
    Compress {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        table: Option<PathBuf>,
        #[arg(long)]
        format: Option<TableFormat>,
    },
    /// Restore a file from its packed stream and code table
    Decompress {
        packed: PathBuf,
        #[arg(short, long)]
        table: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        format: Option<TableFormat>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => CodecConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => CodecConfig::default(),
    };

    match cli.command {
        Command::Compress {
            input,
            output,
            table,
            format,
        } => {
            let output = output.unwrap_or_else(|| with_suffix(&input, &format!(".{PACKED_EXTENSION}")));
            let table = table.unwrap_or_else(|| with_suffix(&output, &config.statistics_suffix));
            let format = format.unwrap_or(config.table_format);
            compress(&config, &input, &output, &table, format)
        }
        Command::Decompress {
            packed,
            table,
            output,
            format,
        } => {
            let table = table.unwrap_or_else(|| with_suffix(&packed, &config.statistics_suffix));
            let output = output.unwrap_or_else(|| default_output(&packed));
            let format = format.unwrap_or(config.table_format);
            decompress(&packed, &table, &output, format)
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn compress(
    config: &CodecConfig,
    input: &Path,
    output: &Path,
    table: &Path,
    format: TableFormat,
) -> anyhow::Result<()> {
    info!(input = %input.display(), "compressing");
    let data = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let compressed = Compressor::new(config.clone())
        .compress(&data)
        .with_context(|| format!("compressing {}", input.display()))?;

    let written = write_table(&compressed, table, format).and_then(|()| {
        fs::write(output, &compressed.data).with_context(|| format!("writing {}", output.display()))
    });
    if let Err(e) = written {
        // a table without its packed stream is useless
        let _ = fs::remove_file(table);
        return Err(e);
    }

    info!(
        output = %output.display(),
        table = %table.display(),
        original = compressed.original_size,
        compressed = compressed.compressed_size,
        ratio = compressed.ratio,
        "done"
    );
    Ok(())
}

fn write_table(compressed: &CompressedOutput, table: &Path, format: TableFormat) -> anyhow::Result<()> {
    let file = fs::File::create(table).with_context(|| format!("creating {}", table.display()))?;
    StatsTable::from_tables(&compressed.code_table, Some(&compressed.frequencies))
        .write(format, BufWriter::new(file))
        .with_context(|| format!("writing code table to {}", table.display()))
}

fn decompress(packed: &Path, table: &Path, output: &Path, format: TableFormat) -> anyhow::Result<()> {
    info!(packed = %packed.display(), "decompressing");
    let file = fs::File::open(table).with_context(|| format!("opening {}", table.display()))?;
    let code_table = StatsTable::read(format, file)
        .and_then(StatsTable::into_code_table)
        .with_context(|| format!("loading code table from {}", table.display()))?;
    let data = fs::read(packed).with_context(|| format!("reading {}", packed.display()))?;
    let decoded = huffpack::decompress(&code_table, &data)
        .with_context(|| format!("decoding {}", packed.display()))?;

    fs::write(output, &decoded).with_context(|| format!("writing {}", output.display()))?;
    info!(output = %output.display(), bytes = decoded.len(), "done");
    Ok(())
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn default_output(packed: &Path) -> PathBuf {
    if packed.extension().is_some_and(|ext| ext == PACKED_EXTENSION) {
        packed.with_extension("")
    } else {
        with_suffix(packed, ".out")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let packed = with_suffix(Path::new("dir/input.txt"), ".huff");
        assert_eq!(packed, PathBuf::from("dir/input.txt.huff"));
        assert_eq!(
            with_suffix(&packed, "-statistics.txt"),
            PathBuf::from("dir/input.txt.huff-statistics.txt")
        );
        assert_eq!(default_output(&packed), PathBuf::from("dir/input.txt"));
        assert_eq!(default_output(Path::new("blob.bin")), PathBuf::from("blob.bin.out"));
    }

    #[test]
    fn test_cli_roundtrip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let packed = dir.path().join("input.txt.huff");
        let table = dir.path().join("input.txt.huff-statistics.txt");
        let restored = dir.path().join("restored.txt");
        fs::write(&input, b"Node: lines\nwith\0bytes and spaces  ").unwrap();

        let config = CodecConfig::default();
        for format in [TableFormat::Text, TableFormat::Json, TableFormat::Binary] {
            compress(&config, &input, &packed, &table, format).unwrap();
            decompress(&packed, &table, &restored, format).unwrap();
            assert_eq!(fs::read(&restored).unwrap(), fs::read(&input).unwrap());
        }
    }

    #[test]
    fn test_failed_packed_write_removes_table() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let packed = dir.path().join("missing-dir").join("input.txt.huff");
        let table = dir.path().join("input.txt.huff-statistics.txt");
        fs::write(&input, b"some content").unwrap();

        let result = compress(&CodecConfig::default(), &input, &packed, &table, TableFormat::Text);
        assert!(result.is_err());
        assert!(!packed.exists());
        assert!(!table.exists());
    }

    #[test]
    fn test_decompress_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let packed = dir.path().join("input.txt.huff");
        let table = dir.path().join("table.txt");
        let restored = dir.path().join("restored.txt");
        fs::write(&input, b"some content").unwrap();

        compress(&CodecConfig::default(), &input, &packed, &table, TableFormat::Text).unwrap();
        fs::write(&packed, b"").unwrap();
        assert!(decompress(&packed, &table, &restored, TableFormat::Text).is_err());
        assert!(!restored.exists());
    }
}
