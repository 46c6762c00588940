//! fimerge CLI
//!
//! Builds shard files from documents and looks documents up through the
//! field-index merging iterator.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fimerge::config::{parse_field_list, DEFAULT_FIELDS_TO_SKIP};
use fimerge::key::codec;
use fimerge::storage::SSTableReader;
use fimerge::{document, Config, FieldIndexMergingIterator, Range, ShardBuilder, SortedKeyValueCursor};
use tracing_subscriber::{fmt, EnvFilter};

/// fimerge
#[derive(Parser, Debug)]
#[command(name = "fimerge")]
#[command(about = "Verify shard documents against their field index")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a shard file from JSON-lines documents
    Build {
        /// Input file, one {"docId", "documentFields"} object per line
        #[arg(short, long)]
        input: PathBuf,

        /// Output shard file
        #[arg(short, long)]
        output: PathBuf,

        /// Shard row
        #[arg(short, long)]
        shard: String,

        /// Data type of every document in the input
        #[arg(short, long, default_value = "dataType")]
        data_type: String,
    },

    /// Look up and verify one document
    Lookup {
        /// Shard file
        #[arg(short, long)]
        file: PathBuf,

        /// Shard row
        #[arg(short, long)]
        shard: String,

        /// Data type of the document
        #[arg(short, long, default_value = "dataType")]
        data_type: String,

        /// Document uid
        #[arg(long)]
        doc_id: String,

        /// Comma-separated fields to skip
        #[arg(long, default_value = DEFAULT_FIELDS_TO_SKIP)]
        skip: String,
    },

    /// Print every entry of a shard file
    Dump {
        /// Shard file
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fimerge=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args.command) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> fimerge::Result<ExitCode> {
    match command {
        Commands::Build {
            input,
            output,
            shard,
            data_type,
        } => {
            let mut builder = ShardBuilder::new(shard);
            let reader = BufReader::new(File::open(&input)?);
            let mut documents = 0usize;
            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let doc = document::from_json(&line)?;
                builder.add_document(&data_type, &doc);
                documents += 1;
            }

            let sstable = builder.write_sstable(&output)?;
            tracing::info!(
                "Wrote {} documents ({} entries) to {}",
                documents,
                sstable.entry_count,
                output.display()
            );
            Ok(ExitCode::SUCCESS)
        }

        Commands::Lookup {
            file,
            shard,
            data_type,
            doc_id,
            skip,
        } => {
            let reader = SSTableReader::open(&file)?;
            let config = Config::builder().fields_to_skip(parse_field_list(&skip)).build();
            let mut iterator = FieldIndexMergingIterator::new(reader.cursor()?, config);

            iterator.seek(&codec::document_range(shard.as_bytes(), &data_type, &doc_id))?;

            match iterator.top_value() {
                Some(value) => {
                    println!("{}", String::from_utf8_lossy(value.as_bytes()));
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    tracing::info!("No verified document {} in shard {}", doc_id, shard);
                    Ok(ExitCode::from(1))
                }
            }
        }

        Commands::Dump { file } => {
            let reader = SSTableReader::open(&file)?;
            let mut cursor = reader.cursor()?;
            cursor.seek(&Range::all())?;
            while let Some((key, value)) = cursor.top() {
                println!("{} -> {}", key, value.as_bytes().escape_ascii());
                cursor.advance()?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
