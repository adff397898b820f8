//! OxiCite CLI - TLG/PHI citation decoder
//!
//! Decodes the ID bytes of TLG and PHI author files into cited text lines,
//! dumps token streams, reads index files and batch-converts whole corpora.

mod commands;
mod settings;
mod utils;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use commands::{cmd_batch, cmd_decode, cmd_index, cmd_tokens};
use oxicite_core::Corpus;
use settings::Settings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oxicite")]
#[command(author, version, about = "TLG/PHI citation decoder")]
#[command(long_about = "
OxiCite decodes the binary citation bytes of TLG and PHI CD-ROM author
files into lines of Beta-code text with their full citation.

Examples:
  oxicite decode tlg0012.txt
  oxicite decode tlg0012.txt --index tlg0012.idt --json
  oxicite tokens lat0474.txt --limit 50
  oxicite index tlg0012.idt
  oxicite batch /discs/tlg --output out/ --jobs 8
  oxicite completions bash
")]
struct Cli {
    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Decoder configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Corpus (tlg, lat, ins, ddp, chr); inferred from the file name if omitted
    #[arg(long, global = true)]
    corpus: Option<Corpus>,

    /// Render every Greek sigma as lunate
    #[arg(long, global = true)]
    lunate: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode an author file into cited lines
    #[command(alias = "d")]
    Decode {
        /// Author text file
        text: PathBuf,

        /// Index file (defaults to the .idt next to the text file)
        #[arg(short, long)]
        index: Option<PathBuf>,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Dump the token stream of an author file
    #[command(alias = "t")]
    Tokens {
        /// Author text file
        text: PathBuf,

        /// Stop after this many tokens
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show the works and level labels of an index file
    #[command(alias = "i")]
    Index {
        /// Index file
        index: PathBuf,

        /// Read every author in the file
        #[arg(short, long)]
        all: bool,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Decode every author file in a directory
    #[command(alias = "b")]
    Batch {
        /// Directory holding author text files
        input: PathBuf,

        /// Output directory for one JSON file per author
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Worker threads (defaults to the number of CPUs)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Include only files matching pattern (glob syntax: tlg00*)
        #[arg(short = 'I', long)]
        include: Vec<String>,

        /// Exclude files matching pattern (glob syntax)
        #[arg(short = 'X', long)]
        exclude: Vec<String>,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "oxicite=debug" } else { "oxicite=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = Settings::load(cli.config.as_deref(), cli.corpus, cli.lunate).and_then(
        |settings| match cli.command {
            Commands::Decode { text, index, json } => {
                cmd_decode(&settings, &text, index.as_deref(), json)
            }
            Commands::Tokens { text, limit } => cmd_tokens(&text, limit),
            Commands::Index { index, all, json } => cmd_index(&settings, &index, all, json),
            Commands::Batch {
                input,
                output,
                jobs,
                include,
                exclude,
                no_progress,
            } => cmd_batch(
                &settings,
                &input,
                &output,
                jobs,
                &include,
                &exclude,
                !no_progress,
            ),
            Commands::Completions { shell } => {
                clap_complete::generate(
                    shell,
                    &mut Cli::command(),
                    "oxicite",
                    &mut std::io::stdout(),
                );
                Ok(())
            }
        },
    );

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_progress(args: &[&str]) -> bool {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        match cli.command {
            Commands::Batch { no_progress, .. } => !no_progress,
            _ => panic!("expected batch command"),
        }
    }

    #[test]
    fn test_batch_progress_flag() {
        assert!(batch_progress(&["oxicite", "batch", "in"]));
        assert!(!batch_progress(&["oxicite", "batch", "in", "--no-progress"]));
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }
}
