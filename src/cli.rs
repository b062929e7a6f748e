use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use rmmseqs::commands::createdb;
use rmmseqs::{ExecOptions, MmseqsCommand};

#[derive(Debug, Subcommand)]
enum SubCommands {
    #[command(about = "Create an MMseqs2 sequence database from FASTA file(s)")]
    Createdb {
        /// Input FASTA file(s) followed by the output database prefix
        #[arg(value_name = "INPUT.fasta... OUT_DB", num_args = 2..)]
        files: Vec<String>,
        /// Database type (0: auto-detect, 1: amino acid, 2: nucleotide)
        #[arg(long, default_value_t = 0)]
        dbtype: i64,
        /// Do not shuffle the input database entries
        #[arg(long)]
        no_shuffle: bool,
        /// Createdb mode (0: copy data, 1: soft-link data)
        #[arg(long, default_value_t = 0)]
        createdb_mode: i64,
        /// Numeric id offset in the index file
        #[arg(long, default_value_t = 0)]
        id_offset: i64,
        /// Write compressed output files
        #[arg(long)]
        compressed: bool,
        /// Verbosity (0: quiet, 1: +errors, 2: +warnings, 3: +info)
        #[arg(short, default_value_t = 3)]
        verbosity: i64,
    },
}

#[derive(Debug, Parser)]
#[command(name = "rmmseqs")]
#[command(about = "Build, validate, and run MMseqs2 command lines")]
pub struct Cli {
    #[command(subcommand)]
    command: SubCommands,

    /// Print the assembled command line without running it
    #[arg(long, global = true)]
    dry_run: bool,

    /// Print the execution result as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Kill the mmseqs process after this many seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    timeout: Option<f64>,
}

impl Cli {
    fn build_command(&self) -> anyhow::Result<MmseqsCommand> {
        match &self.command {
            SubCommands::Createdb {
                files,
                dbtype,
                no_shuffle,
                createdb_mode,
                id_offset,
                compressed,
                verbosity,
            } => {
                let (output_db, input_files) = files
                    .split_last()
                    .context("expected input FASTA file(s) and an output database prefix")?;

                let mut cmd = createdb();
                cmd.set("input_files", input_files.to_vec())
                    .context("invalid input files")?;
                cmd.set("output_db", output_db.as_str())?;
                cmd.set("dbtype", *dbtype)?;
                cmd.set("shuffle", !no_shuffle)?;
                cmd.set("createdb_mode", *createdb_mode)?;
                cmd.set("id_offset", *id_offset)?;
                cmd.set("compressed", *compressed)?;
                cmd.set("v", *verbosity)?;
                Ok(cmd)
            }
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        let cmd = self.build_command()?;

        if self.dry_run {
            println!("{}", cmd.command_string()?);
            return Ok(());
        }

        let opts = ExecOptions {
            timeout: self.timeout.map(Duration::from_secs_f64),
            // Exit status is reported below so --json always gets a result.
            check: false,
            ..Default::default()
        };

        let result = cmd
            .run(&opts)
            .with_context(|| format!("failed to run mmseqs {}", cmd.command_name()))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{}", result.stdout);
            eprint!("{}", result.stderr);
        }

        if !result.success() {
            anyhow::bail!(
                "mmseqs {} exited with code {}",
                cmd.command_name(),
                result.exit_code
            );
        }
        Ok(())
    }
}
