//! Typed command-line construction and execution for MMseqs2.
//!
//! Commands are declared as parameter tables ([`Param`]) held by an
//! [`MmseqsCommand`], which validates values as they are set, assembles the
//! argument vector, and runs the `mmseqs` binary as a child process,
//! returning a structured [`CommandResult`].

pub mod commands;

mod command;
mod error;
mod param;
mod resolve;
mod result;
mod runner;
mod value;

pub use command::{default_assembly, AssembleFn, MmseqsCommand};
pub use error::{Error, Result};
pub use param::{Param, ParamKind, Validator};
pub use resolve::{resolve_mmseqs_binary, MMSEQS_BINARY_ENV};
pub use result::CommandResult;
pub use runner::{ExecOptions, ProcessRunner, RunOutcome, SystemRunner};
pub use value::{Value, ValueKind};
