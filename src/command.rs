use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::param::{Param, ParamKind};
use crate::resolve::resolve_mmseqs_binary;
use crate::result::{shell_join, CommandResult};
use crate::runner::{ExecOptions, ProcessRunner, RunOutcome, SystemRunner};
use crate::value::Value;

/// Per-command override hook for argument-vector assembly, for the handful
/// of mmseqs commands that interleave positionals and options in an order
/// [`default_assembly`] cannot express.
pub type AssembleFn = fn(&MmseqsCommand) -> Result<Vec<String>>;

/// A declared mmseqs command: an ordered parameter table plus the current
/// values for it.
///
/// Concrete commands are table-building functions (see
/// [`crate::commands::createdb`]) rather than subclasses; the only
/// behavioral extension point is the assembly hook.
pub struct MmseqsCommand {
    name: String,
    params: Vec<Param>,
    values: HashMap<String, Value>,
    assemble: AssembleFn,
}

impl MmseqsCommand {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            params: vec![],
            values: HashMap::new(),
            assemble: default_assembly,
        }
    }

    pub fn with_assembly(mut self, assemble: AssembleFn) -> Self {
        self.assemble = assemble;
        self
    }

    /// The mmseqs subcommand name, e.g. `createdb`.
    pub fn command_name(&self) -> &str {
        &self.name
    }

    /// Register a parameter. Registration order fixes the order of
    /// positional arguments in the assembled vector. Re-registering a name
    /// replaces the declaration in place.
    pub fn add_param(&mut self, param: Param) {
        if !self.values.contains_key(&param.name) {
            if let Some(default) = &param.default {
                self.values.insert(param.name.clone(), default.clone());
            }
        }
        match self.params.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => *existing = param,
            None => self.params.push(param),
        }
    }

    fn param(&self, name: &str) -> Result<&Param> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::UnknownParameter(name.to_string()))
    }

    /// Set a parameter value. The value is validated through the descriptor
    /// before it is stored, so bad values fail here rather than at run time.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let param = self.param(name)?.clone();
        if let Some(validated) = param.validate(Some(&value.into()))? {
            self.values.insert(param.name, validated);
        }
        Ok(())
    }

    /// Reset a parameter to its default. Clearing a required parameter is a
    /// validation error.
    pub fn clear(&mut self, name: &str) -> Result<()> {
        let param = self.param(name)?.clone();
        match param.validate(None)? {
            Some(default) => {
                self.values.insert(param.name, default);
            }
            None => {
                self.values.remove(&param.name);
            }
        }
        Ok(())
    }

    /// The current value of a parameter, if one is set.
    pub fn get(&self, name: &str) -> Result<Option<&Value>> {
        self.param(name)?;
        Ok(self.values.get(name))
    }

    /// All registered parameter names, in registration order.
    pub fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }

    pub(crate) fn params(&self) -> &[Param] {
        &self.params
    }

    pub(crate) fn value_of(&self, param: &Param) -> Option<&Value> {
        self.values.get(&param.name)
    }

    /// True when the parameter's current value equals its declared default.
    pub(crate) fn is_default(&self, param: &Param) -> bool {
        self.value_of(param) == param.default.as_ref()
    }

    /// Re-validate every current value, surfacing the first failure.
    ///
    /// Values are validated when set, so this is a redundant check, but it
    /// also catches required parameters that were never set and input files
    /// deleted since they were.
    pub fn validate_all(&self) -> Result<()> {
        for param in &self.params {
            param.validate(self.values.get(&param.name))?;
        }
        Ok(())
    }

    /// Assemble the full argument vector: command name, positionals in
    /// registration order, then options and flags.
    pub fn build_argument_vector(&self) -> Result<Vec<String>> {
        self.validate_all()?;
        (self.assemble)(self)
    }

    /// The assembled command line as a single shell-quoted string, for
    /// diagnostics and logging. The binary path is not included.
    pub fn command_string(&self) -> Result<String> {
        Ok(shell_join(&self.build_argument_vector()?))
    }

    /// Resolve the mmseqs binary and execute this command.
    pub fn run(&self, opts: &ExecOptions) -> Result<CommandResult> {
        let binary = resolve_mmseqs_binary()?;
        self.run_with(&SystemRunner, &binary, opts)
    }

    /// Execute with an explicit binary path and process runner.
    ///
    /// This is the seam tests use to substitute a stub runner; `run` is the
    /// production path through it.
    pub fn run_with(
        &self,
        runner: &dyn ProcessRunner,
        binary: &Path,
        opts: &ExecOptions,
    ) -> Result<CommandResult> {
        let mut argv = vec![binary.to_string_lossy().into_owned()];
        argv.extend(self.build_argument_vector()?);

        let start = Instant::now();
        match runner.run(&argv, opts)? {
            RunOutcome::Completed {
                exit_code,
                stdout,
                stderr,
            } => {
                let result = CommandResult {
                    exit_code,
                    stdout,
                    stderr,
                    command_line: argv,
                    execution_time: Some(start.elapsed()),
                };
                if opts.check && !result.success() {
                    return Err(Error::Execution { result });
                }
                Ok(result)
            }
            RunOutcome::TimedOut { stdout, stderr } => Err(Error::Timeout {
                command_line: argv,
                timeout: opts.timeout.unwrap_or_default(),
                stdout,
                stderr,
            }),
        }
    }
}

/// Default assembly: command name, then InputFile/OutputFile parameters in
/// registration order, then Option/Flag parameters in registration order.
///
/// Options and flags whose current value equals their declared default are
/// omitted; mmseqs supplies the same defaults itself, and the resulting
/// command lines stay readable.
pub fn default_assembly(cmd: &MmseqsCommand) -> Result<Vec<String>> {
    let mut argv = vec![cmd.command_name().to_string()];

    for param in cmd.params() {
        if matches!(param.kind, ParamKind::InputFile | ParamKind::OutputFile) {
            if let Some(value) = cmd.value_of(param) {
                argv.extend(param.render(value));
            }
        }
    }

    for param in cmd.params() {
        if matches!(param.kind, ParamKind::Option | ParamKind::Flag) {
            if let Some(value) = cmd.value_of(param) {
                if !cmd.is_default(param) {
                    argv.extend(param.render(value));
                }
            }
        }
    }

    Ok(argv)
}
