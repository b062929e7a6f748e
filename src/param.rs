use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::value::{Value, ValueKind};

/// How a parameter appears in the assembled argument vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Boolean-valued, rendered as a bare token or omitted entirely.
    Flag,
    /// Flag token followed by its value.
    Option,
    /// Positional path that must exist at validation time.
    InputFile,
    /// Positional path produced by mmseqs.
    OutputFile,
}

/// A custom validation hook: receives the coerced value, returns the value
/// to store or a rejection message.
pub type Validator = fn(Value) -> std::result::Result<Value, String>;

/// Static declaration of one mmseqs command-line parameter.
///
/// A `Param` describes everything needed to validate a candidate value and
/// render it into argument tokens: the flag text (empty for positionals),
/// the expected scalar type, the default, an optional closed set of choices,
/// and whether the parameter is required or accepts a list of values.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub flag: String,
    pub description: String,
    pub kind: ParamKind,
    pub value_kind: ValueKind,
    pub default: Option<Value>,
    pub choices: Option<Vec<Value>>,
    pub required: bool,
    pub multiple: bool,
    pub validator: Option<Validator>,
}

/// Derive a flag token from a parameter name: `-v` for single characters,
/// `--long-name` otherwise.
fn auto_flag(name: &str) -> String {
    if name.chars().count() == 1 {
        format!("-{name}")
    } else {
        format!("--{}", name.replace('_', "-"))
    }
}

impl Param {
    /// A required positional input file.
    pub fn input_file(name: &str) -> Self {
        Self {
            name: name.to_string(),
            flag: String::new(),
            description: String::new(),
            kind: ParamKind::InputFile,
            value_kind: ValueKind::Path,
            default: None,
            choices: None,
            required: true,
            multiple: false,
            validator: None,
        }
    }

    /// A required positional output path.
    pub fn output_file(name: &str) -> Self {
        Self {
            kind: ParamKind::OutputFile,
            ..Self::input_file(name)
        }
    }

    /// A `--flag value` option. The flag text is derived from the name and
    /// can be overridden with [`Param::with_flag`].
    pub fn option(name: &str, value_kind: ValueKind) -> Self {
        Self {
            name: name.to_string(),
            flag: auto_flag(name),
            description: String::new(),
            kind: ParamKind::Option,
            value_kind,
            default: None,
            choices: None,
            required: false,
            multiple: false,
            validator: None,
        }
    }

    /// A boolean flag, off by default.
    pub fn flag(name: &str) -> Self {
        Self {
            kind: ParamKind::Flag,
            value_kind: ValueKind::Bool,
            default: Some(Value::Bool(false)),
            ..Self::option(name, ValueKind::Bool)
        }
    }

    pub fn with_flag(mut self, flag: &str) -> Self {
        self.flag = flag.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    fn invalid(&self, reason: impl Into<String>) -> Error {
        Error::Validation {
            name: self.name.clone(),
            reason: reason.into(),
        }
    }

    /// Validate a candidate value against this declaration.
    ///
    /// Returns the coerced value, or the default when the value is absent
    /// and the parameter is optional. Input-file parameters additionally
    /// require every referenced path to exist.
    pub fn validate(&self, value: Option<&Value>) -> Result<Option<Value>> {
        let value = match value {
            Some(v) => v.clone(),
            None => {
                if self.required {
                    return Err(self.invalid("required parameter is not set"));
                }
                return Ok(self.default.clone());
            }
        };

        // Lists on multiple parameters pass through uncoerced; element
        // types are the descriptor author's concern.
        let mut value = if self.multiple && matches!(value, Value::List(_)) {
            value
        } else {
            value
                .coerce(self.value_kind)
                .map_err(|reason| self.invalid(reason))?
        };

        if let Some(choices) = &self.choices {
            if !choices.contains(&value) {
                let rendered: Vec<String> = choices.iter().map(Value::to_token).collect();
                return Err(self.invalid(format!(
                    "must be one of [{}], got {}",
                    rendered.join(", "),
                    value.to_token()
                )));
            }
        }

        if self.kind == ParamKind::InputFile {
            match &value {
                Value::List(items) => {
                    for item in items {
                        self.check_path_exists(item)?;
                    }
                }
                v => self.check_path_exists(v)?,
            }
        }

        if let Some(validator) = self.validator {
            value = validator(value).map_err(|reason| self.invalid(reason))?;
        }

        Ok(Some(value))
    }

    fn check_path_exists(&self, value: &Value) -> Result<()> {
        let path: PathBuf = value
            .as_path()
            .ok_or_else(|| self.invalid("expected a filesystem path"))?;
        if path.exists() {
            Ok(())
        } else {
            Err(Error::PathNotFound { path })
        }
    }

    /// Render this parameter and its current value into argument tokens.
    pub fn render(&self, value: &Value) -> Vec<String> {
        if self.kind == ParamKind::Flag {
            return match value {
                Value::Bool(true) => vec![self.flag.clone()],
                _ => vec![],
            };
        }

        if let (true, Value::List(items)) = (self.multiple, value) {
            let mut tokens = vec![];
            for item in items {
                if !self.flag.is_empty() {
                    tokens.push(self.flag.clone());
                }
                tokens.push(item.to_token());
            }
            return tokens;
        }

        if self.flag.is_empty() {
            vec![value.to_token()]
        } else {
            vec![self.flag.clone(), value.to_token()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn required_without_value_fails() {
        let param = Param::option("threads", ValueKind::Int).required(true);
        match param.validate(None) {
            Err(Error::Validation { name, .. }) => assert_eq!(name, "threads"),
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn optional_without_value_yields_default() {
        let param = Param::option("dbtype", ValueKind::Int).with_default(0);
        assert_eq!(param.validate(None).unwrap(), Some(Value::Int(0)));
    }

    #[test]
    fn choices_reject_outsiders() {
        let param = Param::option("dbtype", ValueKind::Int).with_choices([0, 1, 2]);
        assert_eq!(
            param.validate(Some(&Value::Int(2))).unwrap(),
            Some(Value::Int(2))
        );
        assert!(param.validate(Some(&Value::Int(5))).is_err());
    }

    #[test]
    fn choices_apply_after_coercion() {
        let param = Param::option("dbtype", ValueKind::Int).with_choices([0, 1, 2]);
        assert_eq!(
            param.validate(Some(&Value::from("1"))).unwrap(),
            Some(Value::Int(1))
        );
    }

    #[test]
    fn input_file_must_exist() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ">seq1\nACGT").unwrap();

        let param = Param::input_file("query");
        let value = Value::from(file.path());
        assert_eq!(param.validate(Some(&value)).unwrap(), Some(value.clone()));

        let missing = Value::from("/no/such/file.fasta");
        match param.validate(Some(&missing)) {
            Err(Error::PathNotFound { path }) => {
                assert_eq!(path, PathBuf::from("/no/such/file.fasta"))
            }
            other => panic!("expected a missing-path error, got {other:?}"),
        }
    }

    #[test]
    fn multiple_input_files_all_checked() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let param = Param::input_file("query").multiple();

        let ok = Value::List(vec![Value::from(file.path())]);
        assert!(param.validate(Some(&ok)).is_ok());

        let mixed = Value::List(vec![Value::from(file.path()), Value::from("/nope.fasta")]);
        assert!(matches!(
            param.validate(Some(&mixed)),
            Err(Error::PathNotFound { .. })
        ));
    }

    #[test]
    fn custom_validator_rejections_are_wrapped() {
        fn positive(value: Value) -> std::result::Result<Value, String> {
            match value {
                Value::Int(i) if i > 0 => Ok(Value::Int(i)),
                _ => Err("must be positive".to_string()),
            }
        }

        let param = Param::option("threads", ValueKind::Int).with_validator(positive);
        assert!(param.validate(Some(&Value::Int(4))).is_ok());
        match param.validate(Some(&Value::Int(-1))) {
            Err(Error::Validation { reason, .. }) => assert_eq!(reason, "must be positive"),
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn flag_renders_bare_token_or_nothing() {
        let param = Param::flag("compressed");
        assert_eq!(param.render(&Value::Bool(true)), vec!["--compressed"]);
        assert!(param.render(&Value::Bool(false)).is_empty());
    }

    #[test]
    fn multiple_option_repeats_flag() {
        let param = Param::option("x", ValueKind::Str).with_flag("--x").multiple();
        let value = Value::from(vec!["a", "b"]);
        assert_eq!(param.render(&value), vec!["--x", "a", "--x", "b"]);
    }

    #[test]
    fn positional_renders_value_only() {
        let param = Param::output_file("output_db");
        assert_eq!(param.render(&Value::from("out")), vec!["out"]);
    }

    #[test]
    fn auto_flags() {
        assert_eq!(Param::option("v", ValueKind::Int).flag, "-v");
        assert_eq!(
            Param::option("id_offset", ValueKind::Int).flag,
            "--id-offset"
        );
    }
}
