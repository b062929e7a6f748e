use std::path::{Path, PathBuf};

/// The scalar type a parameter expects its value to be coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Str,
    Path,
}

/// A dynamically typed parameter value.
///
/// Parameter tables are data, not types, so values are carried in a tagged
/// enum and coerced against the declaring [`ValueKind`] at validation time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Path(PathBuf),
    List(Vec<Value>),
}

impl Value {
    pub fn matches(&self, kind: ValueKind) -> bool {
        matches!(
            (self, kind),
            (Value::Bool(_), ValueKind::Bool)
                | (Value::Int(_), ValueKind::Int)
                | (Value::Float(_), ValueKind::Float)
                | (Value::Str(_), ValueKind::Str)
                | (Value::Path(_), ValueKind::Path)
        )
    }

    /// Attempt a single explicit conversion to `kind`.
    ///
    /// Anything more exotic than the conversions here (string to number,
    /// int to float, scalar to string, string to path) is rejected rather
    /// than guessed at.
    pub fn coerce(self, kind: ValueKind) -> std::result::Result<Value, String> {
        if self.matches(kind) {
            return Ok(self);
        }
        match (self, kind) {
            (Value::Str(s), ValueKind::Int) => s
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| format!("expected an integer, got \"{s}\"")),
            (Value::Str(s), ValueKind::Float) => s
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| format!("expected a number, got \"{s}\"")),
            (Value::Int(i), ValueKind::Float) => Ok(Value::Float(i as f64)),
            (Value::Str(s), ValueKind::Bool) => match s.as_str() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(format!("expected a boolean, got \"{s}\"")),
            },
            (Value::Int(i), ValueKind::Bool) => match i {
                0 => Ok(Value::Bool(false)),
                1 => Ok(Value::Bool(true)),
                _ => Err(format!("expected a boolean, got {i}")),
            },
            (Value::Str(s), ValueKind::Path) => Ok(Value::Path(PathBuf::from(s))),
            (Value::Path(p), ValueKind::Str) => {
                Ok(Value::Str(p.to_string_lossy().into_owned()))
            }
            (v @ (Value::Bool(_) | Value::Int(_) | Value::Float(_)), ValueKind::Str) => {
                Ok(Value::Str(v.to_token()))
            }
            (Value::List(_), _) => Err("expected a scalar, got a list".to_string()),
            (v, kind) => Err(format!("cannot convert {v:?} to {kind:?}")),
        }
    }

    /// Render the value as a single command-line token.
    pub fn to_token(&self) -> String {
        match self {
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
            Value::Path(p) => p.to_string_lossy().into_owned(),
            Value::List(items) => items
                .iter()
                .map(Value::to_token)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Interpret the value as a filesystem path, when it is one.
    pub fn as_path(&self) -> Option<PathBuf> {
        match self {
            Value::Path(p) => Some(p.clone()),
            Value::Str(s) => Some(PathBuf::from(s)),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<PathBuf> for Value {
    fn from(v: PathBuf) -> Self {
        Value::Path(v)
    }
}

impl From<&Path> for Value {
    fn from(v: &Path) -> Self {
        Value::Path(v.to_path_buf())
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(v: Vec<V>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}
