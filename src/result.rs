use std::time::Duration;

use serde::Serialize;

/// The outcome of a single mmseqs invocation.
///
/// `command_line` is the exact argument vector that was executed, binary
/// path included, so callers can log or replay the invocation verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub command_line: Vec<String>,
    pub execution_time: Option<Duration>,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// The executed command as a single shell-quoted string.
    pub fn command_string(&self) -> String {
        shell_join(&self.command_line)
    }
}

pub(crate) fn shell_join(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| shell_quote(t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quote a token for display in a POSIX shell.
pub(crate) fn shell_quote(token: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "_-./=:,@+".contains(c);
    if !token.is_empty() && token.chars().all(safe) {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', "'\\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_follows_exit_code() {
        let mut result = CommandResult {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
            command_line: vec!["mmseqs".to_string(), "createdb".to_string()],
            execution_time: None,
        };
        assert!(result.success());
        result.exit_code = 1;
        assert!(!result.success());
    }

    #[test]
    fn command_string_quotes_awkward_tokens() {
        let result = CommandResult {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
            command_line: vec![
                "mmseqs".to_string(),
                "createdb".to_string(),
                "file with spaces.fasta".to_string(),
                "out".to_string(),
            ],
            execution_time: None,
        };
        assert_eq!(
            result.command_string(),
            "mmseqs createdb 'file with spaces.fasta' out"
        );
    }

    #[test]
    fn embedded_single_quotes_survive() {
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
    }

    #[test]
    fn results_serialize_to_json() {
        let result = CommandResult {
            exit_code: 0,
            stdout: "ok".to_string(),
            stderr: String::new(),
            command_line: vec!["mmseqs".to_string()],
            execution_time: Some(Duration::from_millis(10)),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"exit_code\":0"));
    }
}
