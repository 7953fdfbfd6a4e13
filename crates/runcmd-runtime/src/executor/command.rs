//! Shell invocation builder.

use std::path::Path;

use runcmd_core::ParameterDefinition;

/// What the shell is asked to run, plus the environment it runs with.
///
/// Built from the artifact path and the parameter list:
/// - unnamed parameters are appended to the command line in list order
/// - named parameters become environment variables of the child, the last
///   value winning on duplicate names
/// - parameters with an empty value are skipped
///
/// The shell `exec`s the artifact, so the artifact itself is the child and
/// its exit status or terminating signal is reported directly. A relative
/// path is resolved against the current directory, since the child runs in
/// its own working directory.
///
/// Unnamed values are appended as they are and are subject to shell
/// expansion. The environment is attached to the child only; the calling
/// process's environment is never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    command_line: String,
    env: Vec<(String, String)>,
}

impl Invocation {
    /// Build the invocation of `command_path` with `parameters`.
    pub fn new(command_path: &Path, parameters: &[ParameterDefinition]) -> Self {
        let command_path =
            std::path::absolute(command_path).unwrap_or_else(|_| command_path.to_path_buf());
        let mut invocation = Self {
            command_line: format!("exec {}", shell_quote(&command_path.to_string_lossy())),
            env: Vec::new(),
        };

        for parameter in parameters.iter().filter(|p| !p.value.is_empty()) {
            if parameter.is_named() {
                invocation.set_env(&parameter.name, &parameter.value);
            } else {
                invocation.command_line.push(' ');
                invocation.command_line.push_str(&parameter.value);
            }
        }

        invocation
    }

    /// The string passed to `sh -c`.
    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Environment variables set for the child, in first-seen order.
    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    fn set_env(&mut self, name: &str, value: &str) {
        match self.env.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => value.clone_into(existing),
            None => self.env.push((name.to_string(), value.to_string())),
        }
    }
}

/// Quote `word` for POSIX sh so it is passed as a single argument.
fn shell_quote(word: &str) -> String {
    let mut quoted = String::with_capacity(word.len() + 2);
    quoted.push('\'');
    for c in word.chars() {
        if c == '\'' {
            quoted.push_str(r"'\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unnamed_parameters_are_appended_in_order() {
        let invocation = Invocation::new(
            Path::new("/work/script.sh"),
            &[
                ParameterDefinition::positional("first"),
                ParameterDefinition::named("NAME", "value"),
                ParameterDefinition::positional("second third"),
            ],
        );
        assert_eq!(
            invocation.command_line(),
            "exec '/work/script.sh' first second third"
        );
        assert_eq!(
            invocation.env(),
            [("NAME".to_string(), "value".to_string())]
        );
    }

    #[test]
    fn test_empty_values_are_skipped() {
        let invocation = Invocation::new(
            Path::new("/work/script.sh"),
            &[
                ParameterDefinition::positional(""),
                ParameterDefinition::named("EMPTY", ""),
            ],
        );
        assert_eq!(invocation.command_line(), "exec '/work/script.sh'");
        assert!(invocation.env().is_empty());
    }

    #[test]
    fn test_last_named_value_wins() {
        let invocation = Invocation::new(
            Path::new("/s"),
            &[
                ParameterDefinition::named("A", "1"),
                ParameterDefinition::named("B", "2"),
                ParameterDefinition::named("A", "3"),
            ],
        );
        assert_eq!(
            invocation.env(),
            [
                ("A".to_string(), "3".to_string()),
                ("B".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_relative_path_is_made_absolute() {
        let invocation = Invocation::new(Path::new("work/script.sh"), &[]);
        let expected = std::env::current_dir().unwrap().join("work/script.sh");
        assert_eq!(
            invocation.command_line(),
            format!("exec {}", shell_quote(&expected.to_string_lossy()))
        );
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("/a b/run.sh"), "'/a b/run.sh'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }
}
