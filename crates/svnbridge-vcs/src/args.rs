//! Ordered command-line argument assembly with secret redaction.
//!
//! Every argument remembers how it was added. Quoted arguments are wrapped in
//! double quotes with embedded quotes escaped, sensitive arguments are quoted
//! the same way but render as [`REDACTED`] in the redacted form, and plain
//! arguments are emitted verbatim.

use crate::error::{Result, SvnError};
use std::fmt;
use zeroize::Zeroizing;

/// Placeholder printed in place of sensitive values.
pub const REDACTED: &str = "(hidden)";

#[derive(Clone)]
enum Arg {
    Plain(String),
    Quoted(String),
    Sensitive(Zeroizing<String>),
    /// Caller-supplied argument text, kept verbatim for rendering and
    /// tokenized once for direct execution.
    Extra { text: String, tokens: Vec<String> },
}

impl Arg {
    fn render(&self, redact: bool) -> String {
        match self {
            Self::Plain(value) => value.clone(),
            Self::Quoted(value) => quote(value),
            Self::Sensitive(_) if redact => REDACTED.to_string(),
            Self::Sensitive(value) => quote(value),
            Self::Extra { text, .. } => text.clone(),
        }
    }
}

/// Wrap a value in double quotes, escaping embedded quotes with a backslash.
#[must_use]
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}

/// Ordered collection of client arguments.
#[derive(Clone, Default)]
pub struct ArgumentBuilder {
    args: Vec<Arg>,
}

impl ArgumentBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument emitted verbatim.
    pub fn append(&mut self, value: impl Into<String>) -> &mut Self {
        self.args.push(Arg::Plain(value.into()));
        self
    }

    /// Append an argument wrapped in double quotes.
    pub fn append_quoted(&mut self, value: impl Into<String>) -> &mut Self {
        self.args.push(Arg::Quoted(value.into()));
        self
    }

    /// Append a quoted argument whose value must never reach a log.
    pub fn append_sensitive(&mut self, value: impl Into<String>) -> &mut Self {
        self.args.push(Arg::Sensitive(Zeroizing::new(value.into())));
        self
    }

    /// Append caller-supplied raw arguments.
    ///
    /// The text is rendered verbatim. For direct execution it is split with
    /// shell word rules, so unbalanced quotes are rejected here rather than
    /// handed to the client.
    pub fn append_extra(&mut self, extra: Option<&str>) -> Result<&mut Self> {
        let Some(text) = extra.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(self);
        };
        let tokens = shell_words::split(text).map_err(|e| {
            SvnError::invalid_argument("additional_arguments", format!("{e}: {text}"))
        })?;
        self.args.push(Arg::Extra {
            text: text.to_string(),
            tokens,
        });
        Ok(self)
    }

    /// Number of arguments appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// First argument, normally the client action.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        match self.args.first()? {
            Arg::Plain(value) | Arg::Quoted(value) => Some(value),
            Arg::Sensitive(_) => None,
            Arg::Extra { tokens, .. } => tokens.first().map(String::as_str),
        }
    }

    /// Whether any argument is sensitive.
    #[must_use]
    pub fn has_sensitive(&self) -> bool {
        self.args.iter().any(|a| matches!(a, Arg::Sensitive(_)))
    }

    /// Full command-line text, secrets included.
    #[must_use]
    pub fn render(&self) -> String {
        self.join(false)
    }

    /// Command-line text safe for logs and error messages.
    #[must_use]
    pub fn render_redacted(&self) -> String {
        self.join(true)
    }

    /// Unquoted argument vector for spawning the client without a shell.
    ///
    /// Empty plain arguments vanish, exactly as they do when the rendered
    /// text is tokenized; an empty quoted argument stays an empty argument.
    #[must_use]
    pub fn to_argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            match arg {
                Arg::Plain(value) if value.is_empty() => {}
                Arg::Plain(value) | Arg::Quoted(value) => argv.push(value.clone()),
                Arg::Sensitive(value) => argv.push(value.to_string()),
                Arg::Extra { tokens, .. } => argv.extend(tokens.iter().cloned()),
            }
        }
        argv
    }

    fn join(&self, redact: bool) -> String {
        self.args
            .iter()
            .map(|a| a.render(redact))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Debug for ArgumentBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArgumentBuilder")
            .field(&self.render_redacted())
            .finish()
    }
}

/// Displays the redacted form.
impl fmt::Display for ArgumentBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_redacted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn renders_in_insertion_order() {
        let mut args = ArgumentBuilder::new();
        args.append("checkout")
            .append_quoted("http://svn.example.com/repo/trunk")
            .append_quoted("/tmp/ws")
            .append("--non-interactive");
        assert_eq!(
            args.render(),
            "checkout \"http://svn.example.com/repo/trunk\" \"/tmp/ws\" --non-interactive"
        );
        assert_eq!(args.action(), Some("checkout"));
    }

    #[test]
    fn escapes_embedded_quotes() {
        let mut args = ArgumentBuilder::new();
        args.append("-m").append_quoted("say \"hi\"");
        assert_eq!(args.render(), "-m \"say \\\"hi\\\"\"");
        assert_eq!(args.to_argv(), vec!["-m", "say \"hi\""]);
    }

    #[test]
    fn empty_quoted_value_renders_as_empty_quotes() {
        let mut args = ArgumentBuilder::new();
        args.append("ls").append_quoted("");
        assert_eq!(args.render(), "ls \"\"");
        assert_eq!(args.to_argv(), vec!["ls", ""]);
    }

    #[test]
    fn redacts_sensitive_values() {
        let mut args = ArgumentBuilder::new();
        args.append("--password").append_sensitive("s3cret");
        assert_eq!(args.render(), "--password \"s3cret\"");
        assert_eq!(args.render_redacted(), "--password (hidden)");
        assert_eq!(args.to_string(), "--password (hidden)");
        assert!(!format!("{args:?}").contains("s3cret"));
        assert!(args.has_sensitive());
    }

    #[test]
    fn extra_arguments_are_verbatim_and_tokenized() {
        let mut args = ArgumentBuilder::new();
        args.append("update")
            .append_extra(Some("--depth infinity --config-option 'a b'"))
            .unwrap();
        assert_eq!(
            args.render(),
            "update --depth infinity --config-option 'a b'"
        );
        assert_eq!(
            args.to_argv(),
            vec!["update", "--depth", "infinity", "--config-option", "a b"]
        );
    }

    #[test]
    fn blank_extra_arguments_add_nothing() {
        let mut args = ArgumentBuilder::new();
        args.append_extra(None).unwrap().append_extra(Some("  ")).unwrap();
        assert!(args.is_empty());
    }

    #[test]
    fn unbalanced_extra_arguments_rejected() {
        let mut args = ArgumentBuilder::new();
        let err = args.append_extra(Some("--message \"oops")).unwrap_err();
        assert!(matches!(err, SvnError::InvalidArgument { .. }));
    }

    proptest! {
        #[test]
        fn redacted_form_never_contains_secret(secret in "[A-Za-z0-9!@#$%^&*]{12,32}") {
            let mut args = ArgumentBuilder::new();
            args.append("info").append("--password").append_sensitive(secret.clone());
            prop_assert!(!args.render_redacted().contains(&secret));
            prop_assert!(args.render().contains(&secret));
        }

        #[test]
        fn quoted_values_survive_as_single_argv_entries(value in "[ -~]{0,40}") {
            let mut args = ArgumentBuilder::new();
            args.append_quoted(value.clone());
            prop_assert_eq!(args.to_argv(), vec![value]);
        }
    }
}
