//! Argument descriptors and the options bag they are declared with.

use std::fmt;
use std::sync::Arc;

use crate::command::CommandId;
use crate::error::{Error, Result};
use crate::nargs::Nargs;
use crate::value::{Cell, IntoValue, Value};

/// Help text that hides an argument or command from usage output.
/// The argument still parses normally.
pub const DISABLE_DESCRIPTION: &str = "DISABLEDDESCRIPTIONWILLNOTSHOWUP";

pub type ValidateError = Box<dyn std::error::Error + Send + Sync>;

/// Callback run on the raw value tokens of an occurrence, before conversion.
pub type Validator =
    Arc<dyn Fn(&[String]) -> std::result::Result<(), ValidateError> + Send + Sync + 'static>;

// ============================================================================
// Options — per-argument configuration
// ============================================================================

#[derive(Clone, Default)]
pub struct Options {
    required: bool,
    default_value: Option<Value>,
    nargs: Option<Nargs>,
    validate: Option<Validator>,
    help: String,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value stored when the argument is not given. Its type is checked
    /// against the argument kind at parse time.
    pub fn default_val<T: IntoValue>(mut self, v: T) -> Self {
        self.default_value = Some(v.into_value());
        self
    }

    /// Number of values: a positive integer, or one of `?`, `*`, `+`.
    /// Checked at parse time.
    pub fn nargs<N: Into<Nargs>>(mut self, n: N) -> Self {
        self.nargs = Some(n.into());
        self
    }

    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&[String]) -> std::result::Result<(), ValidateError> + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(f));
        self
    }

    pub fn help(mut self, text: &str) -> Self {
        self.help = text.to_string();
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("required", &self.required)
            .field("default_value", &self.default_value)
            .field("nargs", &self.nargs)
            .field("validate", &self.validate.is_some())
            .field("help", &self.help)
            .finish()
    }
}

// ============================================================================
// Argument — one declared option
// ============================================================================

/// How a token matched an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hit {
    /// `--long`
    Long,
    /// `-s`
    Short,
    /// `-xsy`: the short name is one character of a cluster.
    Cluster,
}

#[derive(Debug)]
pub(crate) struct Argument {
    pub short: Option<char>,
    pub long: String,
    pub cell: Cell,
    pub opts: Options,
    pub scope: CommandId,
    pub matched: bool,
}

impl Argument {
    pub fn new(short: Option<char>, long: &str, cell: Cell, opts: Options, scope: CommandId) -> Self {
        Argument {
            short,
            long: long.to_string(),
            cell,
            opts,
            scope,
            matched: false,
        }
    }

    /// `-s|--long`, or `--long` without a short name.
    pub fn name(&self) -> String {
        match self.short {
            Some(c) => format!("-{}|--{}", c, self.long),
            None => format!("--{}", self.long),
        }
    }

    pub fn nargs(&self) -> Option<&Nargs> {
        self.opts.nargs.as_ref()
    }

    pub fn is_hidden(&self) -> bool {
        self.opts.help == DISABLE_DESCRIPTION
    }

    pub fn hit(&self, token: &str) -> Option<Hit> {
        if let Some(rest) = token.strip_prefix("--") {
            return (!rest.starts_with('-') && rest == self.long).then_some(Hit::Long);
        }
        let short = self.short?;
        let rest = token.strip_prefix('-')?;
        if rest.is_empty() {
            return None;
        }
        let mut chars = rest.chars();
        let leads = chars.next() == Some(short);
        if leads && chars.next().is_none() {
            Some(Hit::Short)
        } else if self.cell.is_switch() && rest.contains(short) {
            Some(Hit::Cluster)
        } else if leads {
            // Value-taking options only join a cluster at its head.
            Some(Hit::Cluster)
        } else {
            None
        }
    }

    /// Fail early on a default whose type does not fit the argument.
    pub fn check_default(&self) -> Result<()> {
        match &self.opts.default_value {
            Some(v) => self.cell.check_default(v),
            None => Ok(()),
        }
    }

    /// Record one occurrence with its raw value tokens.
    pub fn store(&mut self, values: &[&str], hits: usize) -> Result<()> {
        let name = self.name();
        if self.matched && self.cell.is_unique() {
            return Err(Error::Duplicate(name));
        }
        if let Some(validate) = &self.opts.validate {
            let raw: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            validate(&raw).map_err(Error::Validation)?;
        }
        self.cell.store(&name, values, hits)?;
        self.matched = true;

        // `?` matched without a value.
        if values.is_empty() && !self.cell.is_switch() {
            if let Some(v) = &self.opts.default_value {
                self.cell.apply_default(v)?;
            }
        }
        Ok(())
    }

    /// Called once the argument's scan is over.
    pub fn finish(&mut self) -> Result<()> {
        if self.matched || matches!(self.cell, Cell::Help) {
            return Ok(());
        }
        match &self.opts.default_value {
            Some(v) => self.cell.apply_default(v),
            None if self.opts.required => Err(Error::Required(self.name())),
            None => Ok(()),
        }
    }

    /// Fragment for the `usage:` line.
    pub fn usage(&self) -> String {
        let mut result = self.name();
        match &self.cell {
            Cell::Help | Cell::Flag(_) | Cell::Counter(_) => {}
            Cell::Int(_) => result.push_str(" <integer>"),
            Cell::Float(_) => result.push_str(" <float>"),
            Cell::Str(_) => result.push_str(" \"<value>\""),
            Cell::Selector { allowed, .. } => {
                result.push_str(&format!(" ({})", allowed.join("|")));
            }
            Cell::File { .. } => result.push_str(" <file>"),
            Cell::Ints(_) | Cell::Floats(_) | Cell::Strs(_) | Cell::Files { .. } => {
                result.push_str(" \"<value>\" [\"<value>\" ...]");
            }
        }
        if !self.opts.required {
            result = format!("[{}]", result);
        }
        result
    }

    /// Right-hand column of the `Arguments:` block.
    pub fn help_message(&self) -> String {
        let mut message = self.opts.help.clone();
        if message.is_empty() {
            return message;
        }
        if let (false, Some(v)) = (self.opts.required, &self.opts.default_value) {
            message.push_str(&format!(". Default: {}", v));
        }
        message
    }
}
