use std::io;

/// Everything a parse can fail with.
///
/// Declaration mistakes (missing or oversized names, duplicates) are not
/// represented here: they panic when the descriptor is declared.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("[{name}] bad integer value [{value}]")]
    BadInteger { name: String, value: String },

    #[error("[{name}] bad floating point value [{value}]")]
    BadFloat { name: String, value: String },

    /// Opening a file argument failed. The OS error is passed through as is.
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("[{0}]: nargs integer value must be > 0")]
    NargsNotPositive(String),

    #[error("invalid string value [{0}] for nargs")]
    NargsInvalid(String),

    #[error("not enough arguments for {0}")]
    NotEnoughArguments(String),

    #[error("[{0}] requires at least one argument")]
    AtLeastOneArgument(String),

    #[error("[{0}] followed by too many arguments")]
    TooManyArguments(String),

    #[error("[{0}] argument: The parameter must follow")]
    ParameterMustFollow(String),

    #[error("[{0}] is required")]
    Required(String),

    #[error("[{0}] can only be present once")]
    Duplicate(String),

    #[error("bad value for [{name}]. Allowed values are [{allowed}]")]
    BadSelector { name: String, allowed: String },

    #[error("cannot use default type [{given}] as value of pointer with type [*{expected}]")]
    BadDefault {
        given: &'static str,
        expected: &'static str,
    },

    /// Returned unchanged from a `validate` callback.
    #[error(transparent)]
    Validation(Box<dyn std::error::Error + Send + Sync>),

    #[error("unknown arguments {0}")]
    Unrecognized(String),

    #[error("[{0}] command is required")]
    CommandRequired(String),

    #[error("arguments have already been parsed")]
    AlreadyParsed,

    #[error("type mismatch: expected {0}")]
    TypeMismatch(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_is_not_rewrapped() {
        let err = Error::from(io::Error::from(io::ErrorKind::NotFound));
        let io_err = io::Error::from(io::ErrorKind::NotFound);
        assert_eq!(err.to_string(), io_err.to_string());
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
    }

    #[test]
    fn default_mismatch_message() {
        let err = Error::BadDefault {
            given: "String",
            expected: "bool",
        };
        assert_eq!(
            err.to_string(),
            "cannot use default type [String] as value of pointer with type [*bool]"
        );
    }
}
