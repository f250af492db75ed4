//! Declarative command-line parsing over a tree of subcommands.
//!
//! Options are declared against a command node and come back as typed
//! [`Arg`] handles; a single [`Parser::parse`] call then matches the raw
//! argument vector against everything visible from the invoked command:
//!
//! ```no_run
//! use argparse::{Options, Parser};
//!
//! let mut parser = Parser::new("prog", "An example program");
//! let verbose = parser.root().counter("v", "verbose", Options::new());
//! let build = parser.root().new_command("build", "Build the project");
//! let jobs = parser.scope(build).int("j", "jobs", Options::new().default_val(4));
//!
//! if let Err(err) = parser.parse(std::env::args()) {
//!     eprint!("{}", parser.usage_with(err));
//!     std::process::exit(1);
//! }
//! if parser.invoked(build) {
//!     println!("{} jobs, verbosity {}", parser.get(&jobs)?, parser.get(&verbose)?);
//! }
//! # Ok::<(), argparse::Error>(())
//! ```
//!
//! - Value kinds: flags, counters, integers, floats, strings, selectors,
//!   files, and lists of each.
//! - `nargs` is a positive count or one of `?`, `*`, `+`.
//! - `-h`/`--help` renders usage through a replaceable printer and exit hook.

mod argument;
mod command;
mod error;
mod nargs;
mod parser;
mod tokens;
mod usage;
mod value;

pub use argument::{Options, ValidateError, Validator, DISABLE_DESCRIPTION};
pub use command::{Arg, CommandId, HelpRenderer, Scope};
pub use error::{Error, Result};
pub use nargs::Nargs;
pub use parser::{Parsed, Parser};
pub use value::{FileOpen, IntoValue, Stored, Value};

#[doc(hidden)]
pub use value::Cell;

pub use nix::fcntl::OFlag;
pub use nix::sys::stat::Mode;
