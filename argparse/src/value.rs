//! Typed storage for declared arguments.
//!
//! Every descriptor owns exactly one [`Cell`]. The variant fixes the value
//! kind for the lifetime of the parser, and carries both the output storage
//! and the conversion rules for that kind.

use std::fmt;
use std::fs::File;
use std::io;
use std::os::fd::FromRawFd;

use nix::fcntl::{self, OFlag};
use nix::sys::stat::Mode;

use crate::error::{Error, Result};

// ============================================================================
// Value — typed default values
// ============================================================================

/// A default value as supplied through [`Options::default_val`](crate::Options::default_val).
///
/// The type is only checked against the descriptor when parsing starts.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Ints(Vec<i64>),
    Floats(Vec<f64>),
    Strs(Vec<String>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "i64",
            Value::Float(_) => "f64",
            Value::Str(_) => "String",
            Value::Ints(_) => "Vec<i64>",
            Value::Floats(_) => "Vec<f64>",
            Value::Strs(_) => "Vec<String>",
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Ints(v) => write_list(f, v),
            Value::Floats(v) => write_list(f, v),
            Value::Strs(v) => write_list(f, v),
        }
    }
}

/// Trait for converting Rust values into a [`Value`]
pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(self as i64)
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Str(self.to_string())
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl IntoValue for Vec<i64> {
    fn into_value(self) -> Value {
        Value::Ints(self)
    }
}

impl IntoValue for Vec<i32> {
    fn into_value(self) -> Value {
        Value::Ints(self.into_iter().map(i64::from).collect())
    }
}

impl IntoValue for Vec<f64> {
    fn into_value(self) -> Value {
        Value::Floats(self)
    }
}

impl IntoValue for Vec<String> {
    fn into_value(self) -> Value {
        Value::Strs(self)
    }
}

impl IntoValue for Vec<&str> {
    fn into_value(self) -> Value {
        Value::Strs(self.into_iter().map(str::to_string).collect())
    }
}

// ============================================================================
// FileOpen — how file arguments are opened
// ============================================================================

/// Open flags and creation mode for file arguments.
#[derive(Debug, Clone, Copy)]
pub struct FileOpen {
    pub flags: OFlag,
    pub perm: Mode,
}

impl FileOpen {
    pub fn new(flags: OFlag, perm: Mode) -> Self {
        FileOpen { flags, perm }
    }

    /// Open `path` with `open(2)`. OS errors come back unchanged.
    pub fn open(&self, path: &str) -> io::Result<File> {
        let fd = fcntl::open(path, self.flags, self.perm).map_err(io::Error::from)?;
        // SAFETY: `fd` was just returned by open(2) and nothing else owns it.
        Ok(unsafe { File::from_raw_fd(fd) })
    }
}

// ============================================================================
// Cell — the output slot of one descriptor
// ============================================================================

#[derive(Debug)]
#[doc(hidden)]
pub enum Cell {
    Help,
    Flag(bool),
    Counter(i64),
    Int(i64),
    Float(f64),
    Str(String),
    Selector { value: String, allowed: Vec<String> },
    File { file: Option<File>, open: FileOpen },
    Ints(Vec<i64>),
    Floats(Vec<f64>),
    Strs(Vec<String>),
    Files { files: Vec<File>, open: FileOpen },
}

impl Cell {
    /// Flags and counters never take a value token.
    pub fn is_switch(&self) -> bool {
        matches!(self, Cell::Help | Cell::Flag(_) | Cell::Counter(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Cell::Ints(_) | Cell::Floats(_) | Cell::Strs(_) | Cell::Files { .. }
        )
    }

    /// Scalars may only be given once per parse; counters and lists accumulate.
    pub fn is_unique(&self) -> bool {
        !self.is_list() && !matches!(self, Cell::Counter(_))
    }

    /// Name of the native type, as used in default type errors.
    pub fn native_type(&self) -> &'static str {
        match self {
            Cell::Help | Cell::Flag(_) => "bool",
            Cell::Counter(_) | Cell::Int(_) => "i64",
            Cell::Float(_) => "f64",
            Cell::Str(_) | Cell::Selector { .. } => "String",
            Cell::File { .. } => "File",
            Cell::Ints(_) => "Vec<i64>",
            Cell::Floats(_) => "Vec<f64>",
            Cell::Strs(_) => "Vec<String>",
            Cell::Files { .. } => "Vec<File>",
        }
    }

    /// Check that `value` could be stored into this cell.
    pub fn check_default(&self, value: &Value) -> Result<()> {
        let ok = matches!(
            (self, value),
            (Cell::Flag(_), Value::Bool(_))
                | (Cell::Counter(_) | Cell::Int(_), Value::Int(_))
                | (Cell::Float(_), Value::Float(_))
                | (
                    Cell::Str(_) | Cell::Selector { .. } | Cell::File { .. },
                    Value::Str(_)
                )
                | (Cell::Ints(_), Value::Ints(_))
                | (Cell::Floats(_), Value::Floats(_))
                | (Cell::Strs(_) | Cell::Files { .. }, Value::Strs(_))
        );
        if ok {
            Ok(())
        } else {
            Err(Error::BadDefault {
                given: value.type_name(),
                expected: self.native_type(),
            })
        }
    }

    /// Store a default. Lists are replaced, not appended to; file defaults
    /// are paths and get opened.
    pub fn apply_default(&mut self, value: &Value) -> Result<()> {
        self.check_default(value)?;
        match (self, value) {
            (Cell::Flag(b), Value::Bool(v)) => *b = *v,
            (Cell::Counter(n) | Cell::Int(n), Value::Int(v)) => *n = *v,
            (Cell::Float(n), Value::Float(v)) => *n = *v,
            (Cell::Str(s), Value::Str(v)) => *s = v.clone(),
            (Cell::Selector { value: s, .. }, Value::Str(v)) => *s = v.clone(),
            (Cell::File { file, open }, Value::Str(path)) => *file = Some(open.open(path)?),
            (Cell::Ints(l), Value::Ints(v)) => *l = v.clone(),
            (Cell::Floats(l), Value::Floats(v)) => *l = v.clone(),
            (Cell::Strs(l), Value::Strs(v)) => *l = v.clone(),
            (Cell::Files { files, open }, Value::Strs(paths)) => {
                *files = paths
                    .iter()
                    .map(|p| open.open(p))
                    .collect::<io::Result<Vec<_>>>()?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Convert the raw value tokens of one occurrence and store them.
    ///
    /// `hits` is the number of times a switch appeared in the occurrence
    /// (`-vvv` is one occurrence with three hits).
    pub fn store(&mut self, name: &str, values: &[&str], hits: usize) -> Result<()> {
        if !self.is_list() && values.len() > 1 {
            return Err(Error::TooManyArguments(name.to_string()));
        }
        match self {
            Cell::Help => {}
            Cell::Flag(b) => *b = true,
            Cell::Counter(n) => *n += hits as i64,
            Cell::Int(n) => {
                if let Some(v) = values.first() {
                    *n = parse_int(name, v)?;
                }
            }
            Cell::Float(n) => {
                if let Some(v) = values.first() {
                    *n = parse_float(name, v)?;
                }
            }
            Cell::Str(s) => {
                if let Some(v) = values.first() {
                    *s = v.to_string();
                }
            }
            Cell::Selector { value, allowed } => {
                if let Some(v) = values.first() {
                    if !allowed.iter().any(|a| a == v) {
                        return Err(Error::BadSelector {
                            name: name.to_string(),
                            allowed: allowed.join(" "),
                        });
                    }
                    *value = v.to_string();
                }
            }
            Cell::File { file, open } => {
                if let Some(v) = values.first() {
                    *file = Some(open.open(v)?);
                }
            }
            Cell::Ints(l) => {
                let parsed = values
                    .iter()
                    .map(|v| parse_int(name, v))
                    .collect::<Result<Vec<_>>>()?;
                l.extend(parsed);
            }
            Cell::Floats(l) => {
                let parsed = values
                    .iter()
                    .map(|v| parse_float(name, v))
                    .collect::<Result<Vec<_>>>()?;
                l.extend(parsed);
            }
            Cell::Strs(l) => l.extend(values.iter().map(|v| v.to_string())),
            Cell::Files { files, open } => {
                let opened = values
                    .iter()
                    .map(|v| open.open(v))
                    .collect::<io::Result<Vec<_>>>()?;
                files.extend(opened);
            }
        }
        Ok(())
    }
}

fn parse_int(name: &str, token: &str) -> Result<i64> {
    token.parse().map_err(|_| Error::BadInteger {
        name: name.to_string(),
        value: token.to_string(),
    })
}

fn parse_float(name: &str, token: &str) -> Result<f64> {
    token.parse().map_err(|_| Error::BadFloat {
        name: name.to_string(),
        value: token.to_string(),
    })
}

// ============================================================================
// Stored — typed read-back from a Cell
// ============================================================================

/// Output types a declared argument can be read back as.
pub trait Stored: Default + Sized {
    const TYPE: &'static str;
    fn from_cell(cell: &Cell) -> Option<&Self>;
    fn from_cell_mut(cell: &mut Cell) -> Option<&mut Self>;
}

impl Stored for bool {
    const TYPE: &'static str = "bool";
    fn from_cell(cell: &Cell) -> Option<&Self> {
        match cell {
            Cell::Flag(b) => Some(b),
            _ => None,
        }
    }
    fn from_cell_mut(cell: &mut Cell) -> Option<&mut Self> {
        match cell {
            Cell::Flag(b) => Some(b),
            _ => None,
        }
    }
}

impl Stored for i64 {
    const TYPE: &'static str = "i64";
    fn from_cell(cell: &Cell) -> Option<&Self> {
        match cell {
            Cell::Counter(n) | Cell::Int(n) => Some(n),
            _ => None,
        }
    }
    fn from_cell_mut(cell: &mut Cell) -> Option<&mut Self> {
        match cell {
            Cell::Counter(n) | Cell::Int(n) => Some(n),
            _ => None,
        }
    }
}

impl Stored for f64 {
    const TYPE: &'static str = "f64";
    fn from_cell(cell: &Cell) -> Option<&Self> {
        match cell {
            Cell::Float(n) => Some(n),
            _ => None,
        }
    }
    fn from_cell_mut(cell: &mut Cell) -> Option<&mut Self> {
        match cell {
            Cell::Float(n) => Some(n),
            _ => None,
        }
    }
}

impl Stored for String {
    const TYPE: &'static str = "String";
    fn from_cell(cell: &Cell) -> Option<&Self> {
        match cell {
            Cell::Str(s) | Cell::Selector { value: s, .. } => Some(s),
            _ => None,
        }
    }
    fn from_cell_mut(cell: &mut Cell) -> Option<&mut Self> {
        match cell {
            Cell::Str(s) | Cell::Selector { value: s, .. } => Some(s),
            _ => None,
        }
    }
}

impl Stored for Option<File> {
    const TYPE: &'static str = "Option<File>";
    fn from_cell(cell: &Cell) -> Option<&Self> {
        match cell {
            Cell::File { file, .. } => Some(file),
            _ => None,
        }
    }
    fn from_cell_mut(cell: &mut Cell) -> Option<&mut Self> {
        match cell {
            Cell::File { file, .. } => Some(file),
            _ => None,
        }
    }
}

impl Stored for Vec<i64> {
    const TYPE: &'static str = "Vec<i64>";
    fn from_cell(cell: &Cell) -> Option<&Self> {
        match cell {
            Cell::Ints(l) => Some(l),
            _ => None,
        }
    }
    fn from_cell_mut(cell: &mut Cell) -> Option<&mut Self> {
        match cell {
            Cell::Ints(l) => Some(l),
            _ => None,
        }
    }
}

impl Stored for Vec<f64> {
    const TYPE: &'static str = "Vec<f64>";
    fn from_cell(cell: &Cell) -> Option<&Self> {
        match cell {
            Cell::Floats(l) => Some(l),
            _ => None,
        }
    }
    fn from_cell_mut(cell: &mut Cell) -> Option<&mut Self> {
        match cell {
            Cell::Floats(l) => Some(l),
            _ => None,
        }
    }
}

impl Stored for Vec<String> {
    const TYPE: &'static str = "Vec<String>";
    fn from_cell(cell: &Cell) -> Option<&Self> {
        match cell {
            Cell::Strs(l) => Some(l),
            _ => None,
        }
    }
    fn from_cell_mut(cell: &mut Cell) -> Option<&mut Self> {
        match cell {
            Cell::Strs(l) => Some(l),
            _ => None,
        }
    }
}

impl Stored for Vec<File> {
    const TYPE: &'static str = "Vec<File>";
    fn from_cell(cell: &Cell) -> Option<&Self> {
        match cell {
            Cell::Files { files, .. } => Some(files),
            _ => None,
        }
    }
    fn from_cell_mut(cell: &mut Cell) -> Option<&mut Self> {
        match cell {
            Cell::Files { files, .. } => Some(files),
            _ => None,
        }
    }
}
