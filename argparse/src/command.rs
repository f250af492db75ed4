//! The command tree and the declaration API.
//!
//! Nodes live in an arena owned by the [`Parser`]; a [`CommandId`] is an
//! index into it. Declarations go through a [`Scope`], which borrows the
//! parser mutably for the duration of the calls.

use std::fmt;
use std::fs::File;
use std::marker::PhantomData;
use std::sync::Arc;

use nix::fcntl::OFlag;
use nix::sys::stat::Mode;

use crate::argument::{Argument, Options};
use crate::parser::Parser;
use crate::value::{Cell, FileOpen, Stored};

/// Index of a command node in its parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(pub(crate) usize);

impl CommandId {
    pub const ROOT: CommandId = CommandId(0);
}

/// Replacement for the default usage renderer of a node.
pub type HelpRenderer =
    Arc<dyn Fn(&Parser, CommandId, Option<&dyn fmt::Display>) -> String + Send + Sync>;

pub(crate) struct Command {
    pub name: String,
    pub description: String,
    /// Indices into the parser's argument arena, in declaration order.
    pub args: Vec<usize>,
    pub children: Vec<CommandId>,
    pub parent: Option<CommandId>,
    pub invoked: bool,
    pub exit_on_help: bool,
    pub renderer: Option<HelpRenderer>,
    pub command_required: bool,
}

impl Command {
    pub fn new(name: &str, description: &str, parent: Option<&Command>, id: Option<CommandId>) -> Self {
        Command {
            name: name.to_string(),
            description: description.to_string(),
            args: Vec::new(),
            children: Vec::new(),
            parent: id,
            invoked: false,
            exit_on_help: parent.map_or(true, |p| p.exit_on_help),
            renderer: parent.and_then(|p| p.renderer.clone()),
            command_required: false,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("children", &self.children)
            .field("parent", &self.parent)
            .field("invoked", &self.invoked)
            .finish_non_exhaustive()
    }
}

/// Typed handle to a declared argument.
///
/// Read the parsed value back with [`Parser::get`] or move it out with
/// [`Parser::take`].
pub struct Arg<T> {
    pub(crate) index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Arg<T> {
    fn new(index: usize) -> Self {
        Arg {
            index,
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for Arg<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Arg<T> {}

impl<T> fmt::Debug for Arg<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Arg({})", self.index)
    }
}

// ============================================================================
// Tree walking
// ============================================================================

impl Parser {
    /// `id` followed by each of its ancestors, up to the root.
    pub(crate) fn chain(&self, id: CommandId) -> Vec<CommandId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.commands[current.0].parent {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Every node below `id`, depth first.
    fn descendants(&self, id: CommandId) -> Vec<CommandId> {
        let mut found = Vec::new();
        let mut stack: Vec<CommandId> = self.commands[id.0].children.clone();
        while let Some(next) = stack.pop() {
            found.push(next);
            stack.extend(self.commands[next.0].children.iter().copied());
        }
        found
    }

    fn check_names(&self, scope: CommandId, kind: &str, short: Option<char>, long: &str) {
        let mut nodes = self.chain(scope);
        nodes.extend(self.descendants(scope));
        for node in nodes {
            for &i in &self.commands[node.0].args {
                let other = &self.args[i];
                if let Some(c) = short.filter(|_| other.short == short) {
                    panic!("unable to add {}: short name {} occurs more than once", kind, c);
                }
                if other.long == long {
                    panic!("unable to add {}: long name {} occurs more than once", kind, long);
                }
            }
        }
    }

    pub(crate) fn declare(
        &mut self,
        scope: CommandId,
        kind: &str,
        short: &str,
        long: &str,
        cell: Cell,
        opts: Options,
    ) -> usize {
        if long.is_empty() {
            panic!("unable to add {}: long name must be provided", kind);
        }
        let mut chars = short.chars();
        let short = chars.next();
        if chars.next().is_some() {
            panic!("unable to add {}: short name must not exceed 1 character", kind);
        }
        self.check_names(scope, kind, short, long);

        let index = self.args.len();
        self.args.push(Argument::new(short, long, cell, opts, scope));
        self.commands[scope.0].args.push(index);
        index
    }
}

// ============================================================================
// Scope — declarations against one node
// ============================================================================

/// Declaration handle for one command node.
///
/// Every method panics on a malformed declaration: an empty long name, a
/// short name longer than one character, or a name already used by this
/// node, one of its ancestors or one of its descendants.
pub struct Scope<'p> {
    parser: &'p mut Parser,
    id: CommandId,
}

impl<'p> Scope<'p> {
    pub(crate) fn new(parser: &'p mut Parser, id: CommandId) -> Self {
        Scope { parser, id }
    }

    pub fn id(&self) -> CommandId {
        self.id
    }

    fn add<T: Stored>(&mut self, kind: &str, short: &str, long: &str, cell: Cell, opts: Options) -> Arg<T> {
        Arg::new(self.parser.declare(self.id, kind, short, long, cell, opts))
    }

    /// Boolean switch, set to true when present.
    pub fn flag(&mut self, short: &str, long: &str, opts: Options) -> Arg<bool> {
        self.add("Flag", short, long, Cell::Flag(false), opts)
    }

    /// Switch that counts its occurrences: `-vvv --verbose` yields 4.
    pub fn counter(&mut self, short: &str, long: &str, opts: Options) -> Arg<i64> {
        self.add("Counter", short, long, Cell::Counter(0), opts)
    }

    pub fn int(&mut self, short: &str, long: &str, opts: Options) -> Arg<i64> {
        self.add("Int", short, long, Cell::Int(0), opts)
    }

    pub fn float(&mut self, short: &str, long: &str, opts: Options) -> Arg<f64> {
        self.add("Float", short, long, Cell::Float(0.0), opts)
    }

    pub fn string(&mut self, short: &str, long: &str, opts: Options) -> Arg<String> {
        self.add("String", short, long, Cell::Str(String::new()), opts)
    }

    /// String restricted to one of `allowed`.
    pub fn selector<S: AsRef<str>>(
        &mut self,
        short: &str,
        long: &str,
        allowed: &[S],
        opts: Options,
    ) -> Arg<String> {
        let cell = Cell::Selector {
            value: String::new(),
            allowed: allowed.iter().map(|s| s.as_ref().to_string()).collect(),
        };
        self.add("Selector", short, long, cell, opts)
    }

    /// Path opened with `flags` and `perm` once matched.
    pub fn file(
        &mut self,
        short: &str,
        long: &str,
        flags: OFlag,
        perm: Mode,
        opts: Options,
    ) -> Arg<Option<File>> {
        let cell = Cell::File {
            file: None,
            open: FileOpen::new(flags, perm),
        };
        self.add("File", short, long, cell, opts)
    }

    pub fn ints(&mut self, short: &str, long: &str, opts: Options) -> Arg<Vec<i64>> {
        self.add("IntList", short, long, Cell::Ints(Vec::new()), opts)
    }

    pub fn floats(&mut self, short: &str, long: &str, opts: Options) -> Arg<Vec<f64>> {
        self.add("FloatList", short, long, Cell::Floats(Vec::new()), opts)
    }

    pub fn strings(&mut self, short: &str, long: &str, opts: Options) -> Arg<Vec<String>> {
        self.add("StringList", short, long, Cell::Strs(Vec::new()), opts)
    }

    pub fn files(
        &mut self,
        short: &str,
        long: &str,
        flags: OFlag,
        perm: Mode,
        opts: Options,
    ) -> Arg<Vec<File>> {
        let cell = Cell::Files {
            files: Vec::new(),
            open: FileOpen::new(flags, perm),
        };
        self.add("FileList", short, long, cell, opts)
    }

    /// Add a subcommand. It inherits this node's help settings.
    pub fn new_command(&mut self, name: &str, description: &str) -> CommandId {
        let id = CommandId(self.parser.commands.len());
        let node = Command::new(name, description, Some(&self.parser.commands[self.id.0]), Some(self.id));
        self.parser.commands.push(node);
        self.parser.commands[self.id.0].children.push(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use crate::{Options, Parser};

    #[test]
    fn chain_walks_to_root() {
        let mut p = Parser::new("prog", "");
        let a = p.root().new_command("a", "");
        let b = p.scope(a).new_command("b", "");
        let chain: Vec<usize> = p.chain(b).iter().map(|c| c.0).collect();
        assert_eq!(chain, vec![b.0, a.0, 0]);
    }

    #[test]
    fn siblings_may_reuse_names() {
        let mut p = Parser::new("prog", "");
        let a = p.root().new_command("a", "");
        let b = p.root().new_command("b", "");
        p.scope(a).flag("f", "force", Options::new());
        p.scope(b).flag("f", "force", Options::new());
    }

    #[test]
    #[should_panic(expected = "short name s occurs more than once")]
    fn short_name_clash_with_ancestor() {
        let mut p = Parser::new("prog", "");
        p.root().string("s", "string", Options::new());
        let cmd = p.root().new_command("cmd", "");
        p.scope(cmd).flag("s", "other", Options::new());
    }

    #[test]
    #[should_panic(expected = "long name force occurs more than once")]
    fn long_name_clash_with_descendant() {
        let mut p = Parser::new("prog", "");
        let cmd = p.root().new_command("cmd", "");
        p.scope(cmd).flag("f", "force", Options::new());
        p.root().flag("", "force", Options::new());
    }

    #[test]
    #[should_panic(expected = "long name must be provided")]
    fn empty_long_name() {
        let mut p = Parser::new("prog", "");
        p.root().flag("f", "", Options::new());
    }

    #[test]
    #[should_panic(expected = "short name must not exceed 1 character")]
    fn oversized_short_name() {
        let mut p = Parser::new("prog", "");
        p.root().int("i2", "integer", Options::new());
    }

    #[test]
    #[should_panic(expected = "short name h occurs more than once")]
    fn help_name_is_reserved() {
        let mut p = Parser::new("prog", "");
        p.root().flag("h", "host", Options::new());
    }

    #[test]
    fn help_name_is_free_once_disabled() {
        let mut p = Parser::new("prog", "");
        p.disable_help();
        p.root().flag("h", "host", Options::new());
    }
}
