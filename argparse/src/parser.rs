//! The root parser: owns the command tree and every declared argument,
//! and runs the resolution loop over a token vector.

use std::fmt;

use crate::argument::{Argument, Hit, Options};
use crate::command::{Arg, Command, CommandId, Scope};
use crate::error::{Error, Result};
use crate::nargs;
use crate::tokens::Tokens;
use crate::usage;
use crate::value::{Cell, Stored};

/// How a successful parse ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parsed {
    /// Every token was consumed.
    Complete,
    /// Help was requested and rendered. Values are not fully resolved.
    Help,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Done,
    Help,
}

pub struct Parser {
    pub(crate) commands: Vec<Command>,
    pub(crate) args: Vec<Argument>,
    printer: Box<dyn FnMut(&str)>,
    exit: Box<dyn FnMut(i32)>,
    help: bool,
    parsed: bool,
}

impl Parser {
    /// Create a parser whose root command is `name`. An empty name is
    /// replaced by the first token handed to [`parse`](Self::parse).
    pub fn new(name: &str, description: &str) -> Self {
        let mut parser = Parser {
            commands: vec![Command::new(name, description, None, None)],
            args: Vec::new(),
            printer: Box::new(|text| print!("{}", text)),
            exit: Box::new(|code| std::process::exit(code)),
            help: true,
            parsed: false,
        };
        parser.declare(
            CommandId::ROOT,
            "Flag",
            "h",
            "help",
            Cell::Help,
            Options::new().help("Print help information"),
        );
        parser
    }

    pub fn root(&mut self) -> Scope<'_> {
        Scope::new(self, CommandId::ROOT)
    }

    pub fn scope(&mut self, id: CommandId) -> Scope<'_> {
        Scope::new(self, id)
    }

    pub fn name(&self, id: CommandId) -> &str {
        &self.commands[id.0].name
    }

    pub fn description(&self, id: CommandId) -> &str {
        &self.commands[id.0].description
    }

    /// Whether `id` is the command selected by the last parse.
    pub fn invoked(&self, id: CommandId) -> bool {
        self.commands[id.0].invoked
    }

    // ------------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------------

    /// Where help output goes. Defaults to stdout.
    pub fn set_printer<F: FnMut(&str) + 'static>(&mut self, printer: F) {
        self.printer = Box::new(printer);
    }

    /// Called with 0 after help is printed. Defaults to `std::process::exit`.
    pub fn set_exit<F: FnMut(i32) + 'static>(&mut self, exit: F) {
        self.exit = Box::new(exit);
    }

    /// Commands created afterwards under `id` inherit the setting.
    pub fn set_exit_on_help(&mut self, id: CommandId, exit: bool) {
        self.commands[id.0].exit_on_help = exit;
    }

    /// Replace the usage renderer of `id`. Commands created afterwards under
    /// `id` inherit it.
    pub fn set_help_renderer<F>(&mut self, id: CommandId, renderer: F)
    where
        F: Fn(&Parser, CommandId, Option<&dyn fmt::Display>) -> String + Send + Sync + 'static,
    {
        self.commands[id.0].renderer = Some(std::sync::Arc::new(renderer));
    }

    /// Fail the parse when `id` is invoked without one of its subcommands.
    pub fn require_command(&mut self, id: CommandId, required: bool) {
        self.commands[id.0].command_required = required;
    }

    /// Drop the built-in `-h|--help` argument. Must be called before
    /// declaring anything named `h` or `help`.
    pub fn disable_help(&mut self) {
        let args = &self.args;
        self.commands[CommandId::ROOT.0]
            .args
            .retain(|&i| !matches!(args[i].cell, Cell::Help));
        self.help = false;
    }

    // ------------------------------------------------------------------------
    // Usage
    // ------------------------------------------------------------------------

    pub fn usage(&self) -> String {
        self.render(CommandId::ROOT, None)
    }

    /// Usage preceded by `msg` on its own line, typically a parse error.
    pub fn usage_with<M: fmt::Display>(&self, msg: M) -> String {
        self.render(CommandId::ROOT, Some(&msg))
    }

    pub fn command_usage(&self, id: CommandId) -> String {
        self.render(id, None)
    }

    pub fn command_usage_with<M: fmt::Display>(&self, id: CommandId, msg: M) -> String {
        self.render(id, Some(&msg))
    }

    /// The built-in layout, ignoring any custom renderer.
    pub fn default_usage(&self, id: CommandId, msg: Option<&dyn fmt::Display>) -> String {
        usage::render(self, id, msg)
    }

    fn render(&self, id: CommandId, msg: Option<&dyn fmt::Display>) -> String {
        match &self.commands[id.0].renderer {
            Some(renderer) => renderer(self, id, msg),
            None => usage::render(self, id, msg),
        }
    }

    // ------------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------------

    pub fn get<T: Stored>(&self, arg: &Arg<T>) -> Result<&T> {
        self.args
            .get(arg.index)
            .and_then(|a| T::from_cell(&a.cell))
            .ok_or(Error::TypeMismatch(T::TYPE))
    }

    /// Move the value out, leaving the zero value behind.
    pub fn take<T: Stored>(&mut self, arg: &Arg<T>) -> Result<T> {
        self.args
            .get_mut(arg.index)
            .and_then(|a| T::from_cell_mut(&mut a.cell))
            .map(std::mem::take)
            .ok_or(Error::TypeMismatch(T::TYPE))
    }

    // ------------------------------------------------------------------------
    // Parsing
    // ------------------------------------------------------------------------

    /// Parse `argv`, program name included. Can only be called once.
    pub fn parse<I, S>(&mut self, argv: I) -> Result<Parsed>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.parsed {
            return Err(Error::AlreadyParsed);
        }
        self.parsed = true;

        let mut tokens = Tokens::new(argv.into_iter().map(Into::into).collect());
        if let Some(program) = tokens.get(0) {
            if self.commands[CommandId::ROOT.0].name.is_empty() {
                self.commands[CommandId::ROOT.0].name = program.to_string();
            }
        }
        tokens.claim(0);

        let invoked = self.descend(&mut tokens);
        self.commands[invoked.0].invoked = true;

        let chain: Vec<usize> = self
            .chain(invoked)
            .into_iter()
            .flat_map(|scope| self.commands[scope.0].args.clone())
            .collect();
        for &i in &chain {
            if scan(&mut self.args[i], &mut tokens, self.help)? == Flow::Help {
                return Ok(self.help_requested(invoked));
            }
        }
        // Help anywhere on the line wins over a missing required argument.
        for &i in &chain {
            self.args[i].finish()?;
        }

        let command = &self.commands[invoked.0];
        if command.command_required && !command.children.is_empty() {
            return Err(Error::CommandRequired(command.name.clone()));
        }

        let rest = tokens.unclaimed();
        if !rest.is_empty() {
            return Err(Error::Unrecognized(rest.join(" ")));
        }
        tracing::debug!(command = %command.name, "parse complete");
        Ok(Parsed::Complete)
    }

    /// Follow subcommand names from the front of the vector.
    fn descend(&self, tokens: &mut Tokens) -> CommandId {
        let mut current = CommandId::ROOT;
        let mut i = 1;
        while let Some(token) = tokens.get(i) {
            let next = self.commands[current.0]
                .children
                .iter()
                .copied()
                .find(|c| self.commands[c.0].name == token);
            match next {
                Some(child) => {
                    tracing::debug!(command = %self.commands[child.0].name, "descending into command");
                    tokens.claim(i);
                    current = child;
                    i += 1;
                }
                None => break,
            }
        }
        current
    }

    fn help_requested(&mut self, id: CommandId) -> Parsed {
        tracing::debug!(command = %self.commands[id.0].name, "help requested");
        let text = self.render(id, None);
        (self.printer)(&text);
        if self.commands[id.0].exit_on_help {
            (self.exit)(0);
        }
        Parsed::Help
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("commands", &self.commands)
            .field("args", &self.args)
            .field("help", &self.help)
            .field("parsed", &self.parsed)
            .finish_non_exhaustive()
    }
}

/// One pass of `arg` over the whole token vector.
fn scan(arg: &mut Argument, tokens: &mut Tokens, help: bool) -> Result<Flow> {
    tracing::trace!(scope = arg.scope.0, "resolving {}", arg.name());
    arg.check_default()?;

    let mut i = 0;
    while i < tokens.len() {
        let Some(token) = tokens.get(i).map(str::to_owned) else {
            i += 1;
            continue;
        };
        if help && (token == "-h" || token == "--help") {
            return Ok(Flow::Help);
        }
        let Some(hit) = arg.hit(&token) else {
            i += 1;
            continue;
        };
        if matches!(arg.cell, Cell::Help) {
            return Ok(Flow::Help);
        }

        if arg.cell.is_switch() {
            let hits = match (hit, arg.short) {
                (Hit::Cluster, Some(c)) => {
                    tokens.strip_all(i, c);
                    token.chars().filter(|&ch| ch == c).count()
                }
                _ => {
                    tokens.claim(i);
                    1
                }
            };
            arg.store(&[], hits)?;
            i += 1;
            continue;
        }

        if hit == Hit::Cluster {
            // The value goes in the next token.
            if !tokens.is_eligible(i + 1) {
                return Err(Error::ParameterMustFollow(arg.name()));
            }
            tokens.strip_head(i);
        } else {
            tokens.claim(i);
        }

        let span = nargs::span(&arg.name(), arg.nargs(), &arg.cell, tokens, i)?;
        let values: Vec<String> = (i + 1..i + span)
            .filter_map(|j| tokens.get(j).map(str::to_owned))
            .collect();
        tokens.claim_range(i + 1, i + span);
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        arg.store(&values, 1)?;
        i += span;
    }

    Ok(Flow::Done)
}
