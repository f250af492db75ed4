//! Default usage and help layout.

use std::fmt;

use crate::argument::{Argument, DISABLE_DESCRIPTION};
use crate::command::CommandId;
use crate::parser::Parser;

const WIDTH: usize = 80;

fn last_line(text: &str) -> &str {
    text.rsplit('\n').next().unwrap_or(text)
}

/// Append `add` to the last line of `base`, separated by a space, wrapping
/// to a new line indented by `padding` when the line would reach `width`.
///
/// A long item is split on spaces and filled word by word, unless the
/// current line has no more than a tenth of `width` left.
fn add_to_last_line(mut base: String, add: &str, width: usize, padding: usize, can_split: bool) -> String {
    let has_room = width.saturating_sub(last_line(&base).len()) > width / 10;
    let candidate = format!("{} {}", last_line(&base), add);
    if last_line(&candidate).len() >= width {
        if has_room && can_split {
            for word in add.split(' ') {
                base = add_to_last_line(base, word, width, padding, false);
            }
            return base;
        }
        base.push('\n');
        base.push_str(&" ".repeat(padding));
    }
    base.push(' ');
    base.push_str(add);
    base
}

pub(crate) fn render(parser: &Parser, id: CommandId, msg: Option<&dyn fmt::Display>) -> String {
    let chain = parser.chain(id);
    let command = &parser.commands[id.0];
    let root = parser.name(CommandId::ROOT);
    let left = format!("usage: {}", root).len();

    let mut usage = String::from("usage:");
    for node in chain.iter().rev() {
        usage = add_to_last_line(usage, parser.name(*node), WIDTH, 0, true);
    }
    if !command.children.is_empty() {
        usage = add_to_last_line(usage, "<Command>", WIDTH, left, true);
    }

    let args: Vec<&Argument> = chain
        .iter()
        .flat_map(|node| parser.commands[node.0].args.iter())
        .map(|&i| &parser.args[i])
        .filter(|arg| !arg.is_hidden())
        .collect();
    for arg in &args {
        usage = add_to_last_line(usage, &arg.usage(), WIDTH, left, true);
    }

    usage.push_str("\n\n");
    usage.push_str(&" ".repeat(left));
    usage = add_to_last_line(usage, &command.description, WIDTH, left, true);
    usage.push('\n');

    let commands: Vec<_> = command
        .children
        .iter()
        .map(|c| &parser.commands[c.0])
        .filter(|c| c.description != DISABLE_DESCRIPTION)
        .collect();
    if !commands.is_empty() {
        usage.push_str("\nCommands:\n\n");
        let padding = commands.iter().map(|c| c.name.len() + 4).max().unwrap_or(0);
        for c in commands {
            let line = format!("  {:<width$}", c.name, width = padding - 3);
            usage.push_str(&add_to_last_line(line, &c.description, WIDTH, padding, true));
            usage.push('\n');
        }
    }

    if !args.is_empty() {
        usage.push_str("\nArguments:\n\n");
        let padding = args.iter().map(|a| a.long.len()).max().unwrap_or(0) + 9;
        for arg in args {
            let mut line = match arg.short {
                Some(c) => format!("  -{}  --{}", c, arg.long),
                None => format!("      --{}", arg.long),
            };
            line = format!("{:<width$}", line, width = padding);
            let help = arg.help_message();
            if !help.is_empty() {
                line = add_to_last_line(line, &help, WIDTH, padding, true);
            }
            usage.push_str(&line);
            usage.push('\n');
        }
    }
    usage.push('\n');

    match msg {
        Some(msg) => format!("{}\n{}", msg, usage),
        None => usage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Options;

    const PROG_USAGE: &str = r#"usage: verylongprogname <Command> [-h|--help] [-s|--verylongstring-flag1
                        "<value>"] [-i|--integer-flag1 <integer>]

                        prog description

Commands:

  veryverylongcmd1  cmd1 description
  cmd2              cmd2 description

Arguments:

  -h  --help                  Print help information
  -s  --verylongstring-flag1  string1 description
  -i  --integer-flag1         integer1 description

"#;

    const CMD1_USAGE: &str = r#"usage: verylongprogname veryverylongcmd1 [-f|--verylongflag1]
                        -a|--verylongflagA [-h|--help]
                        [-s|--verylongstring-flag1 "<value>"]
                        [-i|--integer-flag1 <integer>]

                        cmd1 description

Arguments:

  -f  --verylongflag1         flag1 description
  -a  --verylongflagA         flag1 description
  -h  --help                  Print help information
  -s  --verylongstring-flag1  string1 description
  -i  --integer-flag1         integer1 description

"#;

    const CMD2_USAGE: &str = r#"usage: verylongprogname cmd2 [-h|--help] [-s|--verylongstring-flag1 "<value>"]
                        [-i|--integer-flag1 <integer>]

                        cmd2 description

Arguments:

  -h  --help                  Print help information
  -s  --verylongstring-flag1  string1 description
  -i  --integer-flag1         integer1 description

"#;

    const MESSAGE_USAGE: &str = "test string
usage: prog [-h|--help]

            program description

Arguments:

  -h  --help  Print help information

";

    fn declare_cmd1(p: &mut Parser, name: &str, description: &str) -> CommandId {
        let cmd = p.root().new_command(name, description);
        p.scope(cmd)
            .flag("f", "verylongflag1", Options::new().help("flag1 description"));
        p.scope(cmd).flag(
            "a",
            "verylongflagA",
            Options::new().required().help("flag1 description"),
        );
        cmd
    }

    #[test]
    fn wraps_at_eighty_columns() {
        let mut p = Parser::new("verylongprogname", "prog description");
        let cmd1 = declare_cmd1(&mut p, "veryverylongcmd1", "cmd1 description");
        p.root().string(
            "s",
            "verylongstring-flag1",
            Options::new().help("string1 description"),
        );
        p.root()
            .int("i", "integer-flag1", Options::new().help("integer1 description"));
        let cmd2 = p.root().new_command("cmd2", "cmd2 description");

        assert_eq!(p.usage(), PROG_USAGE);
        assert_eq!(p.command_usage(cmd1), CMD1_USAGE);
        assert_eq!(p.command_usage(cmd2), CMD2_USAGE);
    }

    #[test]
    fn hidden_arguments_and_commands() {
        let mut p = Parser::new("verylongprogname", "prog description");
        let cmd1 = declare_cmd1(&mut p, "veryverylongcmd1", "cmd1 description");
        p.root().string(
            "s",
            "verylongstring-flag1",
            Options::new().help("string1 description"),
        );
        p.root()
            .int("i", "integer-flag1", Options::new().help("integer1 description"));
        p.root()
            .int("", "integer-flag2", Options::new().help(DISABLE_DESCRIPTION));
        p.root().new_command("cmd2", "cmd2 description");
        declare_cmd1(&mut p, "cmd3", DISABLE_DESCRIPTION);

        assert_eq!(p.usage(), PROG_USAGE);
        assert_eq!(p.command_usage(cmd1), CMD1_USAGE);
    }

    #[test]
    fn leading_message() {
        let p = Parser::new("prog", "program description");
        assert_eq!(p.usage_with("test string"), MESSAGE_USAGE);

        let err = crate::Error::Required("--x".into());
        assert!(p.usage_with(&err).starts_with("[--x] is required\nusage: prog"));
    }

    #[test]
    fn default_shown_for_optional_arguments() {
        let mut p = Parser::new("prog", "");
        p.root()
            .int("n", "number", Options::new().default_val(5).help("How many"));
        p.root().string("", "name", Options::new());

        let usage = p.usage();
        assert!(usage.contains("  -n  --number  How many. Default: 5\n"));
        assert!(usage.contains("\n      --name"));
        assert!(usage.contains("[--name \"<value>\"]"));
    }

    #[test]
    fn long_help_wraps_under_its_column() {
        let words = vec!["word"; 20].join(" ");
        let line = add_to_last_line("  -x  --xx  ".to_string(), &words, WIDTH, 11, true);
        let lines: Vec<&str> = line.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.len() < WIDTH));
        assert!(lines[1].starts_with(&format!("{} word", " ".repeat(11))));
    }
}
