// Test binary: prints the values collected for every nargs form

use argparse::*;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run() {
        println!("{}", e);
        std::process::exit(1);
    }
}

fn list<T: std::fmt::Display>(items: &[T]) -> String {
    let items: Vec<String> = items.iter().map(|i| i.to_string()).collect();
    format!("[{}]", items.join(" "))
}

fn run() -> Result<()> {
    let mut parser = Parser::new("print", "Prints provided string to stdout");
    let mut root = parser.root();

    let s = root.string(
        "s",
        "string",
        Options::new().help("Keeps a single value of nargs N").nargs(3),
    );
    let s2 = root.string(
        "",
        "string2",
        Options::new()
            .help("Requires 0 or 1 arguments, Default value not set")
            .nargs("?"),
    );
    let s3 = root.strings("", "strings", Options::new().help("One or more arguments").nargs("+"));
    let s4 = root.strings("", "strings2", Options::new().help("Zero or more arguments").nargs("*"));
    let s5 = root.strings("", "strings3", Options::new().help("Requires 3 arguments").nargs(3));

    let i = root.int("i", "int", Options::new().help("Keeps a single value of nargs N").nargs(3));
    let i2 = root.int(
        "",
        "int2",
        Options::new()
            .help("Requires 0 or 1 arguments, Default value set")
            .nargs("?")
            .default_val(5),
    );
    let i3 = root.ints("", "ints", Options::new().help("One or more arguments").nargs("+"));
    let i4 = root.ints("", "ints2", Options::new().help("Zero or more arguments").nargs("*"));
    let i5 = root.ints("", "ints3", Options::new().help("Requires 2 arguments").nargs(2));

    match parser.parse(std::env::args()) {
        Ok(Parsed::Complete) => {}
        Ok(Parsed::Help) => return Ok(()),
        Err(e) => {
            print!("{}", parser.usage_with(e));
            std::process::exit(1);
        }
    }

    // Sorted by option name
    let lines = [
        ("--int", parser.get(&i)?.to_string()),
        ("--int2", parser.get(&i2)?.to_string()),
        ("--ints", list(parser.get(&i3)?)),
        ("--ints2", list(parser.get(&i4)?)),
        ("--ints3", list(parser.get(&i5)?)),
        ("--string", parser.get(&s)?.clone()),
        ("--string2", parser.get(&s2)?.clone()),
        ("--strings", list(parser.get(&s3)?)),
        ("--strings2", list(parser.get(&s4)?)),
        ("--strings3", list(parser.get(&s5)?)),
    ];
    for (name, value) in lines {
        println!("{}: {}", name, value);
    }
    Ok(())
}
