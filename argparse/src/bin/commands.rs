// Test binary: a small subcommand tree with global options

use std::io::Read;

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

fn run() -> Result<()> {
    let mut parser = Parser::new("repo", "Manages a toy repository");
    parser.require_command(CommandId::ROOT, true);

    let verbose = parser
        .root()
        .counter("v", "verbose", Options::new().help("Print more, may be repeated"));
    let dry_run = parser
        .root()
        .flag("n", "dry-run", Options::new().help("Do not change anything"));

    let init = parser.root().new_command("init", "Create a repository");
    let name = parser
        .scope(init)
        .string("", "name", Options::new().required().help("Repository name"));
    let layout = parser.scope(init).selector(
        "l",
        "layout",
        &["bare", "full"],
        Options::new().default_val("full").help("Directory layout"),
    );

    let add = parser.root().new_command("add", "Stage files");
    let files = parser.scope(add).files(
        "f",
        "files",
        OFlag::O_RDONLY,
        Mode::empty(),
        Options::new().required().nargs("+").help("Files to stage"),
    );
    let weight = parser
        .scope(add)
        .float("w", "weight", Options::new().default_val(1.0).help("Priority weight"));

    let log = parser.root().new_command("log", "Show history");
    let limit = parser.scope(log).int(
        "c",
        "count",
        Options::new()
            .nargs("?")
            .default_val(10)
            .validate(|args| match args.first().map(|a| a.parse::<i64>()) {
                Some(Ok(n)) if n < 1 => Err(format!("count must be positive, got {}", n).into()),
                _ => Ok(()),
            })
            .help("Number of entries"),
    );
    parser.scope(log).string(
        "",
        "format",
        Options::new().default_val("short").help(DISABLE_DESCRIPTION),
    );

    match parser.parse(std::env::args()) {
        Ok(Parsed::Complete) => {}
        Ok(Parsed::Help) => return Ok(()),
        Err(e) => {
            print!("{}", parser.usage_with(e));
            std::process::exit(1);
        }
    }

    println!("verbose: {}", parser.get(&verbose)?);
    println!("dry-run: {}", parser.get(&dry_run)?);
    if parser.invoked(init) {
        println!("init {} ({})", parser.get(&name)?, parser.get(&layout)?);
    } else if parser.invoked(add) {
        let weight = *parser.get(&weight)?;
        for mut file in parser.take(&files)? {
            let mut content = Vec::new();
            file.read_to_end(&mut content)?;
            println!("add {} bytes at weight {}", content.len(), weight);
        }
    } else if parser.invoked(log) {
        println!("log {}", parser.get(&limit)?);
    }
    Ok(())
}
