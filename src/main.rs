use clap::Parser;
use macrostrip::config::Config;
use macrostrip::{ControlFlowBranch, StripError, StripOptions};
use regex::Regex;
use std::fs::{self, OpenOptions};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "macrostrip", about = "Strip macro blocks from C/C++.")]
struct Cli {
    /// File or directory to strip macros from (repeatable). Defaults to stdin.
    #[arg(short = 'f', long = "file")]
    files: Vec<PathBuf>,

    /// Print a description of found macros instead of stripping them
    #[arg(short, long)]
    describe: bool,

    /// Print the description as JSON (with --describe)
    #[arg(long, requires = "describe")]
    json: bool,

    /// The full #if statement of the macro to strip out
    #[arg(short = 'm', long = "macro")]
    target: String,

    /// Rewrite the file(s) in place
    #[arg(short, long)]
    in_place: bool,

    /// Remove macro lines instead of commenting them out
    #[arg(short, long)]
    remove: bool,

    /// Which branch of if / else blocks to delete or comment out: IF, ELSE or
    /// BOTH (default: ELSE). Only applies to blocks that have an #else.
    #[arg(short, long, value_parser = parse_branch)]
    branch: Option<ControlFlowBranch>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log each block as it is found
    #[arg(short, long)]
    verbose: bool,
}

fn parse_branch(label: &str) -> Result<ControlFlowBranch, StripError> {
    label.parse()
}

fn die(msg: &str) -> ! {
    eprintln!("error: {}", msg);
    process::exit(1);
}

fn die_parse(source: &str, err: StripError) -> ! {
    die(&err.located(source))
}

/// Flag combinations clap cannot express on its own.
fn check_modes(cli: &Cli) -> Result<(), &'static str> {
    if cli.describe && cli.in_place {
        return Err("cannot use --in-place with --describe");
    }
    if cli.in_place && cli.files.is_empty() {
        return Err("cannot rewrite in place with stdio");
    }
    Ok(())
}

fn read_path(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| die(&format!("cannot read {}: {}", path.display(), e)))
}

fn report(cli: &Cli, source: &str, text: &str) -> String {
    let result = if cli.json {
        macrostrip::describe_json(text, &cli.target)
    } else {
        macrostrip::describe(text, &cli.target)
    };
    result.unwrap_or_else(|e| die_parse(source, e))
}

fn main() {
    let cli = Cli::parse();
    if let Err(msg) = check_modes(&cli) {
        die(msg);
    }

    let level = if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::from_default_env().filter_level(level).init();

    // Load config, then CLI overrides
    let mut config = Config::discover(cli.config.as_deref()).unwrap_or_else(|e| die(&e.to_string()));
    if let Some(b) = cli.branch {
        config.branch = b;
    }
    if cli.remove {
        config.remove = true;
    }
    let options = StripOptions::from_config(&config);

    if cli.files.is_empty() {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .unwrap_or_else(|e| die(&format!("cannot read stdin: {}", e)));
        if cli.describe {
            print!("{}", report(&cli, "<stdin>", &text));
        } else {
            let stripped = macrostrip::strip(&text, &cli.target, &options).unwrap_or_else(|e| die_parse("<stdin>", e));
            print!("{}", stripped.text);
        }
        return;
    }

    let pattern = Regex::new(&config.source_pattern)
        .unwrap_or_else(|e| die(&format!("invalid source_pattern: {}", e)));
    let files = macrostrip::sources::list_sources(&cli.files, &pattern).unwrap_or_else(|e| die(&format!("{}", e)));
    if files.is_empty() {
        die("no input files found");
    }

    if cli.describe {
        for fp in &files {
            let name = fp.display().to_string();
            if files.len() > 1 {
                println!("==> {} <==", name);
            }
            print!("{}", report(&cli, &name, &read_path(fp)));
        }
        return;
    }

    if cli.in_place {
        let mut total = 0;
        for fp in &files {
            let mut handle = OpenOptions::new()
                .read(true)
                .write(true)
                .open(fp)
                .unwrap_or_else(|e| die(&format!("cannot open {}: {}", fp.display(), e)));
            let name = fp.display().to_string();
            let count = macrostrip::replace(&mut handle, &cli.target, &options).unwrap_or_else(|e| die_parse(&name, e));
            log::info!("replaced {} macro blocks in {}", count, name);
            total += count;
        }
        if files.len() > 1 {
            log::info!("replaced {} macro blocks in {} file(s)", total, files.len());
        }
        return;
    }

    if files.len() > 1 {
        die("multiple input files need --in-place or --describe");
    }
    let name = files[0].display().to_string();
    let stripped =
        macrostrip::strip(&read_path(&files[0]), &cli.target, &options).unwrap_or_else(|e| die_parse(&name, e));
    print!("{}", stripped.text);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(["macrostrip", "-m", "#if TARGET"].iter().chain(args)).unwrap()
    }

    #[test]
    fn test_describe_with_in_place_rejected() {
        let err = check_modes(&cli(&["-f", "a.c", "-d", "-i"])).unwrap_err();
        assert_eq!(err, "cannot use --in-place with --describe");
    }

    #[test]
    fn test_in_place_needs_file() {
        assert_eq!(check_modes(&cli(&["-i"])), Err("cannot rewrite in place with stdio"));
    }

    #[test]
    fn test_plain_modes_accepted() {
        assert_eq!(check_modes(&cli(&[])), Ok(()));
        assert_eq!(check_modes(&cli(&["-f", "a.c", "-i", "-b", "both"])), Ok(()));
        assert_eq!(check_modes(&cli(&["-d", "--json"])), Ok(()));
    }

    #[test]
    fn test_unknown_branch_is_usage_error() {
        assert!(Cli::try_parse_from(["macrostrip", "-m", "#if X", "-b", "SOMETIMES"]).is_err());
    }
}
