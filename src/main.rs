//! CLI entry point for repopack

use std::io::{self, IsTerminal};
use std::path::{Component, Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use repopack::{
    Collaborators, ConfigLayer, IgnoreLayer, OutputLayer, Packager, print_json, print_summary,
    resolve_config,
};
use tracing_subscriber::EnvFilter;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "repopack")]
#[command(about = "Pack a repository into a single AI-friendly text file")]
#[command(version)]
struct Args {
    /// Directory to pack
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Output file path (relative to the directory unless absolute)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<String>,

    /// Additional ignore patterns, comma-separated
    #[arg(short = 'i', long = "ignore", value_delimiter = ',')]
    ignore: Vec<String>,

    /// Only pack files matching these patterns, comma-separated
    #[arg(long = "include", value_delimiter = ',')]
    include: Vec<String>,

    /// Path to a config file (default: repopack.config.json in the directory)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of largest files to list in the summary
    #[arg(long = "top-files-len", value_name = "N")]
    top_files_len: Option<usize>,

    /// Prefix each line of packed content with its line number
    #[arg(long = "output-show-line-numbers")]
    show_line_numbers: bool,

    /// Do not apply the built-in ignore patterns
    #[arg(long = "no-default-patterns")]
    no_default_patterns: bool,

    /// Do not read .gitignore files
    #[arg(long = "no-gitignore")]
    no_gitignore: bool,

    /// Number of parallel workers for scanning and processing
    /// (0 = auto-detect, 1 = sequential, N = use N workers)
    #[arg(short = 'j', long = "jobs", default_value = "0")]
    jobs: usize,

    /// Print the pack result as JSON instead of the summary
    #[arg(long = "json")]
    json: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Log every file selection decision to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    /// Only flags the user actually passed end up in the layer.
    fn config_layer(&self) -> ConfigLayer {
        let output = OutputLayer {
            file_path: self.output.clone(),
            show_line_numbers: self.show_line_numbers.then_some(true),
            top_files_length: self.top_files_len,
            ..Default::default()
        };
        let ignore = IgnoreLayer {
            use_gitignore: self.no_gitignore.then_some(false),
            use_default_patterns: self.no_default_patterns.then_some(false),
            custom_patterns: (!self.ignore.is_empty()).then(|| self.ignore.clone()),
        };
        ConfigLayer {
            output: Some(output),
            ignore: Some(ignore),
            include: (!self.include.is_empty()).then(|| self.include.clone()),
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("repopack=trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve `dir` against the working directory, folding away `.` and `..`
/// so absolute include paths can be compared against it.
fn resolve_root(dir: &Path) -> io::Result<PathBuf> {
    let joined = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()?.join(dir)
    };
    let mut root = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                root.pop();
            }
            other => root.push(other),
        }
    }
    Ok(root)
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let root = resolve_root(&args.directory).unwrap_or_else(|e| {
        eprintln!("repopack: failed to resolve {}: {}", args.directory.display(), e);
        process::exit(1);
    });

    let config = resolve_config(&root, args.config.as_deref(), args.config_layer())
        .unwrap_or_else(|e| {
            eprintln!("repopack: {}", e);
            process::exit(1);
        });

    let collaborators = Collaborators::production(&config.ignore);
    let result = Packager::new(&collaborators)
        .with_parallel_workers(args.jobs)
        .pack(&root, &config)
        .unwrap_or_else(|e| {
            eprintln!("repopack: {}", e);
            process::exit(1);
        });

    let printed = if args.json {
        print_json(&result)
    } else {
        print_summary(
            &result,
            &config.output.file_path,
            config.output.top_files_length,
            should_use_color(args.color),
        )
    };

    if let Err(e) = printed {
        eprintln!("repopack: error writing output: {}", e);
        process::exit(1);
    }
}
