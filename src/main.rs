use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use toolconfig::{
    render_editorconfig, render_toml, run, should_use_colors, Colors, ConfigNames, OutputMode,
    Resolver,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "toolconfig")]
#[command(
    version,
    about = "Get tool settings to apply to a particular file in a project"
)]
struct Cli {
    /// Absolute paths of files in the project (directories are expanded)
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Alternative name for .editorconfig files (testing only, changes output format)
    #[arg(short = 'f', long, value_name = "FILENAME", hide = true)]
    ec_filename: Option<String>,

    /// Log every directory consulted to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored error messages
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let colors = Colors::new(should_use_colors(cli.no_color));

    match execute(&cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {e}", colors.error("Error:"));
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "toolconfig=debug"
    } else {
        "toolconfig=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn execute(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    let mut names = ConfigNames::default();
    let mode = match &cli.ec_filename {
        Some(name) => {
            names = names.with_editor_name(name);
            OutputMode::EditorConfig
        }
        None => OutputMode::Toml,
    };

    let resolver = Resolver::new().with_names(names);
    let result = run(&cli.paths, &resolver)?;

    match mode {
        OutputMode::Toml => Ok(render_toml(&result.resolved)?),
        OutputMode::EditorConfig => {
            let mut files = result.resolved.values();
            match (files.next(), files.next()) {
                (Some(properties), None) => Ok(render_editorconfig(properties)),
                _ => Err("editorconfig test mode supports exactly one file".into()),
            }
        }
    }
}
