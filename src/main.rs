use changelog::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "changelog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Parse Markdown changelogs and generate reference links", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: .changelog.toml in the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a changelog and summarize its versions
    Parse {
        /// Changelog file (default: configured input, CHANGELOG.md)
        file: Option<PathBuf>,

        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Show the changes of a single version
    Show {
        /// Version name, e.g. "1.2.0", "v1.2.0" or "Unreleased"
        version: String,

        /// Changelog file (default: configured input, CHANGELOG.md)
        file: Option<PathBuf>,

        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Resolve [#123], [abc1234], [@user] and [v1.2.3] into links
    Links(changelog::cli::links::LinksArgs),

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        generate(shell, &mut Cli::command(), "changelog", &mut io::stdout());
        return Ok(());
    }

    let config = changelog::cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse { file, json } => {
            let path = changelog::cli::resolve_input(file, &config);
            changelog::cli::parse::run(&path, json)?;
        }

        Commands::Show {
            version,
            file,
            json,
        } => {
            let path = changelog::cli::resolve_input(file, &config);
            changelog::cli::show::run(&path, &version, json)?;
        }

        Commands::Links(args) => {
            changelog::cli::links::run(args, &config)?;
        }

        Commands::Completions { .. } => {
            unreachable!("Completions are handled before config loading");
        }
    }

    Ok(())
}
