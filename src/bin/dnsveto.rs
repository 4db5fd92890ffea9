//! dnsveto: CLI tool for inspecting how domains will be classified.

use clap::{Parser, Subcommand};
use dnsveto::{CoreConfig, Sets};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dnsveto")]
#[command(version)]
#[command(about = "Check domains against layered allow/block lists", long_about = None)]
struct Cli {
    /// Read configuration from a YAML file instead of DNSVETO_* variables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a domain will be blocked
    Check {
        /// Domain to check
        domain: String,

        /// Silence verbose configuration output
        #[arg(short, long)]
        quiet: bool,

        /// Also check against the default remote block lists
        #[arg(short, long)]
        defaults: bool,
    },

    /// Print the effective configuration as YAML
    Config,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            domain,
            quiet,
            defaults,
        } => check(cli.config, &domain, quiet, defaults),
        Commands::Config => show_config(cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<PathBuf>) -> dnsveto::Result<CoreConfig> {
    let mut config = match path {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::from_env()?,
    };
    config.apply_defaults();
    Ok(config)
}

fn check(path: Option<PathBuf>, domain: &str, quiet: bool, defaults: bool) -> dnsveto::Result<()> {
    let mut config = load_config(path)?;
    config.no_defaults = !defaults;
    config.validate()?;

    if !quiet {
        config.log();
    }

    let sets = Sets::new(config)?;
    println!("{}", sets.classify(domain).describe(domain));
    Ok(())
}

fn show_config(path: Option<PathBuf>) -> dnsveto::Result<()> {
    let config = load_config(path)?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
