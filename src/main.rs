use std::path::PathBuf;
use std::process::ExitCode;

use aes256_crypt::cli::{self, Options, Target};
use aes256_crypt::{logging, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};
use colored::Colorize;

#[derive(Parser)]
#[command(name = "aes256")]
#[command(version)]
#[command(
    about = "Encrypt and decrypt strings or files with a password-derived AES key",
    long_about = None
)]
struct Cli {
    /// Path to the JSON profile
    #[arg(short, long, global = true, env = "AES256_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a string or a file
    Encrypt(TransformArgs),

    /// Decrypt a string or a file
    Decrypt(TransformArgs),

    /// Print the reference profile as JSON
    Config,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["string", "input_file"])
))]
struct TransformArgs {
    /// The string to encrypt, or the base64 payload to decrypt
    #[arg(short, long, conflicts_with_all = ["input_file", "output_file"])]
    string: Option<String>,

    /// File to read
    #[arg(short, long, requires = "output_file")]
    input_file: Option<PathBuf>,

    /// File to write
    #[arg(short, long, requires = "input_file")]
    output_file: Option<PathBuf>,

    /// User identifier used to derive the salt (prompted if omitted)
    #[arg(short, long = "user")]
    user: Option<String>,
}

impl TransformArgs {
    fn into_options(self, config_path: Option<PathBuf>) -> Options {
        let target = match (self.string, self.input_file, self.output_file) {
            (Some(s), _, _) => Target::String(s),
            (None, Some(input), Some(output)) => Target::Files { input, output },
            // clap's group and requires rules leave no other shape
            _ => unreachable!("argument group guarantees a target"),
        };

        Options {
            target,
            user_id: self.user,
            config_path,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Encrypt(args) => cli::encrypt::run(args.into_options(cli.config)),
        Commands::Decrypt(args) => cli::decrypt::run(args.into_options(cli.config)),
        Commands::Config => cli::show_config::run(),
    }
}
