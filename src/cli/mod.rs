//! Command implementations and interactive prompts

pub mod decrypt;
pub mod encrypt;
pub mod show_config;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;
use secrecy::SecretString;
use zeroize::Zeroizing;

use crate::error::{CryptError, Result};
use crate::password;
use crate::transform::FileOutcome;

/// What a command should operate on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    String(String),
    Files { input: PathBuf, output: PathBuf },
}

/// Parsed options for one encrypt/decrypt run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub target: Target,
    pub user_id: Option<String>,
    pub config_path: Option<PathBuf>,
}

/// Use the identifier from the command line, or ask for it
pub fn prompt_user_id(given: Option<&str>) -> Result<String> {
    if let Some(id) = given {
        return Ok(id.to_string());
    }

    print!("Please enter your user ID: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let id = input.trim();

    if id.is_empty() {
        return Err(CryptError::Cancelled);
    }
    Ok(id.to_string())
}

/// Ask for a new password twice, re-prompting while it fails the policy
pub fn prompt_new_password(minimum_length: usize) -> Result<SecretString> {
    read_new_password(|prompt| rpassword::prompt_password(prompt), minimum_length)
}

/// Prompt loop behind [`prompt_new_password`], reading each answer through `read`
fn read_new_password<F>(mut read: F, minimum_length: usize) -> Result<SecretString>
where
    F: FnMut(&str) -> io::Result<String>,
{
    loop {
        let password = Zeroizing::new(read("Please enter your password: ")?);

        if password.is_empty() {
            return Err(CryptError::Cancelled);
        }

        if let Err(e) = password::validate(&password, minimum_length) {
            eprintln!("{} {}", "Error:".red(), e);
            continue;
        }

        let confirm = Zeroizing::new(read("Please re-enter your password: ")?);

        if *password != *confirm {
            return Err(CryptError::PasswordMismatch);
        }

        return Ok(SecretString::new(password.to_string()));
    }
}

/// Ask for an existing password
pub fn prompt_password() -> Result<SecretString> {
    let password = rpassword::prompt_password("Please enter your password: ")?;

    if password.is_empty() {
        return Err(CryptError::Cancelled);
    }
    Ok(SecretString::new(password))
}

/// Print the result of a file command
pub fn report_file_outcome(verb: &str, input: &Path, output: &Path, outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Completed { bytes_written, .. } => {
            println!(
                "{} '{}' -> '{}' ({} bytes)",
                format!("{}:", verb).green().bold(),
                input.display(),
                output.display(),
                bytes_written
            );
        }
        FileOutcome::InputNotFound(path) => {
            println!(
                "{} input file '{}' does not exist",
                "Warning:".yellow().bold(),
                path.display()
            );
        }
    }
}
