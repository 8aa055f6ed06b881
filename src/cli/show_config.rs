//! `aes256 config`: print the reference profile and where it would be read from

use colored::Colorize;

use crate::config::{self, CharacterSets};
use crate::error::Result;

/// Print the reference profile, the salter charsets and the lookup order
pub fn run() -> Result<()> {
    println!("{}", config::default_config_json()?);

    eprintln!();
    eprintln!("{}", "Profile lookup order:".cyan().bold());
    eprintln!("  1. --config <path> or AES256_CONFIG");
    eprintln!("  2. {}", config::get_local_config_path().display());
    if let Some(user) = config::get_user_config_path() {
        eprintln!("  3. {}", user.display());
    }

    eprintln!();
    eprintln!("{}", "Salter character sets:".cyan().bold());
    eprintln!("  {}", supported_charsets(&CharacterSets::default()));

    Ok(())
}

fn supported_charsets(charsets: &CharacterSets) -> String {
    charsets.iter().collect::<Vec<_>>().join(", ")
}
