//! `aes256 encrypt`

use colored::Colorize;
use tracing::info;

use crate::config;
use crate::error::Result;
use crate::transform::{Credentials, FileTransform, StringTransform};

use super::{prompt_new_password, prompt_user_id, report_file_outcome, Options, Target};

/// Encrypt a string or file, prompting for what is missing
pub fn run(options: Options) -> Result<()> {
    let config = config::load_config(options.config_path.as_deref())?;

    let user_id = prompt_user_id(options.user_id.as_deref())?;
    let password = prompt_new_password(config.password_minimum_length())?;
    let credentials = Credentials::from_secret(password, user_id);

    match options.target {
        Target::String(plaintext) => {
            info!("encrypting string");
            let payload = StringTransform::new(&config).encrypt(credentials, &plaintext)?;
            println!("{}", "Encrypted:".cyan().bold());
            println!("{}", payload);
        }
        Target::Files { input, output } => {
            let outcome = FileTransform::new(&config).encrypt(credentials, &input, &output)?;
            report_file_outcome("Encrypted", &input, &output, &outcome);
        }
    }

    Ok(())
}
