//! `aes256 decrypt`

use colored::Colorize;
use tracing::info;

use crate::config;
use crate::error::Result;
use crate::transform::{Credentials, FileTransform, StringTransform};

use super::{prompt_password, prompt_user_id, report_file_outcome, Options, Target};

/// Decrypt a string or file, prompting for what is missing
pub fn run(options: Options) -> Result<()> {
    let config = config::load_config(options.config_path.as_deref())?;

    let user_id = prompt_user_id(options.user_id.as_deref())?;
    let password = prompt_password()?;
    let credentials = Credentials::from_secret(password, user_id);

    match options.target {
        Target::String(payload) => {
            info!("decrypting string");
            let plaintext = StringTransform::new(&config).decrypt(credentials, &payload)?;
            println!("{}", "Decrypted:".cyan().bold());
            println!("{}", plaintext);
        }
        Target::Files { input, output } => {
            let outcome = FileTransform::new(&config).decrypt(credentials, &input, &output)?;
            report_file_outcome("Decrypted", &input, &output, &outcome);
        }
    }

    Ok(())
}
