//! CLI for the agent-console API client.
//!
//! ```ignore
//! use agent_console::cli::{parse_args, run_command};
//!
//! let command = parse_args(std::env::args())?;
//! if let Some(output) = run_command(&client, command).await? {
//!     println!("{}", serde_json::to_string_pretty(&output)?);
//! }
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, FormField, USAGE};
pub use version::{version_line, VERSION};

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use serde_json::{json, Value};

use crate::api::{ApiClient, RequestOptions};
use crate::auth::access_token_expires_in;
use crate::traits::FormData;

/// Run a parsed command against `client`.
///
/// Returns the JSON to print, or `None` when there is nothing to print.
/// `Version` and `Help` are handled by the caller before a client exists;
/// here they print nothing.
pub async fn run_command(client: &ApiClient, command: CliCommand) -> Result<Option<Value>> {
    match command {
        CliCommand::Version | CliCommand::Help => Ok(None),
        CliCommand::Login {
            access_token,
            refresh_token,
        } => {
            client.sign_in(&access_token, &refresh_token);
            Ok(Some(status(client)))
        }
        CliCommand::Logout => {
            client.sign_out();
            Ok(Some(status(client)))
        }
        CliCommand::Status => Ok(Some(status(client))),
        CliCommand::Call {
            method,
            path,
            headers,
            body,
        } => {
            let mut options = RequestOptions::new().method(method);
            options.headers = headers;
            options.body = body;
            let value = client
                .call(&path, options)
                .await
                .map_err(|e| eyre!(e.user_message()))
                .wrap_err_with(|| format!("{} {} failed", method, path))?;
            Ok(Some(value))
        }
        CliCommand::Upload { path, fields } => {
            let form = build_form(fields)?;
            let value = client
                .upload(&path, form)
                .await
                .map_err(|e| eyre!(e.user_message()))
                .wrap_err_with(|| format!("Upload to {} failed", path))?;
            Ok(Some(value))
        }
    }
}

fn status(client: &ApiClient) -> Value {
    let expires_in = client
        .access_token()
        .as_deref()
        .and_then(access_token_expires_in);
    json!({
        "authenticated": client.is_authenticated(),
        "apiUrl": client.config().base_url,
        "expiresIn": expires_in,
    })
}

fn build_form(fields: Vec<FormField>) -> Result<FormData> {
    let mut form = FormData::new();
    for field in fields {
        form = match field {
            FormField::Text { name, value } => form.text(name, value),
            FormField::File { name, path } => {
                let bytes = std::fs::read(&path)
                    .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| name.clone());
                let mime_type = mime_guess::from_path(&path).first().map(|m| m.to_string());
                form.file(name, file_name, mime_type, bytes)
            }
        };
    }
    Ok(form)
}
