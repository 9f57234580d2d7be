//! Command-line argument parsing for the agent-console CLI.
//!
//! Arguments are parsed by hand; the surface is small enough that a
//! parser crate would add more than it saves.

use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

use crate::traits::{Headers, Method};

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Store credentials obtained elsewhere
    Login {
        access_token: String,
        refresh_token: String,
    },
    /// Clear stored credentials
    Logout,
    /// Report whether credentials are stored
    Status,
    /// Authenticated JSON call
    Call {
        method: Method,
        path: String,
        headers: Headers,
        body: Option<Value>,
    },
    /// Authenticated multipart upload
    Upload { path: String, fields: Vec<FormField> },
}

/// One `field=value` or `field=@file` upload argument.
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    Text { name: String, value: String },
    File { name: String, path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("Invalid header '{0}', expected name:value")]
    InvalidHeader(String),

    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("Invalid form field '{0}', expected name=value or name=@file")]
    InvalidField(String),
}

pub const USAGE: &str = "\
Usage: agent-console <command> [args]

Commands:
  login <access-token> <refresh-token>   Store credentials
  logout                                 Clear stored credentials
  status                                 Show sign-in state
  get <path>                             GET a resource
  delete <path>                          DELETE a resource
  post|put|patch <path> [json]           Send a JSON body
  upload <path> name=value|name=@file... Multipart upload

Options:
  -H name:value    Add a request header (repeatable)
  -V, --version    Print version
  -h, --help       Print this help

Environment:
  AGENT_CONSOLE_API_URL        API base URL
  AGENT_CONSOLE_CREDENTIALS    Credentials file
  AGENT_CONSOLE_TIMEOUT_SECS   Request timeout in seconds
  AGENT_CONSOLE_OPEN_BROWSER   Open the sign-in page on logout (1/true)
  RUST_LOG                     Log filter (default: warn)";

/// Parse command-line arguments.
///
/// The first item is the program name and is skipped. No command at all
/// means [`CliCommand::Help`].
///
/// ```
/// use agent_console::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["agent-console".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut headers = Headers::new();
    let mut positional = Vec::new();

    let mut args = args.skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "-H" | "--header" => {
                let raw = args.next().ok_or(ArgsError::MissingArgument("header"))?;
                let (name, value) = parse_header(&raw)?;
                headers.insert(name, value);
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let Some(command) = positional.next() else {
        return Ok(CliCommand::Help);
    };

    let parsed = match command.as_str() {
        "login" => CliCommand::Login {
            access_token: positional
                .next()
                .ok_or(ArgsError::MissingArgument("access-token"))?,
            refresh_token: positional
                .next()
                .ok_or(ArgsError::MissingArgument("refresh-token"))?,
        },
        "logout" => CliCommand::Logout,
        "status" => CliCommand::Status,
        "get" | "delete" => CliCommand::Call {
            method: if command == "get" {
                Method::Get
            } else {
                Method::Delete
            },
            path: positional.next().ok_or(ArgsError::MissingArgument("path"))?,
            headers,
            body: None,
        },
        "post" | "put" | "patch" => {
            let method = match command.as_str() {
                "post" => Method::Post,
                "put" => Method::Put,
                _ => Method::Patch,
            };
            let path = positional.next().ok_or(ArgsError::MissingArgument("path"))?;
            let body = positional
                .next()
                .map(|raw| {
                    serde_json::from_str(&raw).map_err(|e| ArgsError::InvalidJson(e.to_string()))
                })
                .transpose()?;
            CliCommand::Call {
                method,
                path,
                headers,
                body,
            }
        }
        "upload" => {
            let path = positional.next().ok_or(ArgsError::MissingArgument("path"))?;
            let fields = positional
                .by_ref()
                .map(|raw| parse_field(&raw))
                .collect::<Result<Vec<_>, _>>()?;
            if fields.is_empty() {
                return Err(ArgsError::MissingArgument("form field"));
            }
            CliCommand::Upload { path, fields }
        }
        other => return Err(ArgsError::UnknownCommand(other.to_string())),
    };

    if let Some(extra) = positional.next() {
        return Err(ArgsError::UnexpectedArgument(extra));
    }
    Ok(parsed)
}

fn parse_header(raw: &str) -> Result<(String, String), ArgsError> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(ArgsError::InvalidHeader(raw.to_string())),
    }
}

fn parse_field(raw: &str) -> Result<FormField, ArgsError> {
    let (name, value) = raw
        .split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| ArgsError::InvalidField(raw.to_string()))?;

    Ok(match value.strip_prefix('@') {
        Some(path) if !path.is_empty() => FormField::File {
            name: name.to_string(),
            path: PathBuf::from(path),
        },
        Some(_) => return Err(ArgsError::InvalidField(raw.to_string())),
        None => FormField::Text {
            name: name.to_string(),
            value: value.to_string(),
        },
    })
}
