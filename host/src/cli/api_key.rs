//! api-key サブコマンド
//!
//! APIキーの保存・削除・確認。キーの値そのものは表示しない。

use crate::credentials::ApiKeys;
use clap::{Args, Subcommand};
use std::io::{BufRead, Write};

/// api-key サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ApiKeyArgs {
    /// Operation to run
    #[command(subcommand)]
    pub command: ApiKeyCommand,
}

/// API key operations
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyCommand {
    /// Store an API key (read from stdin when --key is omitted)
    Set {
        /// Service identifier, e.g. openai
        service: String,
        /// Key value
        #[arg(long)]
        key: Option<String>,
    },
    /// Remove a stored API key
    Delete {
        /// Service identifier
        service: String,
    },
    /// Print whether a key is stored
    Has {
        /// Service identifier
        service: String,
    },
    /// List known services and whether a key is stored
    List,
}

/// api-key コマンドを実行
pub fn execute<R: BufRead, W: Write>(
    api_keys: &ApiKeys,
    command: &ApiKeyCommand,
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        ApiKeyCommand::Set { service, key } => {
            let key = match key {
                Some(key) => key.clone(),
                None => {
                    let mut line = String::new();
                    input.read_line(&mut line)?;
                    line.trim_end_matches(&['\r', '\n'][..]).to_string()
                }
            };
            api_keys.set_api_key(service, &key)?;
            writeln!(out, "Stored API key for {}", service)?;
        }
        ApiKeyCommand::Delete { service } => {
            api_keys.delete_api_key(service)?;
            writeln!(out, "Deleted API key for {}", service)?;
        }
        ApiKeyCommand::Has { service } => {
            writeln!(out, "{}", api_keys.has_api_key(service)?)?;
        }
        ApiKeyCommand::List => {
            for entry in api_keys.list_api_key_services() {
                let status = if entry.has_key { "stored" } else { "not set" };
                writeln!(
                    out,
                    "{:<10} {:<10} {}",
                    entry.service, entry.display_name, status
                )?;
            }
        }
    }
    Ok(())
}
