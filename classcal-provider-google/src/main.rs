//! classcal-provider-google - Google Calendar provider for classcal
//!
//! Implements the classcal provider protocol: one JSON request per line on
//! stdin, one JSON response per line on stdout. Logs go to stderr.
//!
//! The provider manages its own credentials and sessions:
//!   ~/.config/classcal/providers/google/app_config.toml
//!   ~/.config/classcal/providers/google/session/{account}.toml

mod app_config;
mod commands;
mod convert;
mod remote_config;
mod session;

use anyhow::{Context, Result};
use classcal_core::remote::protocol::{Command, Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{self, BufRead, Write};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                log::error!("Failed to read stdin: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle_request(request).await,
            Err(e) => Response::error(&format!("Failed to parse request: {}", e)),
        };

        if writeln!(stdout, "{}", response)
            .and_then(|_| stdout.flush())
            .is_err()
        {
            // The caller hung up; nobody is left to answer.
            break;
        }
    }
}

async fn handle_request(request: Request) -> String {
    log::debug!("Handling {:?}", request.command);

    match request.command {
        Command::Authenticate => dispatch(request.params, commands::authenticate::handle).await,
        Command::Connect => dispatch(request.params, commands::connect::handle).await,
        Command::ListEvents => dispatch(request.params, commands::list_events::handle).await,
        Command::CreateEvent => dispatch(request.params, commands::create_event::handle).await,
        Command::DeleteEvent => dispatch(request.params, commands::delete_event::handle).await,
    }
}

async fn dispatch<C, T, F, Fut>(params: serde_json::Value, handler: F) -> String
where
    C: DeserializeOwned,
    T: Serialize,
    F: FnOnce(C) -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let result = async {
        let cmd: C = serde_json::from_value(params).context("Invalid params")?;
        handler(cmd).await
    }
    .await;

    match result {
        Ok(data) => Response::success(data),
        Err(e) => {
            log::warn!("{:#}", e);
            Response::error(&format!("{:#}", e))
        }
    }
}
