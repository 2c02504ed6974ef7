//! Interactive configuration for the server.
//!
//! Prompts for bind address and port before the server starts.

use dialoguer::{Confirm, Input};

use crate::ServerConfig;

/// Prompts for a bind address and port, starting from `defaults`.
///
/// Returns `None` if the user declines to start the server.
#[must_use]
pub fn prompt(defaults: ServerConfig) -> Option<ServerConfig> {
    println!("Missing Migrants API Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| defaults.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()
        .unwrap_or(defaults.port);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return None;
    }

    Some(ServerConfig {
        bind_addr,
        port,
        ..defaults
    })
}
