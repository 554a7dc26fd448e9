//! Spotify bridge backend library
//!
//! This library implements a small HTTP backend that sits between a
//! conversational plugin and the Spotify Web API. Callers authenticate with a
//! single static bearer token; the backend keeps a Spotify access token alive
//! through the OAuth refresh-token grant and forwards each call to Spotify.
//!
//! # Modules
//!
//! - `api` - axum handlers, the bearer gate and the router
//! - `cli` - Command implementations behind the `spotbot` binary
//! - `config` - Environment loading and the startup credential store
//! - `error` - Error taxonomy and its HTTP mapping
//! - `lyrics` - lyrics.ovh lookup
//! - `management` - Access token lifecycle
//! - `server` - Listener setup for the API and the OAuth callback
//! - `spotify` - Spotify Web API client and resource operations
//! - `types` - Request and response payloads
//! - `utils` - Small helpers shared across modules
//!
//! # Example
//!
//! ```
//! use spotbot::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> spotbot::Res<()> {
//!     config::load_env().await?;
//!     cli::serve(None, None).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod lyrics;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the command layer where any error ends up printed to the console.
/// Request handlers use [`error::ApiError`] instead so that failures keep
/// their HTTP status.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line with a blue bullet and a UTC timestamp.
///
/// Accepts the same arguments as `println!`.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!(
      "{} [{}] {}",
      chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string().dimmed(),
      "o".blue().bold(),
      std::format_args!($($arg)*)
    );
  })
}

/// Prints a success line with a green checkmark and a UTC timestamp.
///
/// Used when a noteworthy operation completed, such as a token refresh.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!(
      "{} [{}] {}",
      chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string().dimmed(),
      "✓".green().bold(),
      std::format_args!($($arg)*)
    );
  })
}

/// Prints a fatal error to stderr and exits the process with code 1.
///
/// Only for unrecoverable startup failures: missing configuration, a failed
/// initial token refresh or a listener that cannot bind. Request handlers
/// never call this.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!(
      "{} [{}] {}",
      chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string().dimmed(),
      "!".red().bold(),
      std::format_args!($($arg)*)
    );
    std::process::exit(1);
  })
}

/// Prints a warning to stderr with a yellow exclamation mark.
///
/// Used for recoverable problems, including every request that ends in a
/// 500 response.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!(
      "{} [{}] {}",
      chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string().dimmed(),
      "!".yellow().bold(),
      std::format_args!($($arg)*)
    );
  })
}
