//! # CLI Module
//!
//! Command implementations behind the `spotbot` binary. Each command reads
//! its settings from the environment (after [`crate::config::load_env`]),
//! reports progress through the colored logging macros and exits with a
//! non-zero status on fatal errors.
//!
//! ## Commands
//!
//! - [`serve`] - Performs the initial token refresh and runs the proxy API
//! - [`auth`] - Authorization code flow that yields a refresh token
//! - [`settings`] - Shows the effective configuration with secrets masked
//!
//! ## Usage Patterns
//!
//! ### Initial Setup
//! ```bash
//! spotbot auth --save     # Obtain and store SPOTIFY_API_REFRESH_TOKEN
//! spotbot config          # Check that nothing is missing
//! ```
//!
//! ### Running
//! ```bash
//! spotbot serve --port 8080
//! ```

mod auth;
mod serve;
mod settings;

pub use auth::auth;
pub use serve::serve;
pub use settings::settings;
