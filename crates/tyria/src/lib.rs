//! `tyria` command line tool. Fetches resources from the Guild Wars 2 API and prints them as json.
pub mod cli;
pub mod config;
pub mod init;
pub mod trace;

pub mod prelude {
    pub use miette::{bail, Context, IntoDiagnostic, Result};
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::Value;
    pub use tracing::{debug, error, info, warn};
}
