pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};

pub use adapters::{http::HttpCatalogClient, output::OutputFormat, view::SelectorState};
pub use app::session::Session;
pub use config::{ClientSettings, LogFormat};
pub use core::controller::CascadingSelector;
pub use utils::error::{CatalogError, Result};
