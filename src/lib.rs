//! Metarouter: micro frontend composition
//!
//! Embeds independently deployed apps as frames inside one shell page and
//! keeps navigation consistent across them: a shell-side router, a guest-side
//! adapter, the message protocol between them, and the codec that packs every
//! outlet's route into the single shared location hash.

pub mod adapter;
pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod fragment;
pub mod logging;
pub mod protocol;
pub mod router;

pub use adapter::EmbeddedApp;
pub use config::{AppConfig, RouteDescriptor, RouterConfig};
pub use error::{ConfigError, RouteError};
pub use protocol::{Envelope, Message, OriginPolicy};
pub use router::ShellRouter;
