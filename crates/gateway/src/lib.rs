//! MAISYS gateway: same-origin proxy routes for the chat surface.
//!
//! Two route families are served:
//!
//! - `/api/backend/{*path}` relays GET/POST/PUT/DELETE to the backend data
//!   service and propagates its failures as a JSON error envelope.
//! - `/api/llm/query` relays questions to the LLM gateway and never lets an
//!   upstream failure through: a [`DegradedResponsePolicy`] answers instead.
//!
//! [`DegradedResponsePolicy`]: mcore::DegradedResponsePolicy

pub use {
    config::{GatewayConfig, scaffold_config_dir},
    error::ProxyError,
    router::router,
    serve::{ServeHandle, serve, serve_with_state},
    state::Gateway,
};

pub mod backend;
pub mod config;
mod error;
pub mod llm;
mod router;
mod serve;
mod state;
