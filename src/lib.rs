//! Layered nginx router configuration.
//!
//! Merges compiled-in defaults, deployment annotations and config map data
//! into one [`RouterConfig`], then renders it as `nginx.conf`.

pub mod config;
pub mod error;
pub mod observability;
pub mod reconcile;
pub mod template;

pub use config::{merge_router_config, merge_router_config_with, Precedence, RouterConfig};
pub use error::Error;
pub use reconcile::{reconcile, Reconciler};
pub use template::{render_config, write_config, NginxTemplate, RenderError};
