pub mod config;
pub mod predict;
pub mod service;

pub use config::{LogFormat, ServiceConfig};
pub use service::{AppState, build_router, create_app};
