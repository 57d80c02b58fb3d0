use thiserror::Error;

pub mod cart;
pub mod catalog;
pub mod products;
pub mod wishlist;

mod app_config;
mod config;

pub use app_config::{AppConfig, Environment};
pub use cart::{Cart, CartId, CartLine, ProductSnapshot};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::Product;
pub use wishlist::Wishlist;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
