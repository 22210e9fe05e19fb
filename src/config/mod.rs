mod app_config;
mod aws;

pub use app_config::{
    AppConfig, CorsConfig, DatabaseConfig, ServerConfig, StorageConfig, DB_URL_PLACEHOLDER,
};
pub use aws::*;
