pub mod config;
pub mod error;
pub mod logger;
pub mod password;
pub mod validator;

pub use config::{load_config, AppConfig};
pub use error::ApiError;
pub use logger::init_logger;
pub use password::{hash_password, verify_password};
pub use validator::PHONE_REGEX;
