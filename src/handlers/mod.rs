pub mod api;
pub mod crud;

pub use api::health_check;
