pub mod api;
pub mod crud;

pub use api::api_routes;
pub use crud::crud_routes;
