pub mod user;

pub use user::{UserError, UserService};
