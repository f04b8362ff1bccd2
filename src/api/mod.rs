mod auth;
mod client;
mod error;
mod friends;
mod groups;
mod messages;
mod models;
#[cfg(test)]
pub mod testing;

pub use auth::*;
pub use client::ApiClient;
pub use error::ApiError;
pub use friends::*;
pub use groups::*;
pub use messages::*;
pub use models::*;
