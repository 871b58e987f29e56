pub mod admin;
pub mod entries;
pub mod error;
pub mod health;
pub mod users;

pub use error::AppError;
