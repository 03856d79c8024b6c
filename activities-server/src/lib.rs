pub mod activities;
pub mod config;
pub mod error;
pub mod mediator;
pub mod persistence;
pub mod records;
pub mod routes;
pub mod users;

pub use config::Config;
pub use error::{AppError, RestError, Result};
pub use mediator::Mediator;
pub use persistence::DataContext;
pub use routes::app;
