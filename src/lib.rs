pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::client::TransactionClient;
pub use domain::environment::Environment;
pub use error::{PaysafecardError, Result};
