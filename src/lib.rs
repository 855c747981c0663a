pub mod clients;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;
pub mod persona;
pub mod postprocess;
pub mod services;

pub use error::{AppError, Result};
