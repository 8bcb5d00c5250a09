pub mod admin;
pub mod auth;
pub mod cache_control;
pub mod catchers;
pub mod config;
pub mod error;
pub mod pages;
pub mod password;
pub mod processor;
pub mod routes;
pub mod server;
pub mod session;
pub mod store;

pub use shared::{models::*, error::*, validation::*};
