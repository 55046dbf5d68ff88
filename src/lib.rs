// Library exports for Tinta
// This allows integration tests and external code to use Tinta modules

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod mail;
pub mod pagination;
pub mod routes;
pub mod state;
