pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod facts;
pub mod guard;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
