pub mod commands;
pub mod config;
pub mod connection;
pub mod entity;
pub mod error;
pub mod handler;
pub mod keyboards;
pub mod locks;
pub mod memberships;
pub mod migration;
pub mod platform;
pub mod router;
pub mod scheduler;
pub mod services;
pub mod triggers;
pub mod types;
pub mod webhook;

#[cfg(test)]
mod testing;
