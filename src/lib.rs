pub mod api;
pub mod cli;
pub mod collection;
pub mod config;
pub mod gateway;
pub mod models;
pub mod session;
pub mod workflow;
