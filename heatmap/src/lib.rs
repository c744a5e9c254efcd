pub mod app;
pub mod collaborator;
pub mod config;
pub mod output;
