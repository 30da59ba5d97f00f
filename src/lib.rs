// ABOUTME: Library crate for ckl exposing the checklist runner and container wrapper for testing

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod docker;
pub mod models;
pub mod parser;
pub mod session;
