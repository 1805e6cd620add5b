pub mod api;
pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod meals;
pub mod query;
pub mod state;
pub mod store;
pub mod ui;
