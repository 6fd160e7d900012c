pub mod action;
pub mod app;
pub mod config;
pub mod event;
pub mod headless;
pub mod logging;
pub mod system;
pub mod ui;
pub mod worker;
