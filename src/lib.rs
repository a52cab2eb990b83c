//! Process monitor with an interactive dashboard and a threshold-alert daemon.

pub mod action;
pub mod alert;
pub mod app;
pub mod config;
pub mod daemon;
pub mod engine;
pub mod event;
pub mod format;
pub mod logging;
pub mod system;
pub mod ui;
