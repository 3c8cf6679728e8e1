//! Aptime console library exports.

pub mod api_client;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod keys;
pub mod logging;
pub mod nav;
pub mod notifications;
pub mod persistence;
pub mod session;
pub mod state;
pub mod tasks;
pub mod theme;
pub mod views;
pub mod widgets;
