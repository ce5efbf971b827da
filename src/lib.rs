//! Mock servers for exercising a payment CLI.
//!
//! * the auth/notify mock: OAuth device-code login, token polling, a
//!   WebSocket push channel and a relay to the receiver;
//! * the receiver mock: a sink that keeps the last notifications it was
//!   sent and shows them on a page.

pub mod app;
pub mod clock;
pub mod config;
pub mod errors;
pub mod logging;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;
pub mod views;
