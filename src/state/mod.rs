pub mod auth;
pub mod history;
pub mod receiver;
