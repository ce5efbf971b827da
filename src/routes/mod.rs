pub mod admin_routes;
pub mod auth_routes;
pub mod extract;
pub mod forward_routes;
pub mod receiver_routes;
pub mod ws_routes;
