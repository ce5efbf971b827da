pub mod device_service;
pub mod forward_service;
pub mod notification_service;
pub mod ws_registry;
