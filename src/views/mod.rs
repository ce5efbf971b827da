pub mod history_page;
pub mod verify_page;
