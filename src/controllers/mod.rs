pub mod booking_controller;
pub mod user_controller;
