pub mod booking_dto;
pub mod user_dto;
