pub mod booking_lifecycle;
