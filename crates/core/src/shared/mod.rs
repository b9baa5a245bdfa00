pub mod constants;
pub mod error;
pub mod frame;
pub mod orientation;
pub mod processed_frame;
