pub mod camera_session;
pub mod frame_processor;
pub mod infrastructure;
pub mod session_logger;
