pub mod capture_worker;
pub mod preview_worker;
