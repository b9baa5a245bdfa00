pub mod capture_device;
