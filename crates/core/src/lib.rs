pub mod camera;
pub mod filtering;
pub mod pipeline;
pub mod settings;
pub mod shared;
pub mod storage;
