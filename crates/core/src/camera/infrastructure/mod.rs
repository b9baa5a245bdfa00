pub mod image_decoder;
pub mod still_image_camera;
