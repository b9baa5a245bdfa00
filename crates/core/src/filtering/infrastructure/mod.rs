pub mod comic_filter;
pub mod crystallize_filter;
pub mod filter_factory;
mod gaussian;
pub mod gaussian_blur_filter;
