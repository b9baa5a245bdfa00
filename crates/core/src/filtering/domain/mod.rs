pub mod filter_kind;
pub mod filter_selector;
pub mod image_filter;
