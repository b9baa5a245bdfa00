pub mod photo_sink;
