pub mod map;
pub mod popup;
pub mod tables;
pub mod wheel;
