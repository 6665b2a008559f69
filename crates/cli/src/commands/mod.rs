pub mod confluence;
pub mod content;
pub mod gist;
