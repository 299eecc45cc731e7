pub mod credential;
pub mod image;
pub mod item;
pub mod ratio;
pub mod task;
pub mod tryon;
