pub mod cancel;
pub mod normalizer;
pub mod prompt;
pub mod runway;
pub mod tryon;
