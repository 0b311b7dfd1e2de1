pub mod dispatch;
pub mod media;
pub mod template;
pub mod types;
