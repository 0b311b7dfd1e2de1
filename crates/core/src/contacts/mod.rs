pub mod import;
pub mod model;
pub mod phone;
pub mod template;
