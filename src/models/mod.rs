pub mod content;
pub mod request;

pub use content::*;
pub use request::*;
