mod base_url;
mod email;
mod non_empty;
mod non_empty_string;

pub use base_url::*;
pub use email::*;
pub use non_empty::*;
pub use non_empty_string::*;
