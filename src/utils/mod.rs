pub mod html;
pub mod logging;

pub use html::strip_tags;
pub use logging::truncate_text;
