mod headers;
mod selection;

pub use self::headers::parse_headers;
pub use self::selection::{Selection, parse_selection_arg};
