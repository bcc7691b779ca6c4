//! Utility functions for common operations.
//!
//! - **URL validation**: only plain web links are handed to the system browser
//! - **Text processing**: Unicode-aware width, truncation, line clamping and
//!   control-character stripping for API-supplied text
//!
//! # Examples
//!
//! ```
//! use newsdeck::util::{display_width, truncate_to_width, wrap_clamped};
//!
//! assert_eq!(display_width("Hello"), 5);
//! assert_eq!(truncate_to_width("Long story title", 10), "Long st...");
//! assert_eq!(wrap_clamped("a b c", 3, 2), vec!["a b", "c"]);
//! ```

mod text;
mod url_validator;

pub use text::{display_width, strip_control_chars, truncate_to_width, wrap_clamped};
pub use url_validator::{validate_url_for_open, UrlValidationError};
