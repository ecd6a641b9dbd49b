//! Gradle script scanning.
//!
//! Neither Groovy nor Kotlin is parsed in full. The scanner tells code
//! from strings and comments and balances braces; the other modules match
//! a fixed set of statement shapes inside the blocks it finds.

pub mod includes;
pub mod properties;
pub mod scanner;
pub mod urls;

pub use includes::collect_applied_scripts;
pub use properties::{
    PropertyTable, extract_properties_from_script, has_unresolved_placeholder,
    parse_properties_from_args, read_properties_file, resolve_gradle_property,
};
pub use scanner::{extract_all_blocks, is_delimiter, is_whitespace};
pub use urls::find_urls_in_gradle_script;
