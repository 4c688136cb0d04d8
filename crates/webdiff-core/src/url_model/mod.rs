//! URL modeling: environment origins, page paths, and URL list filtering.

mod list;
mod origin;

pub use list::{dedupe, filter_valid, read_urls, split_lines, UrlList};
pub use origin::{path_of, sanitize_env_url};
