//! Query option formatting.

use std::collections::HashMap;
use std::hash::BuildHasher;

/// Extra query parameters forwarded to an endpoint (e.g. `language`, `page`).
pub type Options = HashMap<String, String>;

/// Renders options as `&key=value` pairs with percent-encoded values.
///
/// Pairs follow the map's iteration order; TMDB does not depend on
/// parameter order.
#[must_use]
pub fn fmt_options<S: BuildHasher>(options: &HashMap<String, String, S>) -> String {
    options
        .iter()
        .map(|(key, value)| format!("&{key}={}", urlencoding::encode(value)))
        .collect()
}
