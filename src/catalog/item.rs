//! Catalog item representation.

use url::Url;

use crate::error::Result;
use crate::fs::naming::sanitize_display_name;

/// One downloadable file discovered in the listing.
///
/// Immutable once collected; owned exclusively by the [`crate::catalog::Catalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Deduplication identity: the absolute address with query and fragment
    /// stripped. Assumes the service never distinguishes items by query
    /// string alone.
    pub canonical_key: String,

    /// Address of the item's detail view.
    pub source_url: String,

    /// Filesystem-safe name the file is saved under.
    pub display_name: String,
}

impl Item {
    /// Build an item from a raw reference and the best name the view offered.
    ///
    /// `raw_href` is resolved against `base`; relative references on a
    /// rendered page are the norm, not an edge case. Falls back to the final
    /// path segment when the view offered no usable name.
    pub fn from_reference(base: &Url, raw_href: &str, name_hint: Option<&str>) -> Result<Item> {
        let resolved = base.join(raw_href)?;
        let mut canonical = resolved.clone();
        canonical.set_query(None);
        canonical.set_fragment(None);

        let name = match name_hint {
            Some(hint) if !hint.trim().is_empty() => hint.trim().to_string(),
            _ => final_path_segment(&canonical),
        };

        Ok(Item {
            canonical_key: canonical.to_string(),
            source_url: resolved.to_string(),
            display_name: sanitize_display_name(&name)?,
        })
    }
}

/// Last non-empty path segment, or the host when the path is bare.
fn final_path_segment(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .unwrap_or_else(|| url.host_str().unwrap_or("download").to_string())
}
