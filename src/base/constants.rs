//! Naming constants shared by identity computation and scope resolution.

/// Separator between the segments of a Local or Global ID.
pub const ID_SEPARATOR: char = '.';

/// Replacement for characters that may not appear inside a single id segment.
pub const ID_REPLACEMENT: char = '_';

/// File name marker for documents that only exist as synthetic containers.
pub const SYNTHETIC_MARKER: &str = "synthetic";

/// Join two id fragments with [`ID_SEPARATOR`].
pub fn combine_ids(outer: &str, inner: &str) -> String {
    let mut out = String::with_capacity(outer.len() + inner.len() + 1);
    out.push_str(outer);
    out.push(ID_SEPARATOR);
    out.push_str(inner);
    out
}

/// Number of qualification segments in an id (`a.b.c` has 3).
pub fn segment_count(id: &str) -> usize {
    id.split(ID_SEPARATOR).count()
}

/// Normalize a proposed id so it forms a single segment.
///
/// Separators, whitespace and anything that is not an identifier character
/// (or `-`) become [`ID_REPLACEMENT`].
pub fn normalize_id(proposal: &str) -> String {
    proposal
        .chars()
        .map(|c| {
            if c == '-' || c == '_' || unicode_ident::is_xid_continue(c) {
                c
            } else {
                ID_REPLACEMENT
            }
        })
        .collect()
}
