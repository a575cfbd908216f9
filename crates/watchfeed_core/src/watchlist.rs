use crate::IdentifierSet;

/// Leading text of a watchlist line that carries a title identifier.
pub const ID_SIGNATURE_START: &str = "            <guid>http://www.imdb.com/title/tt";
/// Trailing text closing the identifier element.
pub const ID_SIGNATURE_END: &str = "/</guid>";

/// Collect every identifier found on a signature line of the watchlist.
///
/// Lines that do not start with [`ID_SIGNATURE_START`] are skipped; an input
/// without any such line yields an empty set.
pub fn extract_ids(watchlist: &str) -> IdentifierSet {
    let mut ids = IdentifierSet::new();
    for line in watchlist.lines() {
        let Some(rest) = line.strip_prefix(ID_SIGNATURE_START) else {
            continue;
        };
        let id = rest
            .strip_suffix(ID_SIGNATURE_END)
            .unwrap_or_else(|| drop_tail(rest, ID_SIGNATURE_END.len()));
        if !id.is_empty() {
            ids.insert(id.to_string());
        }
    }
    ids
}

/// Cut `len` bytes off the end, backing up to a char boundary.
fn drop_tail(text: &str, len: usize) -> &str {
    let mut end = text.len().saturating_sub(len);
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
