use std::mem;

use crate::{EntryDecision, FilterReport, IdentifierSet};

/// Line fragment opening an entry.
pub const ENTRY_OPEN: &str = "<item>";
/// Line fragment closing an entry.
pub const ENTRY_CLOSE: &str = "</item>";
/// Attribute element marker; together with [`ID_DOMAIN_MARKER`] it flags the
/// line holding the entry identifier.
pub const ATTR_MARKER: &str = ":attr";
pub const ID_DOMAIN_MARKER: &str = "imdb";

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Outside,
    InsideEntry {
        held: String,
        identifier: Option<String>,
    },
}

/// Result of running a whole document through [`FeedFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredFeed {
    pub document: String,
    pub report: FilterReport,
}

/// Streaming filter that keeps only entries whose identifier is in the set.
///
/// Entries are buffered until their close marker arrives and are then either
/// flushed whole or dropped whole. Everything outside entries passes through.
/// Each emitted line is terminated with `\n`.
pub struct FeedFilter<'a> {
    ids: &'a IdentifierSet,
    state: State,
    output: String,
    report: FilterReport,
}

impl<'a> FeedFilter<'a> {
    pub fn new(ids: &'a IdentifierSet) -> Self {
        Self {
            ids,
            state: State::Outside,
            output: String::new(),
            report: FilterReport::default(),
        }
    }

    pub fn push_line(&mut self, line: &str) {
        match &mut self.state {
            State::Outside => {
                if line.contains(ENTRY_OPEN) {
                    let mut held = String::with_capacity(line.len() + 1);
                    push_terminated(&mut held, line);
                    self.state = State::InsideEntry {
                        held,
                        identifier: None,
                    };
                } else {
                    push_terminated(&mut self.output, line);
                }
            }
            State::InsideEntry { held, identifier } => {
                if line.contains(ENTRY_CLOSE) {
                    let held = mem::take(held);
                    let identifier = identifier.take();
                    self.state = State::Outside;
                    self.close_entry(held, identifier, line);
                    return;
                }
                if line.contains(ATTR_MARKER) && line.contains(ID_DOMAIN_MARKER) {
                    // Lines with fewer than two quotes leave the held id as is.
                    if let Some(found) = extract_quoted_id(line) {
                        *identifier = Some(found.to_string());
                    }
                }
                push_terminated(held, line);
            }
        }
    }

    fn close_entry(&mut self, held: String, identifier: Option<String>, close_line: &str) {
        let kept = identifier
            .as_deref()
            .is_some_and(|id| !id.is_empty() && self.ids.contains(id));
        if kept {
            self.output.push_str(&held);
            push_terminated(&mut self.output, close_line);
        }
        self.report.decisions.push(EntryDecision { identifier, kept });
    }

    pub fn finish(mut self) -> FilteredFeed {
        if matches!(self.state, State::InsideEntry { .. }) {
            self.report.unterminated = true;
        }
        FilteredFeed {
            document: self.output,
            report: self.report,
        }
    }
}

/// Filter a complete feed document against `ids`.
pub fn filter_feed(feed: &str, ids: &IdentifierSet) -> FilteredFeed {
    let mut filter = FeedFilter::new(ids);
    for line in feed.lines() {
        filter.push_line(line);
    }
    filter.finish()
}

/// Value between the last two quote characters of `line`.
///
/// The opening quote is searched for strictly before the character preceding
/// the closing quote. When that search comes up empty, as with an empty `""`
/// that holds the only other quote, everything before the closing quote is
/// taken instead. `None` only when the line has fewer than two quotes.
pub fn extract_quoted_id(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    let end = bytes.iter().rposition(|&b| b == b'"')?;
    if !bytes[..end].contains(&b'"') {
        return None;
    }
    match bytes[..end - 1].iter().rposition(|&b| b == b'"') {
        Some(start) => Some(&line[start + 1..end]),
        None => Some(&line[..end]),
    }
}

fn push_terminated(buffer: &mut String, line: &str) {
    buffer.push_str(line);
    buffer.push('\n');
}

#[cfg(test)]
mod tests {
    use super::{extract_quoted_id, filter_feed, FeedFilter};
    use crate::IdentifierSet;

    #[test]
    fn quoted_id_takes_last_pair() {
        let line = r#"<newznab:attr name="imdb" value="0111161"/>"#;
        assert_eq!(extract_quoted_id(line), Some("0111161"));
    }

    #[test]
    fn quoted_id_needs_two_quotes() {
        assert_eq!(extract_quoted_id("no quotes here"), None);
        assert_eq!(extract_quoted_id(r#"one " only"#), None);
    }

    #[test]
    fn quoted_id_over_adjacent_empty_pair_runs_to_line_start() {
        assert_eq!(extract_quoted_id(r#"a="" b"#), Some(r#"a=""#));
        assert_eq!(extract_quoted_id(r#"x="1" y="""#), Some(" y="));
    }

    #[test]
    fn quoted_id_handles_multibyte_text() {
        assert_eq!(extract_quoted_id(r#"é="ü" imdb"#), Some("ü"));
    }

    #[test]
    fn later_attribute_line_overwrites_identifier() {
        let ids: IdentifierSet = ["2"].into_iter().collect();
        let feed = "<item>\n<a:attr name=\"imdb\" value=\"1\"/>\n<a:attr name=\"imdb\" value=\"2\"/>\n</item>\n";
        let out = filter_feed(feed, &ids);
        assert_eq!(out.document, feed);
        assert_eq!(out.report.decisions[0].identifier.as_deref(), Some("2"));
    }

    #[test]
    fn empty_attribute_value_replaces_earlier_identifier() {
        let ids: IdentifierSet = ["1"].into_iter().collect();
        let feed = "<item>\n<a:attr name=\"imdb\" value=\"1\"/>\n<a:attr imdb value=\"\"/>\n</item>\n";
        let out = filter_feed(feed, &ids);
        assert_eq!(out.document, "");
        assert!(!out.report.decisions[0].kept);
        assert_eq!(
            out.report.decisions[0].identifier.as_deref(),
            Some(r#"<a:attr imdb value=""#)
        );
    }

    #[test]
    fn unterminated_entry_is_flagged() {
        let ids: IdentifierSet = ["1"].into_iter().collect();
        let mut filter = FeedFilter::new(&ids);
        filter.push_line("<rss>");
        filter.push_line("<item>");
        filter.push_line(r#"<a:attr name="imdb" value="1"/>"#);
        let out = filter.finish();
        assert_eq!(out.document, "<rss>\n");
        assert!(out.report.unterminated);
        assert!(out.report.decisions.is_empty());
    }
}
