use std::fs;

use tempfile::TempDir;
use watchfeed_engine::{FeedStore, StoreError};

#[test]
fn save_overwrites_input_when_output_is_the_same_path() {
    let temp = TempDir::new().unwrap();
    let feed = temp.path().join("feed.xml");
    fs::write(&feed, "<rss>\n<item>\n</item>\n</rss>\n").unwrap();

    let store = FeedStore::new(&feed, &feed);
    assert_eq!(store.output(), feed.as_path());
    let loaded = store.load().unwrap();
    assert!(loaded.text.contains("<item>"));
    assert_eq!(loaded.encoding().name(), "UTF-8");

    store
        .save(&loaded.with_text("<rss>\n</rss>\n".to_string()))
        .unwrap();
    assert_eq!(fs::read_to_string(&feed).unwrap(), "<rss>\n</rss>\n");
}

#[test]
fn alternate_output_leaves_input_untouched() {
    let temp = TempDir::new().unwrap();
    let feed = temp.path().join("feed.xml");
    let out = temp.path().join("filtered").join("feed.xml");
    fs::write(&feed, "original").unwrap();

    let store = FeedStore::new(&feed, &out);
    let loaded = store.load().unwrap();
    let written = store.save(&loaded.with_text("filtered".to_string())).unwrap();

    assert_eq!(written, out);
    assert_eq!(fs::read_to_string(&out).unwrap(), "filtered");
    assert_eq!(fs::read_to_string(&feed).unwrap(), "original");
}

#[test]
fn latin1_feed_is_written_back_in_latin1() {
    let temp = TempDir::new().unwrap();
    let feed = temp.path().join("feed.xml");
    let raw: &[u8] = b"<rss>\n<title>Le fabuleux destin d'Am\xe9lie Poulain, \xe0 la carte</title>\n</rss>\n";
    fs::write(&feed, raw).unwrap();

    let store = FeedStore::new(&feed, &feed);
    let loaded = store.load().unwrap();
    assert!(loaded.text.starts_with("<rss>\n<title>Le fabuleux destin"));
    assert_ne!(loaded.encoding().name(), "UTF-8");

    let text = loaded.text.clone();
    store.save(&loaded.with_text(text)).unwrap();
    assert_eq!(fs::read(&feed).unwrap(), raw);
}

#[test]
fn utf8_bom_survives_a_rewrite() {
    let temp = TempDir::new().unwrap();
    let feed = temp.path().join("feed.xml");
    fs::write(&feed, b"\xEF\xBB\xBF<rss>\n</rss>\n").unwrap();

    let store = FeedStore::new(&feed, &feed);
    let loaded = store.load().unwrap();
    assert_eq!(loaded.text, "<rss>\n</rss>\n");

    store.save(&loaded.with_text("<rss/>\n".to_string())).unwrap();
    assert_eq!(fs::read(&feed).unwrap(), b"\xEF\xBB\xBF<rss/>\n");
}

#[test]
fn load_of_missing_file_is_read_error() {
    let temp = TempDir::new().unwrap();
    let absent = temp.path().join("absent.xml");
    let store = FeedStore::new(&absent, &absent);
    assert!(matches!(store.load(), Err(StoreError::Read { .. })));
}

#[test]
fn discard_primary_removes_existing_file_only() {
    let temp = TempDir::new().unwrap();
    let feed = temp.path().join("feed.xml");
    let out = temp.path().join("out.xml");
    fs::write(&feed, "x").unwrap();
    fs::write(&out, "y").unwrap();

    let store = FeedStore::new(&feed, &out);
    assert!(store.discard_primary().unwrap());
    assert!(!feed.exists());
    assert!(out.exists());
    assert!(!store.discard_primary().unwrap());
}
