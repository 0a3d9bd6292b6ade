//! Keeps the head's favicon links pointing at the configured icon
//!
//! Each sync removes every link whose rel mentions "icon" before inserting a
//! fresh set, so links never accumulate. The href carries a millisecond
//! timestamp so browsers that cache favicons aggressively refetch it.

use chrono::Utc;
use tracing::{debug, info};

use crate::constants::favicon;
use crate::dom::{Document, LinkElement};

fn mime_for(url: &str) -> Option<&'static str> {
    let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
    if path.ends_with(".png") {
        Some("image/png")
    } else if path.ends_with(".ico") {
        Some("image/x-icon")
    } else if path.ends_with(".svg") {
        Some("image/svg+xml")
    } else if path.ends_with(".jpg") || path.ends_with(".jpeg") {
        Some("image/jpeg")
    } else {
        None
    }
}

fn cache_busted(url: &str, stamp: i64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", url, separator, favicon::CACHE_BUST_PARAM, stamp)
}

#[derive(Debug, Default)]
pub struct FaviconSynchronizer {
    last_url: Option<String>,
    last_stamp: i64,
}

impl FaviconSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strictly increasing even when called twice within a millisecond
    fn next_stamp(&mut self) -> i64 {
        let stamp = Utc::now().timestamp_millis().max(self.last_stamp + 1);
        self.last_stamp = stamp;
        stamp
    }

    /// Point the favicon links at `url` if it changed since the last sync
    ///
    /// Absent or empty URLs are ignored, leaving whatever icon is present.
    /// Returns whether the head was rewritten.
    pub fn sync(&mut self, doc: &mut Document, url: Option<&str>) -> bool {
        let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
            return false;
        };

        if self.last_url.as_deref() == Some(url) {
            debug!(url = %url, "Favicon unchanged");
            return false;
        }

        let Some(head) = doc.head.as_mut() else {
            debug!("Document has no head, skipping favicon sync");
            return false;
        };

        let removed = head.remove_links_where_rel_contains(favicon::REL_MARKER);
        let stamp = self.next_stamp();
        let href = cache_busted(url, stamp);
        let mime = mime_for(url).map(str::to_string);

        for rel in favicon::RELS {
            head.push_link(LinkElement {
                rel: rel.to_string(),
                href: href.clone(),
                mime: mime.clone(),
            });
        }

        self.last_url = Some(url.to_string());
        info!(href = %href, removed = removed, "Favicon updated");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon_links(doc: &Document) -> Vec<LinkElement> {
        doc.head
            .as_ref()
            .unwrap()
            .links_where_rel_contains("icon")
            .cloned()
            .collect()
    }

    fn stamp_of(href: &str) -> i64 {
        let (_, stamp) = href.rsplit_once("?t=").unwrap();
        stamp.parse().unwrap()
    }

    #[test]
    fn test_successive_urls_replace_links_and_bust_cache() {
        let mut doc = Document::new();
        let mut sync = FaviconSynchronizer::new();

        assert!(sync.sync(&mut doc, Some("/a.png")));
        let first = icon_links(&doc);
        assert_eq!(first.len(), favicon::RELS.len());

        assert!(sync.sync(&mut doc, Some("/b.png")));
        let second = icon_links(&doc);
        assert_eq!(second.len(), favicon::RELS.len());

        for link in &second {
            assert!(link.href.starts_with("/b.png?t="));
            assert_eq!(link.mime.as_deref(), Some("image/png"));
        }
        assert!(stamp_of(&second[0].href) > stamp_of(&first[0].href));
    }

    #[test]
    fn test_inserts_generic_and_apple_touch_links() {
        let mut doc = Document::new();
        let mut sync = FaviconSynchronizer::new();
        sync.sync(&mut doc, Some("https://cdn.example.com/fav.ico"));

        let rels: Vec<String> = icon_links(&doc).into_iter().map(|l| l.rel).collect();
        assert!(rels.contains(&"icon".to_string()));
        assert!(rels.contains(&"apple-touch-icon".to_string()));
    }

    #[test]
    fn test_removes_preexisting_icons_but_keeps_other_links() {
        let mut doc = Document::new();
        let head = doc.head.as_mut().unwrap();
        head.push_link(LinkElement {
            rel: "shortcut icon".to_string(),
            href: "/static/favicon.ico".to_string(),
            mime: None,
        });
        head.push_link(LinkElement {
            rel: "stylesheet".to_string(),
            href: "/static/app.css".to_string(),
            mime: None,
        });

        FaviconSynchronizer::new().sync(&mut doc, Some("/media/new.png"));

        let head = doc.head.as_ref().unwrap();
        assert_eq!(head.links.iter().filter(|l| l.rel == "stylesheet").count(), 1);
        assert!(head.links.iter().all(|l| !l.href.starts_with("/static/favicon.ico")));
    }

    #[test]
    fn test_empty_url_is_noop() {
        let mut doc = Document::new();
        let mut sync = FaviconSynchronizer::new();
        sync.sync(&mut doc, Some("/a.png"));
        let before = doc.clone();

        assert!(!sync.sync(&mut doc, None));
        assert!(!sync.sync(&mut doc, Some("")));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_unchanged_url_is_noop() {
        let mut doc = Document::new();
        let mut sync = FaviconSynchronizer::new();
        sync.sync(&mut doc, Some("/a.png"));
        let before = doc.clone();

        assert!(!sync.sync(&mut doc, Some("/a.png")));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_existing_query_uses_ampersand() {
        assert_eq!(cache_busted("/f.png?v=2", 5), "/f.png?v=2&t=5");
        assert_eq!(cache_busted("/f.png", 5), "/f.png?t=5");
    }

    #[test]
    fn test_missing_head_is_tolerated() {
        let mut doc = Document::bare();
        assert!(!FaviconSynchronizer::new().sync(&mut doc, Some("/a.png")));
        assert!(doc.head.is_none());
    }
}
