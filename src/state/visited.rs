use std::collections::HashSet;
use std::sync::Mutex;

/// Thread-safe set of absolute URL strings
///
/// The frontier owns one instance to decide which URLs are dispatched for
/// fetching; the emitter owns a separate one for `-unique` output. The only
/// mutation is [`VisitedSet::insert_new`], an atomic test-and-insert, so two
/// callers can never both win the race for the same URL.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the URL if absent
    ///
    /// # Returns
    ///
    /// * `true` - The URL was not present and has now been recorded
    /// * `false` - The URL had already been recorded
    pub fn insert_new(&self, url: &str) -> bool {
        let mut urls = self.urls.lock().unwrap_or_else(|e| e.into_inner());
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    /// Returns true if the URL has been recorded
    pub fn contains(&self, url: &str) -> bool {
        self.urls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(url)
    }

    /// Number of recorded URLs
    pub fn len(&self) -> usize {
        self.urls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Returns true if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
