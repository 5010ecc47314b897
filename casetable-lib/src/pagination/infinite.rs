//! Infinite-scroll pagination.

use log::debug;
use log::trace;

/// Callback asking the caller to fetch more rows.
pub type LoadMoreCallback = Box<dyn FnMut() + Send>;

/// Caller-driven infinite scroll.
///
/// Every filtered row is visible; the caller owns the cursor and appends rows
/// itself. The engine only decides *when* to ask for more: once per
/// hidden-to-visible transition of the scroll sentinel, and only while the
/// caller reports `has_more` and no load in flight.
pub struct InfiniteScroll {
    has_more: bool,
    is_loading_more: bool,
    sentinel_visible: bool,
    on_load_more: Option<LoadMoreCallback>,
}

impl InfiniteScroll {
    /// Creates the state with no callback registered.
    pub fn new(has_more: bool) -> Self {
        Self {
            has_more,
            is_loading_more: false,
            sentinel_visible: false,
            on_load_more: None,
        }
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading_more(&self) -> bool {
        self.is_loading_more
    }

    pub fn is_sentinel_visible(&self) -> bool {
        self.sentinel_visible
    }

    pub fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
    }

    pub fn set_loading_more(&mut self, loading: bool) {
        self.is_loading_more = loading;
    }

    /// Registers the load-more callback, replacing any previous one.
    pub fn set_on_load_more(&mut self, callback: LoadMoreCallback) {
        self.on_load_more = Some(callback);
    }

    /// Reports the sentinel's visibility.
    ///
    /// Returns `true` if the load-more callback fired.
    pub fn set_sentinel_visible(&mut self, visible: bool) -> bool {
        let became_visible = visible && !self.sentinel_visible;
        self.sentinel_visible = visible;
        if !became_visible {
            return false;
        }
        if !self.has_more || self.is_loading_more {
            trace!(
                "Sentinel visible, not loading (has_more={}, loading={})",
                self.has_more, self.is_loading_more
            );
            return false;
        }
        match self.on_load_more.as_mut() {
            Some(callback) => {
                debug!("Sentinel visible, requesting more rows");
                callback();
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for InfiniteScroll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfiniteScroll")
            .field("has_more", &self.has_more)
            .field("is_loading_more", &self.is_loading_more)
            .field("sentinel_visible", &self.sentinel_visible)
            .field("on_load_more", &self.on_load_more.is_some())
            .finish()
    }
}
