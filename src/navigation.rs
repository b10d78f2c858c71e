//! Navigation context tracking.
//!
//! Remembers the most recent navigation request so location-change
//! listeners can tell *why* the displayed location changed. The record is a
//! single slot: each request overwrites the previous one. A record older
//! than the configured TTL is treated as absent by every query, whether or
//! not `clear_stale_navigation_context` has run yet.
//!
//! Matching a record does not consume it. Several listeners reacting to the
//! same location change all observe the same record until it goes stale.

use std::time::{Duration, Instant};

/// Space id used when a location has no space (direct-message-like contexts)
pub const NO_SPACE: &str = "@me";

/// Normalize an optional space id, mapping "no space" to [`NO_SPACE`]
pub fn normalize_space_id(space_id: Option<&str>) -> String {
    match space_id {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => NO_SPACE.to_string(),
    }
}

/// What triggered a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationSource {
    /// A bookmark visited independently of the tab strip
    Bookmark,
    /// A tab switch
    Tab,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationContext {
    pub space_id: String,
    pub location_id: String,
    pub timestamp: Instant,
    pub source: NavigationSource,
}

impl NavigationContext {
    /// Whether the record is past its validity window at `now`
    pub fn is_stale(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.timestamp) > ttl
    }
}

#[derive(Debug, Clone)]
pub struct NavigationContextTracker {
    context: Option<NavigationContext>,
    ttl: Duration,
}

impl NavigationContextTracker {
    pub fn new(ttl: Duration) -> Self {
        Self { context: None, ttl }
    }

    /// Record a navigation request, replacing any previous record
    pub fn set_navigation_source(
        &mut self,
        space_id: Option<&str>,
        location_id: &str,
        source: NavigationSource,
        now: Instant,
    ) {
        self.context = Some(NavigationContext {
            space_id: normalize_space_id(space_id),
            location_id: location_id.to_string(),
            timestamp: now,
            source,
        });
    }

    /// The live record at `now`, if any
    pub fn current(&self, now: Instant) -> Option<&NavigationContext> {
        self.context
            .as_ref()
            .filter(|context| !context.is_stale(now, self.ttl))
    }

    /// Returns `true` if a live record matches both ids and the source.
    pub fn is_navigation_from_source(
        &self,
        space_id: Option<&str>,
        location_id: &str,
        source: NavigationSource,
        now: Instant,
    ) -> bool {
        let space_id = normalize_space_id(space_id);
        self.current(now).is_some_and(|context| {
            context.source == source
                && context.space_id == space_id
                && context.location_id == location_id
        })
    }

    /// Drop the record if it has gone stale
    pub fn clear_stale_navigation_context(&mut self, now: Instant) {
        if self
            .context
            .as_ref()
            .is_some_and(|context| context.is_stale(now, self.ttl))
        {
            log::trace!("Discarding stale navigation context");
            self.context = None;
        }
    }
}
