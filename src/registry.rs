//! # Route Registry
//!
//! Ordered collection of routes, indexed by route name and by
//! `Controller:Action` key. Matching iterates routes in registration order
//! and the first match wins, so [`RouteRegistry::prepend`] is the supported
//! way to give a route priority over previously registered, more general
//! routes.
//!
//! Duplicate registration (same name or same `Controller:Action` key) is a
//! configuration error by default; a registry built with overwrite permission
//! silently replaces the prior entry in both indexes instead, keeping its
//! position in the matching order.
//!
//! Routes may carry a group name keyed on the first path segment; grouped
//! routes are only considered for requests whose first segment matches,
//! which keeps large route tables from being scanned in full.

use crate::route::Route;
use anyhow::{bail, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// In-memory collection of all registered routes.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: Vec<Arc<Route>>,
    by_name: HashMap<String, Arc<Route>>,
    by_key: HashMap<String, Arc<Route>>,
    allow_overwrite: bool,
}

impl RouteRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that replaces conflicting registrations instead of
    /// rejecting them.
    #[must_use]
    pub fn with_overwrite(allow_overwrite: bool) -> Self {
        Self {
            allow_overwrite,
            ..Self::default()
        }
    }

    /// Register a route at the end of the matching order.
    pub fn add(&mut self, route: Route) -> Result<()> {
        self.insert(route, false)
    }

    /// Register a route ahead of all existing routes.
    pub fn prepend(&mut self, route: Route) -> Result<()> {
        self.insert(route, true)
    }

    fn insert(&mut self, route: Route, prepend: bool) -> Result<()> {
        let name = route.name().to_string();
        let key = route.key();
        // A registration may conflict with one route on name and with a
        // different route on key; every conflicting entry must go so both
        // indexes stay unique.
        let conflicts: Vec<usize> = self
            .routes
            .iter()
            .enumerate()
            .filter(|(_, existing)| existing.name() == name || existing.key() == key)
            .map(|(position, _)| position)
            .collect();
        if let Some(&position) = conflicts.first() {
            if !self.allow_overwrite {
                bail!(
                    "duplicate route registration: {:?} ({key}) conflicts with {:?}",
                    name,
                    self.routes[position].name()
                );
            }
            for &conflict in conflicts.iter().rev() {
                let evicted = self.routes.remove(conflict);
                self.by_name.remove(evicted.name());
                self.by_key.remove(&evicted.key());
            }
            let route = Arc::new(route);
            // An overwrite keeps the first evicted route's position in the
            // matching order rather than dropping to the end.
            self.routes.insert(position, Arc::clone(&route));
            self.by_name.insert(name, Arc::clone(&route));
            self.by_key.insert(key, route);
            return Ok(());
        }

        let route = Arc::new(route);
        if prepend {
            self.routes.insert(0, Arc::clone(&route));
        } else {
            self.routes.push(Arc::clone(&route));
        }
        self.by_name.insert(name, Arc::clone(&route));
        self.by_key.insert(key, route);
        Ok(())
    }

    /// Look up a route by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Route>> {
        self.by_name.get(name)
    }

    /// Look up a route by `Controller:Action` key.
    #[must_use]
    pub fn get_by_key(&self, key: &str) -> Option<&Arc<Route>> {
        self.by_key.get(key)
    }

    /// Look up a route by name first, then by `Controller:Action` key.
    #[must_use]
    pub fn resolve(&self, target: &str) -> Option<&Arc<Route>> {
        self.get(target).or_else(|| self.get_by_key(target))
    }

    /// Unregister a route by name, returning it when present.
    pub fn remove(&mut self, name: &str) -> Option<Arc<Route>> {
        let removed = self.by_name.remove(name)?;
        self.by_key.remove(&removed.key());
        self.routes.retain(|route| route.name() != name);
        Some(removed)
    }

    /// All routes in matching order, optionally restricted to one group.
    pub fn all<'a>(&'a self, group: Option<&'a str>) -> impl Iterator<Item = &'a Arc<Route>> + 'a {
        self.routes
            .iter()
            .filter(move |route| group.is_none() || route.group() == group)
    }

    /// Candidate routes for a request whose first path segment is
    /// `first_segment`: ungrouped routes plus the matching group, in
    /// registration order.
    pub fn candidates<'a>(
        &'a self,
        first_segment: &'a str,
    ) -> impl Iterator<Item = &'a Arc<Route>> {
        self.routes.iter().filter(move |route| {
            route.group().is_none() || route.group() == Some(first_segment)
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Log the full routing table. Useful for verifying registration order.
    pub fn dump_routes(&self) {
        info!(routes_count = self.routes.len(), "Routing table");
        for route in &self.routes {
            info!(
                name = %route.name(),
                key = %route.key(),
                reverse = %route.compiled().reverse,
                group = route.group().unwrap_or("-"),
                "Registered route"
            );
        }
    }
}
