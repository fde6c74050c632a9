//! Admin dashboard state between polls.
//!
//! Each badged category remembers every pending id it has ever flagged. An
//! id is flagged as new at most once per session, so acknowledging a tab
//! does not bring its items back on the next poll. Nothing here is persisted.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Orders,
    Reservations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Reservations,
    Orders,
    Ratings,
}

impl Tab {
    fn category(self) -> Option<Category> {
        match self {
            Tab::Orders => Some(Category::Orders),
            Tab::Reservations => Some(Category::Reservations),
            Tab::Ratings => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryBadges {
    seen: HashSet<String>,
    newly_arrived: Vec<String>,
}

impl CategoryBadges {
    /// Record one poll result. `items` yields `(id, is_pending)`; returns the
    /// ids flagged by this call.
    pub fn observe<'a, I>(&mut self, items: I) -> Vec<String>
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut flagged = Vec::new();

        for (id, pending) in items {
            if pending && self.seen.insert(id.to_string()) {
                flagged.push(id.to_string());
            }
        }

        self.newly_arrived.extend(flagged.iter().cloned());
        flagged
    }

    pub fn acknowledge(&mut self) {
        self.newly_arrived.clear();
    }

    pub fn newly_arrived(&self) -> &[String] {
        &self.newly_arrived
    }

    pub fn badge_count(&self) -> usize {
        self.newly_arrived.len()
    }

    pub fn has_seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardSession {
    active_tab: Tab,
    orders: CategoryBadges,
    reservations: CategoryBadges,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    /// Switching to a badged tab acknowledges its new items.
    pub fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        if let Some(category) = tab.category() {
            self.badges_mut(category).acknowledge();
        }
    }

    pub fn badges(&self, category: Category) -> &CategoryBadges {
        match category {
            Category::Orders => &self.orders,
            Category::Reservations => &self.reservations,
        }
    }

    pub fn badges_mut(&mut self, category: Category) -> &mut CategoryBadges {
        match category {
            Category::Orders => &mut self.orders,
            Category::Reservations => &mut self.reservations,
        }
    }

    pub fn observe<'a, I>(&mut self, category: Category, items: I) -> Vec<String>
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        self.badges_mut(category).observe(items)
    }
}
