use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    backend::StorageBackend,
    estimate::estimate,
    link::AffiliateLinks,
    models::{ItemId, NewSupplyItem, SupplyItem, SupplyStatus},
    Error, Result,
};

/// One account's supply list
///
/// Only handed out for a logged-in session, so every operation is already
/// scoped to the right owner.
pub struct SupplyRegistry<'a, B: StorageBackend + ?Sized> {
    backend: &'a mut B,
    owner: &'a str,
    links: &'a AffiliateLinks,
}

impl<'a, B: StorageBackend + ?Sized> SupplyRegistry<'a, B> {
    pub fn new(backend: &'a mut B, owner: &'a str, links: &'a AffiliateLinks) -> Self {
        Self {
            backend,
            owner,
            links,
        }
    }

    /// Email of the account this registry belongs to
    pub fn owner(&self) -> &str {
        self.owner
    }

    /// Append an item with one unit left, used at one unit per day
    pub fn add(&mut self, name: &str, link: &str) -> Result<ItemId> {
        let item = NewSupplyItem::with_defaults(name.to_string(), link.to_string(), Utc::now());
        let item = self.backend.insert_item(self.owner, item)?;

        info!("Added '{}' as item {} for {}", item.name, item.id, self.owner);
        Ok(item.id)
    }

    /// Build the affiliate link for a search query and add it in one go
    pub fn add_from_query(&mut self, query: &str) -> Result<SupplyItem> {
        let link = self.links.build(query);
        let id = self.add(query, &link)?;
        self.get(id)
    }

    pub fn get(&self, id: ItemId) -> Result<SupplyItem> {
        self.backend
            .get_item(self.owner, id)?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Change quantity and/or usage rate. Fields left as None keep their value.
    pub fn update(
        &mut self,
        id: ItemId,
        amount_left: Option<f64>,
        usage_per_day: Option<f64>,
    ) -> Result<()> {
        if let Some(amount) = amount_left {
            if !amount.is_finite() || amount < 0.0 {
                return Err(Error::InvalidQuantity(format!(
                    "units left must be zero or more, got {}",
                    amount
                )));
            }
        }
        if let Some(usage) = usage_per_day {
            if !usage.is_finite() {
                return Err(Error::InvalidQuantity(format!(
                    "usage per day must be a number, got {}",
                    usage
                )));
            }
        }

        let current = self.get(id)?;
        let amount_left = amount_left.unwrap_or(current.amount_left);
        let usage_per_day = usage_per_day.unwrap_or(current.usage_per_day);

        if !self
            .backend
            .update_item(self.owner, id, amount_left, usage_per_day)?
        {
            // Removed by another session between the read and the write
            return Err(Error::NotFound(id.to_string()));
        }

        debug!(
            "Item {} now has {} left at {} per day",
            id, amount_left, usage_per_day
        );
        Ok(())
    }

    pub fn remove(&mut self, id: ItemId) -> Result<()> {
        if !self.backend.delete_item(self.owner, id)? {
            return Err(Error::NotFound(id.to_string()));
        }

        info!("Removed item {} for {}", id, self.owner);
        Ok(())
    }

    /// Items in the order they were added
    pub fn list(&self) -> Result<Vec<SupplyItem>> {
        self.backend.list_items(self.owner)
    }

    /// Every item paired with its depletion estimate as of `now`
    pub fn statuses(&self, now: DateTime<Utc>) -> Result<Vec<SupplyStatus>> {
        Ok(self
            .list()?
            .into_iter()
            .map(|item| {
                let estimate = estimate(item.amount_left, item.usage_per_day, now).ok();
                SupplyStatus { item, estimate }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    const OWNER: &str = "a@example.com";

    #[test]
    fn test_add_appends_with_defaults() {
        let mut backend = MemoryBackend::new();
        let links = AffiliateLinks::default();
        let mut registry = SupplyRegistry::new(&mut backend, OWNER, &links);

        registry.add("soap", "https://x/soap").unwrap();
        let id = registry.add("tea", "https://x/tea").unwrap();

        let items = registry.list().unwrap();
        let last = items.last().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(last.id, id);
        assert_eq!(last.name, "tea");
        assert_eq!(last.amount_left, 1.0);
        assert_eq!(last.usage_per_day, 1.0);
    }

    #[test]
    fn test_add_from_query_builds_link() {
        let mut backend = MemoryBackend::new();
        let links = AffiliateLinks::new("https://shop.test/s", "t-20");
        let mut registry = SupplyRegistry::new(&mut backend, OWNER, &links);

        let item = registry.add_from_query("dish soap").unwrap();
        assert_eq!(item.name, "dish soap");
        assert_eq!(item.link, "https://shop.test/s?k=dish%20soap&tag=t-20");
    }

    #[test]
    fn test_partial_update_keeps_other_field() {
        let mut backend = MemoryBackend::new();
        let links = AffiliateLinks::default();
        let mut registry = SupplyRegistry::new(&mut backend, OWNER, &links);
        let id = registry.add("soap", "https://x").unwrap();

        registry.update(id, Some(12.0), None).unwrap();
        registry.update(id, None, Some(4.0)).unwrap();

        let item = registry.get(id).unwrap();
        assert_eq!(item.amount_left, 12.0);
        assert_eq!(item.usage_per_day, 4.0);
    }

    #[test]
    fn test_update_rejects_negative_amount() {
        let mut backend = MemoryBackend::new();
        let links = AffiliateLinks::default();
        let mut registry = SupplyRegistry::new(&mut backend, OWNER, &links);
        let id = registry.add("soap", "https://x").unwrap();

        assert!(matches!(
            registry.update(id, Some(-1.0), None),
            Err(Error::InvalidQuantity(_))
        ));
        assert!(matches!(
            registry.update(id, None, Some(f64::INFINITY)),
            Err(Error::InvalidQuantity(_))
        ));
        assert_eq!(registry.get(id).unwrap().amount_left, 1.0);
    }

    #[test]
    fn test_zero_usage_is_stored_but_not_estimated() {
        let mut backend = MemoryBackend::new();
        let links = AffiliateLinks::default();
        let mut registry = SupplyRegistry::new(&mut backend, OWNER, &links);
        let id = registry.add("soap", "https://x").unwrap();

        registry.update(id, Some(5.0), Some(0.0)).unwrap();

        let statuses = registry.statuses(Utc::now()).unwrap();
        assert_eq!(statuses.len(), 1);
        assert!(statuses[0].estimate.is_none());
        assert!(!statuses[0].is_low_stock());
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut backend = MemoryBackend::new();
        let links = AffiliateLinks::default();
        let mut registry = SupplyRegistry::new(&mut backend, OWNER, &links);

        assert!(matches!(registry.get(ItemId(99)), Err(Error::NotFound(_))));
        assert!(matches!(
            registry.update(ItemId(99), Some(1.0), None),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(registry.remove(ItemId(99)), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_remove_during_iteration_skips_nothing() {
        let mut backend = MemoryBackend::new();
        let links = AffiliateLinks::default();
        let mut registry = SupplyRegistry::new(&mut backend, OWNER, &links);
        for name in ["a", "b", "c", "d"] {
            registry.add(name, "https://x").unwrap();
        }

        // Remove "a" and "b" while walking the list; everything must still be visited once
        let mut visited = Vec::new();
        for item in registry.list().unwrap() {
            visited.push(item.name.clone());
            if item.name == "a" || item.name == "b" {
                registry.remove(item.id).unwrap();
            }
        }

        assert_eq!(visited, vec!["a", "b", "c", "d"]);
        let left: Vec<String> = registry.list().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(left, vec!["c", "d"]);
    }
}
