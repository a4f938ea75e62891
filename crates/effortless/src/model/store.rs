//! Item store and overlay merge.
//!
//! The store holds the authoritative items of both partitions. Refreshes
//! replace a partition wholesale, but the local-only star flag is carried
//! forward by identifier.

use std::collections::HashMap;

use effortless_core::{CorrespondenceItem, ItemId, Partition};

/// Merges freshly fetched items with the overlay attributes of `held`.
///
/// Items present in `held` keep their star flag; new items start unstarred.
/// Items absent from `incoming` are dropped.
#[must_use]
pub fn merge_overlay(
    held: &[CorrespondenceItem],
    incoming: Vec<CorrespondenceItem>,
) -> Vec<CorrespondenceItem> {
    let starred: HashMap<ItemId, bool> = held.iter().map(|i| (i.id, i.is_starred)).collect();

    incoming
        .into_iter()
        .map(|mut item| {
            item.is_starred = starred.get(&item.id).copied().unwrap_or(false);
            item
        })
        .collect()
}

/// Authoritative collection of correspondence items.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    inbox: Vec<CorrespondenceItem>,
    drafts: Vec<CorrespondenceItem>,
    /// Last generation handed out, shared by both partitions.
    issued: u64,
    applied_inbox: u64,
    applied_drafts: u64,
}

impl ItemStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Items of a partition, in service order.
    #[must_use]
    pub fn items(&self, partition: Partition) -> &[CorrespondenceItem] {
        match partition {
            Partition::Inbox => &self.inbox,
            Partition::Drafts => &self.drafts,
        }
    }

    fn items_mut(&mut self, partition: Partition) -> &mut Vec<CorrespondenceItem> {
        match partition {
            Partition::Inbox => &mut self.inbox,
            Partition::Drafts => &mut self.drafts,
        }
    }

    /// Looks up an item within a partition.
    #[must_use]
    pub fn get(&self, partition: Partition, id: ItemId) -> Option<&CorrespondenceItem> {
        self.items(partition).iter().find(|i| i.id == id)
    }

    fn get_mut(&mut self, partition: Partition, id: ItemId) -> Option<&mut CorrespondenceItem> {
        self.items_mut(partition).iter_mut().find(|i| i.id == id)
    }

    const fn applied(&self, partition: Partition) -> u64 {
        match partition {
            Partition::Inbox => self.applied_inbox,
            Partition::Drafts => self.applied_drafts,
        }
    }

    /// Hands out the generation for a refresh about to be issued.
    pub const fn begin_refresh(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Whether a refresh of `generation` has been overtaken by a newer one.
    #[must_use]
    pub const fn is_stale(&self, partition: Partition, generation: u64) -> bool {
        generation <= self.applied(partition)
    }

    /// Replaces a partition with fetched items, keeping overlay attributes.
    ///
    /// Returns `false` and leaves the store untouched if a newer refresh of
    /// the same partition was already applied.
    pub fn apply_refresh(
        &mut self,
        partition: Partition,
        generation: u64,
        items: Vec<CorrespondenceItem>,
    ) -> bool {
        if self.is_stale(partition, generation) {
            return false;
        }

        let merged = merge_overlay(self.items(partition), items);
        *self.items_mut(partition) = merged;
        match partition {
            Partition::Inbox => self.applied_inbox = generation,
            Partition::Drafts => self.applied_drafts = generation,
        }
        true
    }

    /// Replaces one item in place, keeping its star flag.
    ///
    /// Returns `false` if no item with that id is held in its partition.
    pub fn replace(&mut self, mut item: CorrespondenceItem) -> bool {
        let Some(slot) = self
            .items_mut(item.partition)
            .iter_mut()
            .find(|i| i.id == item.id)
        else {
            return false;
        };
        item.is_starred = slot.is_starred;
        *slot = item;
        true
    }

    /// Applies `f` to the item with `id` in `partition`.
    ///
    /// Returns `false` if no such item exists.
    pub fn update(
        &mut self,
        partition: Partition,
        id: ItemId,
        f: impl FnOnce(&mut CorrespondenceItem),
    ) -> bool {
        self.get_mut(partition, id).map(f).is_some()
    }

    /// Removes an item from a partition.
    pub fn remove(&mut self, partition: Partition, id: ItemId) -> Option<CorrespondenceItem> {
        let items = self.items_mut(partition);
        let pos = items.iter().position(|i| i.id == id)?;
        Some(items.remove(pos))
    }

    /// Flips the star flag, returning the new value.
    pub fn toggle_star(&mut self, partition: Partition, id: ItemId) -> Option<bool> {
        let item = self.get_mut(partition, id)?;
        item.is_starred = !item.is_starred;
        Some(item.is_starred)
    }

    /// Removes a suggestion from an item's action items.
    ///
    /// Returns `false` if the item or the suggestion is absent.
    pub fn dispose_suggestion(
        &mut self,
        partition: Partition,
        id: ItemId,
        suggestion: &str,
    ) -> bool {
        self.get_mut(partition, id)
            .is_some_and(|item| item.action_items.remove_suggestion(suggestion))
    }

    /// Drops every item. Refreshes issued before the call become stale.
    pub fn clear(&mut self) {
        self.inbox.clear();
        self.drafts.clear();
        self.applied_inbox = self.issued;
        self.applied_drafts = self.issued;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use effortless_core::{ActionItems, Category};
    use proptest::prelude::*;

    fn item(id: i64, partition: Partition) -> CorrespondenceItem {
        CorrespondenceItem {
            id: ItemId(id),
            partition,
            counterpart: format!("user{id}@example.com"),
            subject: format!("Subject {id}"),
            body: String::new(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            category: Category::Work,
            suggested_reply: None,
            action_items: ActionItems {
                tasks: vec![],
                suggestions: vec!["Reply".into(), "Archive".into()],
            },
            is_starred: false,
        }
    }

    #[test]
    fn test_refresh_keeps_star_and_defaults_new_items() {
        let mut store = ItemStore::new();
        let g = store.begin_refresh();
        assert!(store.apply_refresh(Partition::Inbox, g, vec![item(1, Partition::Inbox)]));
        assert_eq!(store.toggle_star(Partition::Inbox, ItemId(1)), Some(true));

        let mut spam = item(2, Partition::Inbox);
        spam.category = Category::Spam;
        let g = store.begin_refresh();
        assert!(store.apply_refresh(Partition::Inbox, g, vec![item(1, Partition::Inbox), spam]));

        assert!(store.get(Partition::Inbox, ItemId(1)).unwrap().is_starred);
        assert!(!store.get(Partition::Inbox, ItemId(2)).unwrap().is_starred);
    }

    #[test]
    fn test_stale_refresh_is_discarded() {
        let mut store = ItemStore::new();
        let older = store.begin_refresh();
        let newer = store.begin_refresh();

        assert!(store.apply_refresh(Partition::Inbox, newer, vec![item(2, Partition::Inbox)]));
        assert!(!store.apply_refresh(Partition::Inbox, older, vec![item(1, Partition::Inbox)]));

        let ids: Vec<_> = store.items(Partition::Inbox).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![ItemId(2)]);
    }

    #[test]
    fn test_partitions_have_independent_generations() {
        let mut store = ItemStore::new();
        let inbox = store.begin_refresh();
        let drafts = store.begin_refresh();

        assert!(store.apply_refresh(Partition::Drafts, drafts, vec![item(9, Partition::Drafts)]));
        assert!(store.apply_refresh(Partition::Inbox, inbox, vec![item(1, Partition::Inbox)]));
        assert_eq!(store.items(Partition::Drafts).len(), 1);
        assert_eq!(store.items(Partition::Inbox).len(), 1);
    }

    #[test]
    fn test_clear_makes_outstanding_refreshes_stale() {
        let mut store = ItemStore::new();
        let g = store.begin_refresh();
        store.clear();
        assert!(!store.apply_refresh(Partition::Inbox, g, vec![item(1, Partition::Inbox)]));
        assert!(store.items(Partition::Inbox).is_empty());
    }

    #[test]
    fn test_replace_keeps_star_and_leaves_others() {
        let mut store = ItemStore::new();
        let g = store.begin_refresh();
        store.apply_refresh(
            Partition::Inbox,
            g,
            vec![item(1, Partition::Inbox), item(2, Partition::Inbox)],
        );
        store.toggle_star(Partition::Inbox, ItemId(1));

        let mut edited = item(1, Partition::Inbox);
        edited.suggested_reply = Some("Thanks".into());
        assert!(store.replace(edited));

        let first = store.get(Partition::Inbox, ItemId(1)).unwrap();
        assert!(first.is_starred);
        assert_eq!(first.suggested_reply.as_deref(), Some("Thanks"));
        assert_eq!(store.get(Partition::Inbox, ItemId(2)).unwrap(), &item(2, Partition::Inbox));
        assert!(!store.replace(item(3, Partition::Inbox)));
    }

    #[test]
    fn test_remove_and_toggle() {
        let mut store = ItemStore::new();
        let g = store.begin_refresh();
        store.apply_refresh(Partition::Drafts, g, vec![item(5, Partition::Drafts)]);

        assert_eq!(store.toggle_star(Partition::Drafts, ItemId(5)), Some(true));
        assert_eq!(store.toggle_star(Partition::Drafts, ItemId(5)), Some(false));
        assert_eq!(store.toggle_star(Partition::Drafts, ItemId(6)), None);
        assert_eq!(store.toggle_star(Partition::Inbox, ItemId(5)), None);
        assert!(store.remove(Partition::Inbox, ItemId(5)).is_none());
        assert_eq!(store.remove(Partition::Drafts, ItemId(5)).unwrap().id, ItemId(5));
        assert!(store.remove(Partition::Drafts, ItemId(5)).is_none());
    }

    #[test]
    fn test_mutations_stay_in_their_partition() {
        let mut store = ItemStore::new();
        let g = store.begin_refresh();
        store.apply_refresh(Partition::Inbox, g, vec![item(1, Partition::Inbox)]);
        let g = store.begin_refresh();
        store.apply_refresh(Partition::Drafts, g, vec![item(1, Partition::Drafts)]);

        assert_eq!(store.toggle_star(Partition::Drafts, ItemId(1)), Some(true));
        assert!(store.dispose_suggestion(Partition::Drafts, ItemId(1), "Reply"));

        let inbox = store.get(Partition::Inbox, ItemId(1)).unwrap();
        assert!(!inbox.is_starred);
        assert_eq!(inbox.action_items.suggestions.len(), 2);
        assert!(store.get(Partition::Drafts, ItemId(1)).unwrap().is_starred);
    }

    #[test]
    fn test_dispose_suggestion_is_idempotent() {
        let mut store = ItemStore::new();
        let g = store.begin_refresh();
        store.apply_refresh(Partition::Inbox, g, vec![item(1, Partition::Inbox)]);

        assert!(store.dispose_suggestion(Partition::Inbox, ItemId(1), "Reply"));
        assert!(!store.dispose_suggestion(Partition::Inbox, ItemId(1), "Reply"));
        let left = &store.get(Partition::Inbox, ItemId(1)).unwrap().action_items;
        assert_eq!(left.suggestions, vec!["Archive".to_string()]);
    }

    proptest! {
        #[test]
        fn prop_merge_preserves_overlay(
            held in prop::collection::btree_map(0i64..40, any::<bool>(), 0..20),
            incoming in prop::collection::btree_set(0i64..40, 0..20),
        ) {
            let held_items: Vec<_> = held
                .iter()
                .map(|(&id, &star)| CorrespondenceItem {
                    is_starred: star,
                    ..item(id, Partition::Inbox)
                })
                .collect();
            let fetched: Vec<_> = incoming
                .iter()
                .map(|&id| {
                    let mut fresh = item(id, Partition::Inbox);
                    fresh.subject = format!("Updated {id}");
                    fresh
                })
                .collect();

            let merged = merge_overlay(&held_items, fetched);

            prop_assert_eq!(merged.len(), incoming.len());
            for merged_item in &merged {
                let expected = held.get(&merged_item.id.0).copied().unwrap_or(false);
                prop_assert_eq!(merged_item.is_starred, expected);
                prop_assert!(incoming.contains(&merged_item.id.0));
            }
        }
    }
}
