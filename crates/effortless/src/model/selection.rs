//! Selection and reading pane state.

use effortless_core::{CorrespondenceItem, ItemId, Partition};

use super::ItemStore;

/// What the reading pane shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingPane {
    /// Nothing selected.
    #[default]
    Empty,
    /// The selected item.
    Reading,
    /// The selected item with its chat panel.
    ChatOpen,
    /// The selected item with its reply draft editor.
    DraftOpen,
}

/// Active partition, selected item and reading pane.
///
/// The selected id always refers to the active partition; the pane is
/// [`ReadingPane::Empty`] exactly when nothing is selected.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    partition: Partition,
    selected: Option<ItemId>,
    pane: ReadingPane,
}

impl Selection {
    /// Creates a selection on the inbox with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Active partition.
    #[must_use]
    pub const fn partition(&self) -> Partition {
        self.partition
    }

    /// Selected item id.
    #[must_use]
    pub const fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    /// Reading pane state.
    #[must_use]
    pub const fn pane(&self) -> ReadingPane {
        self.pane
    }

    /// Switches partition. Returns `true` if the partition changed, in which
    /// case the selection is cleared.
    pub fn show_partition(&mut self, partition: Partition) -> bool {
        if self.partition == partition {
            return false;
        }
        self.partition = partition;
        self.clear();
        true
    }

    /// Selects `id` if `store` holds it in the active partition.
    ///
    /// Any open panel is closed.
    pub fn select(&mut self, id: ItemId, store: &ItemStore) -> bool {
        if store.get(self.partition, id).is_none() {
            return false;
        }
        self.selected = Some(id);
        self.pane = ReadingPane::Reading;
        true
    }

    /// Clears the selection.
    pub const fn clear(&mut self) {
        self.selected = None;
        self.pane = ReadingPane::Empty;
    }

    /// The selected item, looked up in the active partition.
    #[must_use]
    pub fn selected_item<'a>(&self, store: &'a ItemStore) -> Option<&'a CorrespondenceItem> {
        store.get(self.partition, self.selected?)
    }

    /// Clears the selection if the store no longer holds the item.
    ///
    /// Returns `true` if it was cleared.
    pub fn retain_valid(&mut self, store: &ItemStore) -> bool {
        if self.selected.is_some() && self.selected_item(store).is_none() {
            self.clear();
            return true;
        }
        false
    }

    /// Opens the chat panel. Fails when nothing is selected.
    pub const fn open_chat(&mut self) -> bool {
        self.open(ReadingPane::ChatOpen)
    }

    /// Opens the reply draft editor. Fails when nothing is selected.
    pub const fn open_draft(&mut self) -> bool {
        self.open(ReadingPane::DraftOpen)
    }

    const fn open(&mut self, pane: ReadingPane) -> bool {
        if self.selected.is_none() {
            return false;
        }
        self.pane = pane;
        true
    }

    /// Returns from a panel to plain reading.
    pub fn close_panel(&mut self, pane: ReadingPane) {
        if self.pane == pane && self.selected.is_some() {
            self.pane = ReadingPane::Reading;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use effortless_core::{ActionItems, Category};

    fn store_with(inbox: &[i64], drafts: &[i64]) -> ItemStore {
        let make = |id: i64, partition| CorrespondenceItem {
            id: ItemId(id),
            partition,
            counterpart: "a@b.c".into(),
            subject: String::new(),
            body: String::new(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            category: Category::Work,
            suggested_reply: None,
            action_items: ActionItems::default(),
            is_starred: false,
        };
        let mut store = ItemStore::new();
        let g = store.begin_refresh();
        store.apply_refresh(
            Partition::Inbox,
            g,
            inbox.iter().map(|&id| make(id, Partition::Inbox)).collect(),
        );
        let g = store.begin_refresh();
        store.apply_refresh(
            Partition::Drafts,
            g,
            drafts.iter().map(|&id| make(id, Partition::Drafts)).collect(),
        );
        store
    }

    #[test]
    fn test_select_only_within_active_partition() {
        let store = store_with(&[1], &[7]);
        let mut selection = Selection::new();

        assert!(!selection.select(ItemId(7), &store));
        assert_eq!(selection.pane(), ReadingPane::Empty);

        assert!(selection.select(ItemId(1), &store));
        assert_eq!(selection.selected_item(&store).unwrap().id, ItemId(1));
        assert_eq!(selection.pane(), ReadingPane::Reading);
    }

    #[test]
    fn test_partition_switch_clears_selection() {
        let store = store_with(&[1], &[7]);
        let mut selection = Selection::new();
        selection.select(ItemId(1), &store);
        selection.open_chat();

        assert!(selection.show_partition(Partition::Drafts));
        assert_eq!(selection.selected(), None);
        assert_eq!(selection.pane(), ReadingPane::Empty);
        assert!(!selection.show_partition(Partition::Drafts));
    }

    #[test]
    fn test_pane_transitions() {
        let store = store_with(&[1], &[]);
        let mut selection = Selection::new();
        assert!(!selection.open_chat());

        selection.select(ItemId(1), &store);
        assert!(selection.open_draft());
        assert_eq!(selection.pane(), ReadingPane::DraftOpen);

        selection.close_panel(ReadingPane::ChatOpen);
        assert_eq!(selection.pane(), ReadingPane::DraftOpen);
        selection.close_panel(ReadingPane::DraftOpen);
        assert_eq!(selection.pane(), ReadingPane::Reading);
    }

    #[test]
    fn test_retain_valid_clears_missing_item() {
        let mut selection = Selection::new();
        selection.select(ItemId(1), &store_with(&[1], &[]));
        assert!(!selection.retain_valid(&store_with(&[1, 2], &[])));
        assert!(selection.retain_valid(&store_with(&[2], &[])));
        assert_eq!(selection.pane(), ReadingPane::Empty);
    }
}
