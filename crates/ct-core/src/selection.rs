use std::collections::BTreeSet;

use crate::{Outlet, OutletId};

/// One independent selection over a visible record collection.
///
/// Only ids in the visible collection can be selected. The collection is
/// replaced through [`SelectionStore::on_collection_changed`], which prunes
/// ids that are no longer visible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionStore {
    visible: BTreeSet<String>,
    selected: BTreeSet<String>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_visible<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::new();
        store.on_collection_changed(ids);
        store
    }

    /// Replace the visible collection. Returns how many selected ids were pruned.
    pub fn on_collection_changed<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visible = ids.into_iter().map(Into::into).collect();
        let before = self.selected.len();
        let visible = &self.visible;
        self.selected.retain(|id| visible.contains(id));
        before - self.selected.len()
    }

    /// Flip membership of `id`. Ids outside the visible collection are ignored.
    /// Returns whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.visible.contains(id) {
            return false;
        }
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
            return true;
        }
        false
    }

    /// Replace the selection with exactly `ids` (restricted to visible ones).
    pub fn select_all<S: AsRef<str>>(&mut self, ids: &[S]) {
        self.selected = ids
            .iter()
            .map(AsRef::as_ref)
            .filter(|id| self.visible.contains(*id))
            .map(str::to_string)
            .collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Header checkbox: clear when everything visible is selected, else select it all.
    pub fn toggle_all<S: AsRef<str>>(&mut self, visible: &[S]) {
        if self.is_select_all_state(visible) {
            self.clear();
        } else {
            self.select_all(visible);
        }
    }

    pub fn is_select_all_state<S: AsRef<str>>(&self, visible: &[S]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.selected.contains(id.as_ref()))
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }
}

/// Outlet selection split into the journey-plan partition and the
/// additional (not in PJP) partition. The two stores never touch each other.
#[derive(Clone, Debug, Default)]
pub struct OutletSelection {
    pub in_pjp: SelectionStore,
    pub not_in_pjp: SelectionStore,
}

impl OutletSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection changed event for the outlet list. Returns pruned count.
    pub fn on_outlets_changed(&mut self, outlets: &[Outlet]) -> usize {
        let (pjp, extra): (Vec<&Outlet>, Vec<&Outlet>) = outlets.iter().partition(|o| o.in_pjp);
        self.in_pjp.on_collection_changed(pjp.iter().map(|o| o.id.as_str()))
            + self.not_in_pjp.on_collection_changed(extra.iter().map(|o| o.id.as_str()))
    }

    fn store_for(&mut self, outlet: &Outlet) -> &mut SelectionStore {
        if outlet.in_pjp {
            &mut self.in_pjp
        } else {
            &mut self.not_in_pjp
        }
    }

    pub fn toggle(&mut self, outlet: &Outlet) -> bool {
        self.store_for(outlet).toggle(outlet.id.as_str())
    }

    pub fn is_selected(&self, outlet: &Outlet) -> bool {
        if outlet.in_pjp {
            self.in_pjp.is_selected(outlet.id.as_str())
        } else {
            self.not_in_pjp.is_selected(outlet.id.as_str())
        }
    }

    /// Combined select-all over the visible outlets: clears both partitions
    /// when each is already fully selected, otherwise selects both fully.
    pub fn toggle_all(&mut self, visible: &[&Outlet]) {
        let (pjp, extra) = split_ids(visible);
        let pjp_done = pjp.iter().all(|id| self.in_pjp.is_selected(id));
        let extra_done = extra.iter().all(|id| self.not_in_pjp.is_selected(id));
        if pjp_done && extra_done {
            self.in_pjp.clear();
            self.not_in_pjp.clear();
        } else {
            self.in_pjp.select_all(&pjp);
            self.not_in_pjp.select_all(&extra);
        }
    }

    pub fn is_select_all_state(&self, visible: &[&Outlet]) -> bool {
        !visible.is_empty() && visible.iter().all(|o| self.is_selected(o))
    }

    pub fn total_selected(&self) -> usize {
        self.in_pjp.len() + self.not_in_pjp.len()
    }

    pub fn clear(&mut self) {
        self.in_pjp.clear();
        self.not_in_pjp.clear();
    }

    /// Selected outlets in collection order.
    pub fn selected_in<'a>(&self, outlets: &'a [Outlet]) -> Vec<&'a Outlet> {
        outlets.iter().filter(|o| self.is_selected(o)).collect()
    }

    pub fn selected_ids(&self) -> Vec<OutletId> {
        self.in_pjp
            .selected()
            .chain(self.not_in_pjp.selected())
            .map(OutletId::from_str)
            .collect()
    }
}

fn split_ids<'a>(outlets: &[&'a Outlet]) -> (Vec<&'a str>, Vec<&'a str>) {
    let mut pjp = Vec::new();
    let mut extra = Vec::new();
    for o in outlets {
        if o.in_pjp {
            pjp.push(o.id.as_str());
        } else {
            extra.push(o.id.as_str());
        }
    }
    (pjp, extra)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Language, Priority, RepId, TimeWindow};

    fn outlet(id: &str, in_pjp: bool) -> Outlet {
        Outlet {
            id: OutletId::from_str(id),
            name: id.to_string(),
            phones: vec!["+91 9000000000".into()],
            window: TimeWindow::parse("09:00", "10:00").unwrap(),
            expected_value: 1000,
            language: Language::English,
            whatsapp_opt_in: true,
            last_order_days: 3,
            priority: Priority::Medium,
            rep_id: RepId::from_str("1"),
            in_pjp,
            dnd: false,
        }
    }

    #[test]
    fn toggle_ignores_invisible_ids() {
        let mut s = SelectionStore::with_visible(["a", "b"]);
        assert!(!s.toggle("zzz"));
        assert!(s.is_empty());
        assert!(s.toggle("a"));
        assert!(!s.toggle("a"));
        assert!(s.is_empty());
    }

    #[test]
    fn select_all_is_idempotent_and_empty_clears() {
        let mut s = SelectionStore::with_visible(["a", "b", "c"]);
        s.select_all(&["a", "c"]);
        let once: Vec<_> = s.selected().map(str::to_string).collect();
        s.select_all(&["a", "c"]);
        let twice: Vec<_> = s.selected().map(str::to_string).collect();
        assert_eq!(once, twice);
        assert_eq!(once, ["a", "c"]);

        s.select_all::<&str>(&[]);
        assert!(s.is_empty());
    }

    #[test]
    fn select_all_state_needs_nonempty_visible() {
        let mut s = SelectionStore::with_visible(["a"]);
        assert!(!s.is_select_all_state::<&str>(&[]));
        s.select_all(&["a"]);
        assert!(s.is_select_all_state(&["a"]));
        assert!(!s.is_select_all_state::<&str>(&[]));
    }

    #[test]
    fn toggle_all_behaves_like_header_checkbox() {
        let mut s = SelectionStore::with_visible(["a", "b"]);
        s.toggle("a");
        s.toggle_all(&["a", "b"]);
        assert_eq!(s.len(), 2);
        s.toggle_all(&["a", "b"]);
        assert!(s.is_empty());
    }

    #[test]
    fn collection_change_prunes_vanished_ids() {
        let mut s = SelectionStore::with_visible(["a", "b", "c"]);
        s.select_all(&["a", "b", "c"]);
        let pruned = s.on_collection_changed(["b"]);
        assert_eq!(pruned, 2);
        assert_eq!(s.selected().collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn partitions_are_independent() {
        let outlets = vec![outlet("1-0", true), outlet("1-1", true), outlet("notinpjp-1-0", false)];
        let mut sel = OutletSelection::new();
        sel.on_outlets_changed(&outlets);

        sel.toggle(&outlets[0]);
        assert_eq!(sel.in_pjp.len(), 1);
        assert!(sel.not_in_pjp.is_empty());

        sel.toggle(&outlets[2]);
        sel.toggle(&outlets[0]);
        assert!(sel.in_pjp.is_empty());
        assert_eq!(sel.not_in_pjp.len(), 1);

        // an id from the other partition is not selectable here
        assert!(!sel.in_pjp.toggle("notinpjp-1-0"));
    }

    #[test]
    fn combined_toggle_all_selects_then_clears_both() {
        let outlets = vec![outlet("1-0", true), outlet("notinpjp-1-0", false), outlet("notinpjp-1-1", false)];
        let mut sel = OutletSelection::new();
        sel.on_outlets_changed(&outlets);
        let visible: Vec<&Outlet> = outlets.iter().collect();

        sel.toggle(&outlets[1]);
        sel.toggle_all(&visible);
        assert_eq!(sel.total_selected(), 3);
        assert!(sel.is_select_all_state(&visible));

        sel.toggle_all(&visible);
        assert_eq!(sel.total_selected(), 0);
    }

    #[test]
    fn selected_ids_list_pjp_first() {
        let outlets = vec![outlet("notinpjp-1-0", false), outlet("1-0", true)];
        let mut sel = OutletSelection::new();
        sel.on_outlets_changed(&outlets);
        sel.toggle(&outlets[0]);
        sel.toggle(&outlets[1]);
        let ids: Vec<_> = sel.selected_ids().into_iter().map(|i| i.0).collect();
        assert_eq!(ids, ["1-0", "notinpjp-1-0"]);
        assert_eq!(sel.selected_in(&outlets).len(), 2);
    }
}
