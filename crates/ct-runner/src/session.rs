use anyhow::Result;
use tracing::debug;

use ct_core::{FilterSortView, Outlet, OutletSelection, RepId, SalesRep, SelectionStore};
use ct_source::RecordSource;

/// Dashboard state between loading reps and launching: which reps are
/// picked, the outlets that follow from them, and which outlets are picked.
pub struct Session {
    reps: Vec<SalesRep>,
    pub rep_selection: SelectionStore,
    outlets: Vec<Outlet>,
    pub outlet_selection: OutletSelection,
    pub rep_view: FilterSortView,
    pub outlet_view: FilterSortView,
}

impl Session {
    pub fn load(source: &dyn RecordSource) -> Result<Self> {
        let reps = source.absent_reps()?;
        let rep_selection = SelectionStore::with_visible(reps.iter().map(|r| r.id.as_str()));
        Ok(Self {
            reps,
            rep_selection,
            outlets: Vec::new(),
            outlet_selection: OutletSelection::new(),
            rep_view: FilterSortView::new(&["name", "territory"]),
            outlet_view: FilterSortView::new(&["name", "phone"]),
        })
    }

    pub fn reps(&self) -> &[SalesRep] {
        &self.reps
    }

    pub fn outlets(&self) -> &[Outlet] {
        &self.outlets
    }

    pub fn visible_reps(&self) -> Vec<&SalesRep> {
        self.rep_view.apply(&self.reps)
    }

    /// Filtered and sorted outlets, journey-plan outlets first when unsorted.
    pub fn visible_outlets(&self) -> Vec<&Outlet> {
        let listed = self.outlet_view.apply(&self.outlets);
        if self.outlet_view.sort().is_some() {
            listed
        } else {
            ct_core::pjp_first(listed)
        }
    }

    pub fn selected_rep_ids(&self) -> Vec<RepId> {
        self.rep_selection.selected().map(RepId::from_str).collect()
    }

    /// Replace the rep selection and refresh outlets. Unknown ids are ignored.
    pub fn select_reps<S: AsRef<str>>(&mut self, source: &dyn RecordSource, ids: &[S]) -> Result<()> {
        self.rep_selection.select_all(ids);
        self.refresh_outlets(source)
    }

    pub fn toggle_rep(&mut self, source: &dyn RecordSource, id: &str) -> Result<bool> {
        let now = self.rep_selection.toggle(id);
        self.refresh_outlets(source)?;
        Ok(now)
    }

    /// Reload outlets for the selected reps and prune outlet selections
    /// that no longer have a visible row.
    pub fn refresh_outlets(&mut self, source: &dyn RecordSource) -> Result<()> {
        let rep_ids = self.selected_rep_ids();
        self.outlets = if rep_ids.is_empty() { Vec::new() } else { source.outlets_for(&rep_ids)? };
        let pruned = self.outlet_selection.on_outlets_changed(&self.outlets);
        debug!(reps = rep_ids.len(), outlets = self.outlets.len(), pruned, "outlets refreshed");
        Ok(())
    }

    pub fn toggle_outlet(&mut self, id: &str) -> bool {
        match self.outlets.iter().find(|o| o.id.as_str() == id) {
            Some(o) => self.outlet_selection.toggle(o),
            None => false,
        }
    }

    /// Select exactly `ids` across both partitions.
    pub fn select_outlets<S: AsRef<str>>(&mut self, ids: &[S]) {
        let wanted: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
        let (pjp, extra): (Vec<&Outlet>, Vec<&Outlet>) =
            self.outlets.iter().filter(|o| wanted.contains(&o.id.as_str())).partition(|o| o.in_pjp);
        let pjp: Vec<&str> = pjp.iter().map(|o| o.id.as_str()).collect();
        let extra: Vec<&str> = extra.iter().map(|o| o.id.as_str()).collect();
        self.outlet_selection.in_pjp.select_all(&pjp);
        self.outlet_selection.not_in_pjp.select_all(&extra);
    }

    /// Header checkbox over the currently visible outlets.
    pub fn toggle_all_outlets(&mut self) {
        let visible = self.outlet_view.apply(&self.outlets);
        self.outlet_selection.toggle_all(&visible);
    }

    pub fn selected_outlets(&self) -> Vec<&Outlet> {
        self.outlet_selection.selected_in(&self.outlets)
    }

    /// Outlets that will actually be dialed, plus how many were held back for DND.
    pub fn launchable(&self, respect_dnd: bool) -> (Vec<&Outlet>, usize) {
        let selected = self.selected_outlets();
        if !respect_dnd {
            return (selected, 0);
        }
        let (ok, dnd): (Vec<&Outlet>, Vec<&Outlet>) = selected.into_iter().partition(|o| !o.dnd);
        (ok, dnd.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_source::MockSource;

    #[test]
    fn test_outlets_follow_rep_selection() {
        let src = MockSource::builtin().unwrap();
        let mut s = Session::load(&src).unwrap();
        assert!(s.outlets().is_empty());

        s.select_reps(&src, &["1", "2"]).unwrap();
        assert_eq!(s.outlets().len(), 5 + 4 + 4);

        s.select_outlets(&["1-0", "2-1", "notinpjp-2-0"]);
        assert_eq!(s.outlet_selection.total_selected(), 3);

        // dropping rep 2 prunes its outlets from the selection
        s.toggle_rep(&src, "2").unwrap();
        assert_eq!(s.outlet_selection.total_selected(), 1);
        assert_eq!(s.selected_outlets()[0].id.as_str(), "1-0");
    }

    #[test]
    fn test_no_auto_select_on_load() {
        let src = MockSource::builtin().unwrap();
        let mut s = Session::load(&src).unwrap();
        s.select_reps(&src, &["3"]).unwrap();
        assert_eq!(s.outlet_selection.total_selected(), 0);
        s.toggle_all_outlets();
        assert_eq!(s.outlet_selection.total_selected(), 6);
    }

    #[test]
    fn test_launchable_holds_back_dnd() {
        let src = MockSource::builtin().unwrap();
        let mut s = Session::load(&src).unwrap();
        s.select_reps(&src, &["1", "2", "3"]).unwrap();
        s.toggle_all_outlets();
        let dnd = s.selected_outlets().iter().filter(|o| o.dnd).count();
        let (ok, held) = s.launchable(true);
        assert_eq!(held, dnd);
        assert_eq!(ok.len() + held, s.outlet_selection.total_selected());
        assert_eq!(s.launchable(false).1, 0);
    }

    #[test]
    fn test_rep_search() {
        let src = MockSource::builtin().unwrap();
        let mut s = Session::load(&src).unwrap();
        s.rep_view.set_search("mumbai");
        let names: Vec<&str> = s.visible_reps().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Priya Sharma"]);
    }
}
