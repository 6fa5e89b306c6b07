use ct_core::{Outlet, RepId, SalesRep};

/// Where absent reps and their outlets come from.
pub trait RecordSource {
    fn absent_reps(&self) -> anyhow::Result<Vec<SalesRep>>;

    /// Outlets of the given reps. Unknown ids are skipped.
    fn outlets_for(&self, rep_ids: &[RepId]) -> anyhow::Result<Vec<Outlet>>;

    /// Short description for logs and `doctor`.
    fn describe(&self) -> String;
}
