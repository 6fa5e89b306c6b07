use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{FieldValue, Outlet, Record, SortDirection};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Search + sort over a record list. Holds no records, only the view parameters;
/// [`FilterSortView::apply`] recomputes the visible list from scratch.
#[derive(Clone, Debug, Default)]
pub struct FilterSortView {
    search: String,
    search_fields: Vec<String>,
    sort: Option<SortSpec>,
}

impl FilterSortView {
    pub fn new(search_fields: &[&str]) -> Self {
        Self {
            search: String::new(),
            search_fields: search_fields.iter().map(|f| f.to_string()).collect(),
            sort: None,
        }
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn set_sort(&mut self, key: impl Into<String>, direction: SortDirection) {
        self.sort = Some(SortSpec { key: key.into(), direction });
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Column header click: same key flips direction, a new key starts ascending.
    pub fn sort_by(&mut self, key: &str) {
        self.sort = match self.sort.take() {
            Some(spec) if spec.key == key => Some(SortSpec { direction: spec.direction.flip(), ..spec }),
            _ => Some(SortSpec { key: key.to_string(), direction: SortDirection::Asc }),
        };
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.search_fields.iter().any(|key| match record.field(key) {
            FieldValue::Text(s) => s.to_lowercase().contains(&needle),
            _ => false,
        })
    }

    pub fn apply<'a, R: Record>(&self, records: &'a [R]) -> Vec<&'a R> {
        let mut out: Vec<&R> = records.iter().filter(|r| self.matches(*r)).collect();
        if let Some(spec) = &self.sort {
            out.sort_by(|a, b| {
                let ord = compare_field(&a.field(&spec.key), &b.field(&spec.key));
                match spec.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
        out
    }
}

/// Missing < numbers < text. Text compares case-insensitively.
pub fn compare_field(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Ordering {
    use FieldValue::*;
    match (a, b) {
        (Missing, Missing) => Ordering::Equal,
        (Missing, _) => Ordering::Less,
        (_, Missing) => Ordering::Greater,
        (Number(x), Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Number(_), Text(_)) => Ordering::Less,
        (Text(_), Number(_)) => Ordering::Greater,
        (Text(x), Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
    }
}

/// Journey-plan outlets ahead of additional ones; order otherwise unchanged.
pub fn pjp_first<'a>(mut outlets: Vec<&'a Outlet>) -> Vec<&'a Outlet> {
    outlets.sort_by_key(|o| !o.in_pjp);
    outlets
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        id: String,
        name: Option<String>,
        v: f64,
    }

    impl Record for Row {
        fn id(&self) -> &str {
            &self.id
        }
        fn field(&self, key: &str) -> FieldValue<'_> {
            match (key, &self.name) {
                ("name", Some(n)) => FieldValue::Text(n),
                ("v", _) => FieldValue::Number(self.v),
                _ => FieldValue::Missing,
            }
        }
    }

    fn row(id: &str, name: Option<&str>, v: f64) -> Row {
        Row { id: id.into(), name: name.map(str::to_string), v }
    }

    fn ids(rows: Vec<&Row>) -> Vec<&str> {
        rows.into_iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn ascending_sort_is_stable() {
        let rows = vec![row("1", None, 5.0), row("2", None, 5.0), row("3", None, 3.0)];
        let mut view = FilterSortView::new(&["name"]);
        view.set_sort("v", SortDirection::Asc);
        assert_eq!(ids(view.apply(&rows)), ["3", "1", "2"]);
    }

    #[test]
    fn descending_keeps_ties_in_input_order() {
        let rows = vec![row("1", None, 5.0), row("2", None, 5.0), row("3", None, 3.0)];
        let mut view = FilterSortView::new(&[]);
        view.set_sort("v", SortDirection::Desc);
        assert_eq!(ids(view.apply(&rows)), ["1", "2", "3"]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let rows = vec![row("1", Some("Rajesh Kumar"), 0.0), row("2", Some("Priya Sharma"), 0.0), row("3", None, 0.0)];
        let mut view = FilterSortView::new(&["name"]);
        view.set_search("KUM");
        assert_eq!(ids(view.apply(&rows)), ["1"]);
        view.set_search("");
        assert_eq!(view.apply(&rows).len(), 3);
    }

    #[test]
    fn missing_sorts_lowest_and_text_ignores_case() {
        let rows = vec![row("1", Some("beta"), 0.0), row("2", None, 0.0), row("3", Some("Alpha"), 0.0)];
        let mut view = FilterSortView::new(&["name"]);
        view.sort_by("name");
        assert_eq!(ids(view.apply(&rows)), ["2", "3", "1"]);
        view.sort_by("name");
        assert_eq!(view.sort().unwrap().direction, SortDirection::Desc);
        assert_eq!(ids(view.apply(&rows)), ["1", "3", "2"]);
        view.sort_by("v");
        assert_eq!(view.sort().unwrap().direction, SortDirection::Asc);
    }
}
