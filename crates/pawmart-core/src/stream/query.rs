// ── Client-side list queries ──
//
// Search, filter, sort and paginate a cached collection without touching
// the network. List views run these against slice snapshots.

use std::cmp::Ordering;

use serde_json::Value;

use crate::model::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Query over a slice's collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// Case-insensitive substring matched against `search_fields`.
    pub search: Option<String>,
    pub search_fields: Vec<String>,
    /// Field equality filters, compared on display text
    /// (`"3"` matches both `3` and `"3"`).
    pub filters: Vec<(String, String)>,
    pub sort_by: Option<String>,
    pub order: SortOrder,
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            search_fields: vec!["name".into(), "title".into()],
            filters: Vec::new(),
            sort_by: None,
            order: SortOrder::Ascending,
            page: 1,
            per_page: 12,
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Record>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.trim().is_empty()).then_some(term);
        self
    }

    pub fn search_in(mut self, fields: &[&str]) -> Self {
        self.search_fields = fields.iter().map(|f| (*f).to_owned()).collect();
        self
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.order = order;
        self
    }

    pub fn page(mut self, page: usize, per_page: usize) -> Self {
        self.page = page.max(1);
        self.per_page = per_page.max(1);
        self
    }

    /// Whether a record passes the search term and every filter.
    pub fn matches(&self, record: &Record) -> bool {
        let search_ok = self.search.as_deref().is_none_or(|term| {
            let term = term.to_lowercase();
            self.search_fields.iter().any(|field| {
                record
                    .text(field)
                    .is_some_and(|text| text.to_lowercase().contains(&term))
            })
        });

        search_ok
            && self
                .filters
                .iter()
                .all(|(field, value)| record.text(field).is_some_and(|text| text.eq_ignore_ascii_case(value)))
    }

    /// Run the query over `items`. Sorting is stable; records missing the
    /// sort field go last.
    pub fn apply(&self, items: &[Record]) -> Page {
        let mut matched: Vec<&Record> = items.iter().filter(|r| self.matches(r)).collect();

        if let Some(field) = &self.sort_by {
            matched.sort_by(|a, b| {
                let ordering = compare_fields(a.get(field), b.get(field));
                match (self.order, a.get(field).is_some(), b.get(field).is_some()) {
                    (SortOrder::Descending, true, true) => ordering.reverse(),
                    _ => ordering,
                }
            });
        }

        let total = matched.len();
        let per_page = self.per_page.max(1);
        let total_pages = total.div_ceil(per_page);
        let page = self.page.max(1);

        let items = matched
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .cloned()
            .collect();

        Page {
            items,
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_values(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .zip(y.as_f64())
            .and_then(|(x, y)| x.partial_cmp(&y))
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
