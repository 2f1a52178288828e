use crate::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
    collection::RepresentableCollection,
    error::{Error, ErrorClass},
    predicate::FieldRef,
    source::{Direction, SourceRecordExt},
    value::Value,
};
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::{fmt, sync::Arc};

/// Field every canonical strategy orders and bounds by.
pub const ID_FIELD: &str = "id";

// Well-known page parameter keys.
pub const LIMIT_PARAM: &str = "limit";
pub const OFFSET_PARAM: &str = "offset";
pub const SINCE_ID_PARAM: &str = "since_id";
pub const UNTIL_ID_PARAM: &str = "until_id";

/// Pagination strategy: shape the collection's query before load,
/// write adjacent-page params after.
pub type PaginatorFn =
    Arc<dyn Fn(&mut RepresentableCollection, &PageParams) -> Result<(), Error> + Send + Sync>;

///
/// PaginateError
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PaginateError {
    /// Pagination was requested without naming a paginator.
    MissingDirective,

    /// The named paginator is not registered on this definition.
    UnknownPaginator {
        requested: String,
        available: Vec<&'static str>,
    },
}

impl PaginateError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::MissingDirective => ErrorClass::InvalidOperation,
            Self::UnknownPaginator { .. } => ErrorClass::NotFound,
        }
    }
}

impl fmt::Display for PaginateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDirective => write!(f, "pagination requested without a paginator name"),
            Self::UnknownPaginator {
                requested,
                available,
            } => {
                write!(f, "paginator '{requested}' not found")?;
                if !available.is_empty() {
                    let names: Vec<String> =
                        available.iter().map(|name| format!("'{name}'")).collect();
                    write!(f, ", available are {}", names.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for PaginateError {}

///
/// PageParams
///
/// Ordered parameter mapping describing one page request or one
/// adjacent page. Strategies never mutate the caller's request params;
/// they build fresh mappings for the next/previous page.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageParams {
    params: Vec<(String, Value)>,
}

impl PageParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Set a parameter, replacing an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();

        match self.params.iter_mut().find(|(name, _)| *name == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key, value)),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    // ------------------------------------------------------------------
    // Well-known parameters
    // ------------------------------------------------------------------

    #[must_use]
    pub fn limit(&self) -> Option<u64> {
        self.get(LIMIT_PARAM).and_then(Value::as_u64)
    }

    #[must_use]
    pub fn offset(&self) -> Option<u64> {
        self.get(OFFSET_PARAM).and_then(Value::as_u64)
    }

    #[must_use]
    pub fn since_id(&self) -> Option<&Value> {
        self.get(SINCE_ID_PARAM)
    }

    #[must_use]
    pub fn until_id(&self) -> Option<&Value> {
        self.get(UNTIL_ID_PARAM)
    }

    /// Requested page size, defaulted and capped.
    #[must_use]
    pub fn capped_limit(&self) -> u64 {
        self.limit().unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE)
    }

    #[must_use]
    pub fn with_limit(self, limit: u64) -> Self {
        self.with(LIMIT_PARAM, limit)
    }

    #[must_use]
    pub fn with_offset(self, offset: u64) -> Self {
        self.with(OFFSET_PARAM, offset)
    }

    #[must_use]
    pub fn with_since_id(self, id: impl Into<Value>) -> Self {
        self.with(SINCE_ID_PARAM, id)
    }

    #[must_use]
    pub fn with_until_id(self, id: impl Into<Value>) -> Self {
        self.with(UNTIL_ID_PARAM, id)
    }
}

impl Serialize for PageParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.params.len()))?;
        for (key, value) in &self.params {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// ------------------------------------------------------------------
// Canonical strategies
// ------------------------------------------------------------------

/// Offset pagination: `ORDER BY id ASC LIMIT limit OFFSET offset`.
///
/// Supports arbitrary jump-to-page; page contents drift under
/// concurrent insert/delete because positions are absolute.
pub fn offset(collection: &mut RepresentableCollection, params: &PageParams) -> Result<(), Error> {
    let limit = params.capped_limit();
    let offset = params.offset().unwrap_or(0);

    let loaded = collection
        .load_with(|source| {
            source.order_by(ID_FIELD, Direction::Asc);
            source.limit(limit);
            source.offset(offset);
        })?
        .len() as u64;

    // Full page: more may exist. A heuristic, not an exact count check.
    if loaded == limit {
        collection.set_next_page_params(Some(
            PageParams::new().with_limit(limit).with_offset(offset + limit),
        ));
    }

    if offset > 0 {
        collection.set_prev_page_params(Some(
            PageParams::new()
                .with_limit(limit)
                .with_offset(offset.saturating_sub(limit)),
        ));
    }

    Ok(())
}

/// Marker pagination: exclusive id bounds, `ORDER BY id ASC LIMIT limit`.
///
/// Stable under concurrent mutation; only supports sequential
/// traversal. Next pages key off the last loaded id; previous pages
/// key off the first, so forward/backward paging stays reversible.
pub fn marker(collection: &mut RepresentableCollection, params: &PageParams) -> Result<(), Error> {
    let limit = params.capped_limit();
    let since_id = params.since_id().cloned();
    let until_id = params.until_id().cloned();

    let (loaded, first_id, last_id) = {
        let items = collection.load_with(|source| {
            if let Some(until) = &until_id {
                source.filter(FieldRef::new(ID_FIELD).lt(until.clone()));
            }
            if let Some(since) = &since_id {
                source.filter(FieldRef::new(ID_FIELD).gt(since.clone()));
            }
            source.order_by(ID_FIELD, Direction::Asc);
            source.limit(limit);
        })?;

        let first_id = items.first().map(|item| item.fetch(ID_FIELD)).transpose()?;
        let last_id = items.last().map(|item| item.fetch(ID_FIELD)).transpose()?;
        (items.len() as u64, first_id, last_id)
    };

    if loaded == limit
        && let Some(last_id) = last_id
    {
        collection.set_next_page_params(Some(
            PageParams::new().with_limit(limit).with_since_id(last_id),
        ));
    }

    // The request carried a bound, so the page has a predecessor side.
    if (since_id.is_some() || until_id.is_some())
        && let Some(first_id) = first_id
    {
        collection.set_prev_page_params(Some(
            PageParams::new().with_limit(limit).with_until_id(first_id),
        ));
    }

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        source::BoxedSource,
        test_support::{MemoryRecord, MemorySource},
    };
    use proptest::prelude::*;

    fn source_with_ids(ids: &[u64]) -> BoxedSource {
        Box::new(MemorySource::new(
            ids.iter()
                .map(|id| MemoryRecord::new("Item").with("id", *id))
                .collect(),
        ))
    }

    fn collection_with_ids(ids: &[u64]) -> RepresentableCollection {
        RepresentableCollection::new(source_with_ids(ids))
    }

    fn loaded_ids(collection: &mut RepresentableCollection) -> Vec<u64> {
        collection
            .items()
            .expect("collection should be loaded")
            .iter()
            .map(|item| {
                item.get("id")
                    .and_then(|value| value.as_u64())
                    .expect("id should be a uint")
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // PageParams
    // ------------------------------------------------------------------

    #[test]
    fn capped_limit_defaults_and_clamps() {
        assert_eq!(PageParams::new().capped_limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(PageParams::new().with_limit(25).capped_limit(), 25);
        assert_eq!(
            PageParams::new().with_limit(10_000).capped_limit(),
            MAX_PAGE_SIZE
        );
    }

    #[test]
    fn insert_replaces_an_existing_key_in_place() {
        let mut params = PageParams::new().with_limit(10).with_offset(0);
        params.insert(LIMIT_PARAM, 20u64);

        assert_eq!(params.limit(), Some(20));
        let json = serde_json::to_string(&params).expect("params should serialize");
        assert_eq!(json, r#"{"limit":20,"offset":0}"#);
    }

    // ------------------------------------------------------------------
    // Offset strategy
    // ------------------------------------------------------------------

    #[test]
    fn offset_full_first_page_has_next_but_no_prev() {
        let mut collection = collection_with_ids(&[1, 2, 3]);
        let params = PageParams::new().with_limit(2);

        offset(&mut collection, &params).expect("offset pagination should succeed");

        assert_eq!(loaded_ids(&mut collection), [1, 2]);
        assert_eq!(
            collection.next_page_params(),
            Some(&PageParams::new().with_limit(2).with_offset(2))
        );
        assert_eq!(collection.prev_page_params(), None);
    }

    #[test]
    fn offset_short_page_has_no_next() {
        let mut collection = collection_with_ids(&[1, 2, 3]);
        let params = PageParams::new().with_limit(2).with_offset(2);

        offset(&mut collection, &params).expect("offset pagination should succeed");

        assert_eq!(loaded_ids(&mut collection), [3]);
        assert_eq!(collection.next_page_params(), None);
        assert_eq!(
            collection.prev_page_params(),
            Some(&PageParams::new().with_limit(2).with_offset(0))
        );
    }

    #[test]
    fn offset_page_of_exactly_limit_items_signals_a_next_page() {
        let mut collection = collection_with_ids(&[1, 2]);
        let params = PageParams::new().with_limit(2);

        offset(&mut collection, &params).expect("offset pagination should succeed");

        // Heuristic: a full page claims a next page even at the very end.
        assert!(collection.has_next_page());
    }

    #[test]
    fn offset_prev_clamps_to_the_start() {
        let mut collection = collection_with_ids(&[1, 2, 3, 4]);
        let params = PageParams::new().with_limit(3).with_offset(1);

        offset(&mut collection, &params).expect("offset pagination should succeed");

        assert_eq!(
            collection.prev_page_params(),
            Some(&PageParams::new().with_limit(3).with_offset(0))
        );
    }

    #[test]
    fn offset_does_not_mutate_the_request_params() {
        let mut collection = collection_with_ids(&[1, 2, 3]);
        let params = PageParams::new().with_limit(2);

        offset(&mut collection, &params).expect("offset pagination should succeed");

        assert_eq!(params, PageParams::new().with_limit(2));
    }

    // ------------------------------------------------------------------
    // Marker strategy
    // ------------------------------------------------------------------

    #[test]
    fn marker_unbounded_first_page_has_next_but_no_prev() {
        let mut collection = collection_with_ids(&[10, 20, 30]);
        let params = PageParams::new().with_limit(2);

        marker(&mut collection, &params).expect("marker pagination should succeed");

        assert_eq!(loaded_ids(&mut collection), [10, 20]);
        assert_eq!(
            collection.next_page_params(),
            Some(&PageParams::new().with_limit(2).with_since_id(20u64))
        );
        assert_eq!(collection.prev_page_params(), None);
    }

    #[test]
    fn marker_since_bound_is_exclusive_and_sets_prev_from_first_id() {
        let mut collection = collection_with_ids(&[10, 20, 30]);
        let params = PageParams::new().with_limit(2).with_since_id(20u64);

        marker(&mut collection, &params).expect("marker pagination should succeed");

        assert_eq!(loaded_ids(&mut collection), [30]);
        assert_eq!(collection.next_page_params(), None);
        assert_eq!(
            collection.prev_page_params(),
            Some(&PageParams::new().with_limit(2).with_until_id(30u64))
        );
    }

    #[test]
    fn marker_until_bound_is_exclusive() {
        let mut collection = collection_with_ids(&[10, 20, 30]);
        let params = PageParams::new().with_limit(10).with_until_id(30u64);

        marker(&mut collection, &params).expect("marker pagination should succeed");

        assert_eq!(loaded_ids(&mut collection), [10, 20]);
    }

    #[test]
    fn marker_empty_page_sets_neither_side() {
        let mut collection = collection_with_ids(&[10, 20]);
        let params = PageParams::new().with_limit(2).with_since_id(20u64);

        marker(&mut collection, &params).expect("marker pagination should succeed");

        assert!(collection.is_empty());
        assert!(!collection.has_next_page());
        assert!(!collection.has_prev_page());
    }

    #[test]
    fn marker_next_page_never_repeats_seen_items_after_inserts() {
        let mut page_one = collection_with_ids(&[1, 2, 3, 4]);
        marker(&mut page_one, &PageParams::new().with_limit(2))
            .expect("first page should paginate");
        let seen = loaded_ids(&mut page_one);
        let next = page_one
            .next_page_params()
            .expect("full first page should have a next page")
            .clone();

        // Rows inserted after page one was loaded, including one below
        // the boundary; since_id paging must not resurface page one.
        let mut page_two = collection_with_ids(&[1, 2, 3, 4, 5]);
        marker(&mut page_two, &next).expect("second page should paginate");
        let ids = loaded_ids(&mut page_two);

        assert!(ids.iter().all(|id| !seen.contains(id)));
        assert_eq!(ids, [3, 4]);
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    proptest! {
        #[test]
        fn offset_boundary_flags_match_window_arithmetic(
            total in 0u64..40,
            limit in 1u64..10,
            offset_start in 0u64..50,
        ) {
            let ids: Vec<u64> = (1..=total).collect();
            let mut collection = collection_with_ids(&ids);
            let params = PageParams::new().with_limit(limit).with_offset(offset_start);

            offset(&mut collection, &params).expect("offset pagination should succeed");

            let loaded = collection.items().expect("loaded").len() as u64;
            prop_assert_eq!(loaded, total.saturating_sub(offset_start).min(limit));
            prop_assert_eq!(collection.has_next_page(), loaded == limit);
            prop_assert_eq!(collection.has_prev_page(), offset_start > 0);
        }

        #[test]
        fn marker_forward_walk_visits_every_id_once_in_order(
            ids in proptest::collection::btree_set(1u64..500, 0..40),
            limit in 1u64..8,
        ) {
            let ids: Vec<u64> = ids.iter().copied().collect();
            let mut walked = Vec::new();
            let mut params = PageParams::new().with_limit(limit);

            loop {
                let mut page = collection_with_ids(&ids);
                marker(&mut page, &params).expect("marker pagination should succeed");
                walked.extend(loaded_ids(&mut page));

                match page.next_page_params() {
                    Some(next) => params = next.clone(),
                    None => break,
                }
            }

            prop_assert_eq!(walked, ids);
        }
    }
}
