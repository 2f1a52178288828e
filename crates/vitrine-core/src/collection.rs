use crate::{
    error::Error,
    obs::{self, TraceEvent},
    paginate::PageParams,
    record::RepresentedRecord,
    source::{BoxedRecord, BoxedSource, QuerySource},
};
use serde::{Serialize, Serializer};
use std::slice;

///
/// RepresentableCollection
///
/// Lazily-loaded, pagination-aware wrapper around a query handle.
/// Created per request, loaded at most once, read-only afterwards.
///
/// Lifecycle: paginators shape the underlying query and trigger the
/// load; representation then replaces the raw items with
/// `RepresentedRecord`s. Page parameters describe adjacent pages and
/// are absent when no such page exists.
///

#[derive(Debug)]
pub struct RepresentableCollection {
    source: BoxedSource,
    loaded: bool,
    raw_items: Vec<BoxedRecord>,
    records: Vec<RepresentedRecord>,
    next_page_params: Option<PageParams>,
    prev_page_params: Option<PageParams>,
}

impl RepresentableCollection {
    #[must_use]
    pub fn new(source: BoxedSource) -> Self {
        Self {
            source,
            loaded: false,
            raw_items: Vec::new(),
            records: Vec::new(),
            next_page_params: None,
            prev_page_params: None,
        }
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Load the underlying query as-is.
    pub fn load(&mut self) -> Result<&[BoxedRecord], Error> {
        self.load_with(|_| {})
    }

    /// Shape the underlying query, then load it.
    ///
    /// This is how paginators apply bounds before the single load call.
    pub fn load_with(
        &mut self,
        shape: impl FnOnce(&mut dyn QuerySource),
    ) -> Result<&[BoxedRecord], Error> {
        shape(self.source.as_mut());
        self.raw_items = self.source.load()?;
        self.loaded = true;

        obs::record(TraceEvent::CollectionLoaded {
            rows: self.raw_items.len() as u64,
        });

        Ok(&self.raw_items)
    }

    /// Loaded raw items, loading on first access.
    pub fn items(&mut self) -> Result<&[BoxedRecord], Error> {
        if !self.loaded {
            self.load()?;
        }

        Ok(&self.raw_items)
    }

    /// Direct access to the underlying query handle, for custom
    /// paginators that shape in several steps.
    pub fn source_mut(&mut self) -> &mut dyn QuerySource {
        self.source.as_mut()
    }

    // ------------------------------------------------------------------
    // Representation
    // ------------------------------------------------------------------

    /// Take the loaded raw items for representation, loading first if
    /// needed.
    pub(crate) fn take_items(&mut self) -> Result<Vec<BoxedRecord>, Error> {
        self.items()?;
        Ok(std::mem::take(&mut self.raw_items))
    }

    /// Replace the loaded raw items with their represented form.
    pub(crate) fn set_records(&mut self, records: Vec<RepresentedRecord>) {
        self.records = records;
        self.raw_items.clear();
    }

    #[must_use]
    pub fn records(&self) -> &[RepresentedRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<RepresentedRecord> {
        self.records
    }

    /// Count of loaded items (raw before representation, represented
    /// after). Zero before the load has happened.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.records.is_empty() {
            self.raw_items.len()
        } else {
            self.records.len()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn first(&self) -> Option<&RepresentedRecord> {
        self.records.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&RepresentedRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> slice::Iter<'_, RepresentedRecord> {
        self.records.iter()
    }

    // ------------------------------------------------------------------
    // Pagination state
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn next_page_params(&self) -> Option<&PageParams> {
        self.next_page_params.as_ref()
    }

    #[must_use]
    pub const fn prev_page_params(&self) -> Option<&PageParams> {
        self.prev_page_params.as_ref()
    }

    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.next_page_params.is_some()
    }

    #[must_use]
    pub const fn has_prev_page(&self) -> bool {
        self.prev_page_params.is_some()
    }

    pub fn set_next_page_params(&mut self, params: Option<PageParams>) {
        self.next_page_params = params;
    }

    pub fn set_prev_page_params(&mut self, params: Option<PageParams>) {
        self.prev_page_params = params;
    }

    /// Adjacent-page summary with only the present sides.
    #[must_use]
    pub fn pagination(&self) -> PageLinks {
        PageLinks {
            next_page_params: self.next_page_params.clone(),
            prev_page_params: self.prev_page_params.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a RepresentableCollection {
    type Item = &'a RepresentedRecord;
    type IntoIter = slice::Iter<'a, RepresentedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Serializes as the list of represented records.
impl Serialize for RepresentableCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

///
/// PageLinks
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PageLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_params: Option<PageParams>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_page_params: Option<PageParams>,
}

///
/// TESTS
///
