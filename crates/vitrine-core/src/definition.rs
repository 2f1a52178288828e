//! Module: definition
//! Responsibility: per-record-type registration (modes, modifiers,
//! paginators, helpers) and the represent operations built on it.
//! Does not own: the process-wide type table (registry) or the
//! concrete-type resolution rule (dispatch).

use crate::{
    collection::RepresentableCollection,
    dispatch::{self, Resolution},
    error::{Error, ErrorClass},
    obs::{self, TraceEvent},
    paginate::{PageParams, PaginateError, PaginatorFn},
    plugin::PluginDescriptor,
    record::RepresentedRecord,
    registry::RepresenterRegistry,
    source::{BoxedSource, SourceRecord},
    value::Value,
};
use std::{collections::HashMap, fmt, sync::Arc};
use thiserror::Error as ThisError;

///
/// RecordType
///
/// Identifies a domain entity kind ("Persona", "Item"). Registry key;
/// unique per definition.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RecordType(&'static str);

impl RecordType {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

///
/// DefinitionError
///

#[derive(Debug, ThisError)]
pub enum DefinitionError {
    #[error("record type '{record_type}' has no mode '{mode}'")]
    UnsupportedMode {
        record_type: RecordType,
        mode: String,
    },

    #[error("record type '{record_type}' has no dataset modifier for mode '{mode}'")]
    NoModifier {
        record_type: RecordType,
        mode: String,
    },

    #[error("pagination options require a query, not a single record (record type '{record_type}')")]
    SingleRecordPagination { record_type: RecordType },

    #[error("helper '{name}' is not registered")]
    UnknownHelper { name: String },
}

impl DefinitionError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::UnsupportedMode { .. } => ErrorClass::Unsupported,
            Self::NoModifier { .. } | Self::UnknownHelper { .. } => ErrorClass::NotFound,
            Self::SingleRecordPagination { .. } => ErrorClass::InvalidOperation,
        }
    }
}

///
/// Function kinds stored by a definition
///

/// Mode transform: read the source record, write the output record.
pub type TransformFn = Arc<
    dyn Fn(&dyn SourceRecord, &mut RepresentedRecord, &ModeContext<'_>) -> Result<(), Error>
        + Send
        + Sync,
>;

/// Dataset modifier: query-shaping transform applied exactly once,
/// before the collection loads.
pub type ModifierFn = Arc<dyn Fn(BoxedSource) -> BoxedSource + Send + Sync>;

/// Helper: auxiliary function visible to this definition's transforms.
pub type HelperFn = Arc<dyn Fn(&[Value]) -> Result<Value, Error> + Send + Sync>;

/// Wrap a closure as a registrable helper.
pub fn helper(
    f: impl Fn(&[Value]) -> Result<Value, Error> + Send + Sync + 'static,
) -> HelperFn {
    Arc::new(f)
}

///
/// Helpers
///

#[derive(Clone, Default)]
pub struct Helpers {
    fns: HashMap<&'static str, HelperFn>,
}

impl Helpers {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&HelperFn> {
        self.fns.get(name)
    }

    /// Invoke a helper by name. Unknown names are an error, never a
    /// silent no-op.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, Error> {
        let helper = self.get(name).ok_or_else(|| DefinitionError::UnknownHelper {
            name: name.to_string(),
        })?;

        helper(args)
    }

    fn merge(&mut self, fns: impl IntoIterator<Item = (&'static str, HelperFn)>) {
        self.fns.extend(fns);
    }
}

///
/// ModeContext
///
/// What a transform sees besides the record: optional caller-supplied
/// context data and the owning definition's helper namespace.
///

pub struct ModeContext<'a> {
    data: Option<&'a Value>,
    helpers: &'a Helpers,
}

impl<'a> ModeContext<'a> {
    #[must_use]
    pub const fn data(&self) -> Option<&'a Value> {
        self.data
    }

    pub fn helper(&self, name: &str, args: &[Value]) -> Result<Value, Error> {
        self.helpers.call(name, args)
    }
}

///
/// RepresentOptions
///

#[derive(Clone, Debug, Default)]
pub struct RepresentOptions {
    paginate_with: Option<String>,
    pagination: PageParams,
}

impl RepresentOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the paginator to run. Required whenever options are passed.
    #[must_use]
    pub fn paginate_with(mut self, name: impl Into<String>) -> Self {
        self.paginate_with = Some(name.into());
        self
    }

    /// Caller-supplied pagination request parameters.
    #[must_use]
    pub fn pagination(mut self, params: PageParams) -> Self {
        self.pagination = params;
        self
    }
}

///
/// RepresentTarget / Represented
///

/// Input to the unified represent entry point: one record or a query.
pub enum RepresentTarget<'a> {
    Record(&'a dyn SourceRecord),
    Query(BoxedSource),
}

/// Output of the unified represent entry point.
#[derive(Debug)]
pub enum Represented {
    Record(RepresentedRecord),
    Collection(RepresentableCollection),
}

impl Represented {
    #[must_use]
    pub fn into_record(self) -> Option<RepresentedRecord> {
        match self {
            Self::Record(record) => Some(record),
            Self::Collection(_) => None,
        }
    }

    #[must_use]
    pub fn into_collection(self) -> Option<RepresentableCollection> {
        match self {
            Self::Record(_) => None,
            Self::Collection(collection) => Some(collection),
        }
    }
}

///
/// ModeEntry
///

#[derive(Clone, Default)]
struct ModeEntry {
    transform: Option<TransformFn>,
    modifier: Option<ModifierFn>,
}

///
/// RepresenterDefinition
///
/// Per-record-type registration of modes, dataset modifiers,
/// paginators, and helpers. Built once during boot, immutable after:
/// registration calls take `&mut self`, represent operations `&self`.
///

pub struct RepresenterDefinition {
    record_type: RecordType,
    name: &'static str,
    modes: HashMap<&'static str, ModeEntry>,
    paginators: HashMap<&'static str, PaginatorFn>,
    helpers: Helpers,
}

impl fmt::Debug for RepresenterDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepresenterDefinition")
            .field("record_type", &self.record_type)
            .field("name", &self.name)
            .field("modes", &self.modes.keys().collect::<Vec<_>>())
            .field("paginators", &self.paginators.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RepresenterDefinition {
    #[must_use]
    pub fn new(record_type: RecordType, name: &'static str) -> Self {
        Self {
            record_type,
            name,
            modes: HashMap::new(),
            paginators: HashMap::new(),
            helpers: Helpers::default(),
        }
    }

    #[must_use]
    pub const fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// Human-readable definition name, the reverse-lookup key.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    // ------------------------------------------------------------------
    // Declarative registration API (boot phase)
    // ------------------------------------------------------------------

    /// Register a transform under each of `names`.
    ///
    /// Registering a name twice replaces the transform: last write
    /// wins. Override chains rely on this.
    pub fn mode(
        &mut self,
        names: &[&'static str],
        transform: impl Fn(&dyn SourceRecord, &mut RepresentedRecord, &ModeContext<'_>) -> Result<(), Error>
        + Send
        + Sync
        + 'static,
    ) -> &mut Self {
        let transform: TransformFn = Arc::new(transform);
        for name in names {
            self.modes.entry(*name).or_default().transform = Some(Arc::clone(&transform));
        }

        self
    }

    /// Associate a query-shaping modifier with each of `names`.
    pub fn dataset_modifier(
        &mut self,
        names: &[&'static str],
        modifier: impl Fn(BoxedSource) -> BoxedSource + Send + Sync + 'static,
    ) -> &mut Self {
        let modifier: ModifierFn = Arc::new(modifier);
        for name in names {
            self.modes.entry(*name).or_default().modifier = Some(Arc::clone(&modifier));
        }

        self
    }

    /// Register a pagination strategy under `name`.
    pub fn paginator(
        &mut self,
        name: &'static str,
        strategy: impl Fn(&mut RepresentableCollection, &PageParams) -> Result<(), Error>
        + Send
        + Sync
        + 'static,
    ) -> &mut Self {
        self.paginators.insert(name, Arc::new(strategy));
        self
    }

    /// Merge helper functions into this definition's namespace.
    pub fn helpers(
        &mut self,
        fns: impl IntoIterator<Item = (&'static str, HelperFn)>,
    ) -> &mut Self {
        self.helpers.merge(fns);
        self
    }

    /// Register every paginator the plugin exposes, each under its own
    /// name.
    pub fn install_plugin(&mut self, plugin: &PluginDescriptor) -> &mut Self {
        for (name, strategy) in plugin.paginators() {
            self.paginators.insert(name, Arc::clone(strategy));
        }

        self
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Whether `mode` can represent records (a transform is registered).
    #[must_use]
    pub fn supports(&self, mode: &str) -> bool {
        self.modes
            .get(mode)
            .is_some_and(|entry| entry.transform.is_some())
    }

    /// Registered paginator names, sorted.
    #[must_use]
    pub fn paginator_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.paginators.keys().copied().collect();
        names.sort_unstable();
        names
    }

    // ------------------------------------------------------------------
    // Represent operations (request time)
    // ------------------------------------------------------------------

    /// Represent one record in `mode`.
    ///
    /// Resolution consults the record's concrete type tag: rows tagged
    /// with a different registered type delegate to that type's
    /// definition for the same mode.
    pub fn represent_single(
        &self,
        registry: &RepresenterRegistry,
        record: &dyn SourceRecord,
        mode: &str,
        context: Option<&Value>,
    ) -> Result<RepresentedRecord, Error> {
        let transform = self.transform_for(mode)?;

        match dispatch::resolve(registry, self, record)? {
            Resolution::Local => {
                obs::record(TraceEvent::ModeDispatched {
                    record_type: self.record_type.as_str(),
                    mode,
                    delegated_to: None,
                });

                self.run_transform(&transform, record, context)
            }
            Resolution::Delegated(delegated) => {
                obs::record(TraceEvent::ModeDispatched {
                    record_type: self.record_type.as_str(),
                    mode,
                    delegated_to: Some(delegated.record_type().as_str()),
                });

                // Terminates: the delegated definition's record type
                // equals the record's tag, so it resolves locally.
                delegated.represent_single(registry, record, mode, context)
            }
        }
    }

    /// Represent a whole query in `mode`.
    ///
    /// Applies the mode's dataset modifier (if any) exactly once, wraps
    /// the handle, paginates when options are passed, then maps every
    /// loaded record through the resolved transform.
    pub fn represent_query(
        &self,
        registry: &RepresenterRegistry,
        source: BoxedSource,
        mode: &str,
        opts: Option<&RepresentOptions>,
        context: Option<&Value>,
    ) -> Result<RepresentableCollection, Error> {
        self.transform_for(mode)?;

        let source = self.apply_modifier(source, mode);
        let mut collection = RepresentableCollection::new(source);

        if let Some(opts) = opts {
            self.paginate(&mut collection, opts)?;
        }

        let raw = collection.take_items()?;
        let mut records = Vec::with_capacity(raw.len());
        for record in &raw {
            records.push(self.represent_single(registry, record.as_ref(), mode, context)?);
        }
        collection.set_records(records);

        Ok(collection)
    }

    /// Unified entry point: one record or a query.
    ///
    /// Pagination options only make sense for a query; passing them
    /// with a single record is an invalid operation.
    pub fn represent_as(
        &self,
        registry: &RepresenterRegistry,
        target: RepresentTarget<'_>,
        mode: &str,
        opts: Option<&RepresentOptions>,
        context: Option<&Value>,
    ) -> Result<Represented, Error> {
        match target {
            RepresentTarget::Query(source) => self
                .represent_query(registry, source, mode, opts, context)
                .map(Represented::Collection),
            RepresentTarget::Record(record) => {
                if opts.is_some() {
                    return Err(DefinitionError::SingleRecordPagination {
                        record_type: self.record_type,
                    }
                    .into());
                }

                self.represent_single(registry, record, mode, context)
                    .map(Represented::Record)
            }
        }
    }

    /// Apply the dataset modifier registered for `mode` to a query
    /// handle, standalone. Unlike the represent path, a missing
    /// modifier here is an error.
    pub fn modify_with(&self, source: BoxedSource, mode: &str) -> Result<BoxedSource, Error> {
        let entry = self
            .modes
            .get(mode)
            .ok_or_else(|| self.unsupported_mode(mode))?;
        let modifier = entry.modifier.as_ref().ok_or_else(|| {
            Error::from(DefinitionError::NoModifier {
                record_type: self.record_type,
                mode: mode.to_string(),
            })
        })?;

        obs::record(TraceEvent::DatasetModified {
            record_type: self.record_type.as_str(),
            mode,
        });

        Ok(modifier(source))
    }

    /// Paginate a query handle without representing it: wraps the
    /// handle, runs the named paginator, returns the loaded collection.
    pub fn paginate_with(
        &self,
        source: BoxedSource,
        name: &str,
        params: &PageParams,
    ) -> Result<RepresentableCollection, Error> {
        let mut collection = RepresentableCollection::new(source);
        self.run_paginator(&mut collection, name, params)?;

        Ok(collection)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn transform_for(&self, mode: &str) -> Result<TransformFn, Error> {
        self.modes
            .get(mode)
            .and_then(|entry| entry.transform.clone())
            .ok_or_else(|| self.unsupported_mode(mode))
    }

    fn unsupported_mode(&self, mode: &str) -> Error {
        DefinitionError::UnsupportedMode {
            record_type: self.record_type,
            mode: mode.to_string(),
        }
        .into()
    }

    fn run_transform(
        &self,
        transform: &TransformFn,
        record: &dyn SourceRecord,
        context: Option<&Value>,
    ) -> Result<RepresentedRecord, Error> {
        let ctx = ModeContext {
            data: context,
            helpers: &self.helpers,
        };

        let mut out = RepresentedRecord::new();
        transform(record, &mut out, &ctx)?;

        Ok(out)
    }

    fn apply_modifier(&self, source: BoxedSource, mode: &str) -> BoxedSource {
        let modifier = self
            .modes
            .get(mode)
            .and_then(|entry| entry.modifier.as_ref());

        match modifier {
            Some(modifier) => {
                obs::record(TraceEvent::DatasetModified {
                    record_type: self.record_type.as_str(),
                    mode,
                });

                modifier(source)
            }
            None => source,
        }
    }

    fn paginate(
        &self,
        collection: &mut RepresentableCollection,
        opts: &RepresentOptions,
    ) -> Result<(), Error> {
        let name = opts
            .paginate_with
            .as_deref()
            .ok_or(PaginateError::MissingDirective)?;

        self.run_paginator(collection, name, &opts.pagination)
    }

    fn run_paginator(
        &self,
        collection: &mut RepresentableCollection,
        name: &str,
        params: &PageParams,
    ) -> Result<(), Error> {
        let paginator = self.paginators.get(name).ok_or_else(|| {
            Error::from(PaginateError::UnknownPaginator {
                requested: name.to_string(),
                available: self.paginator_names(),
            })
        })?;

        paginator(collection, params)?;

        obs::record(TraceEvent::PaginatorApplied {
            record_type: self.record_type.as_str(),
            paginator: name,
            rows: collection.len() as u64,
        });

        Ok(())
    }
}

///
/// TESTS
///
