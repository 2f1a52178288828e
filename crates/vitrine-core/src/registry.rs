use crate::{
    collection::RepresentableCollection,
    definition::{
        RecordType, RepresentOptions, RepresentTarget, Represented, RepresenterDefinition,
    },
    error::{Error, ErrorClass},
    paginate::PageParams,
    record::RepresentedRecord,
    source::{BoxedSource, SourceRecord},
    value::Value,
};
use std::collections::HashMap;
use thiserror::Error as ThisError;

///
/// RegistryError
///

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("record type '{record_type}' already registered")]
    DuplicateRecordType { record_type: RecordType },

    #[error("definition name '{name}' already registered")]
    DuplicateDefinitionName { name: &'static str },

    #[error("record type '{tag}' has no registered definition")]
    UnknownRecordType { tag: String },

    #[error("definition '{name}' not found")]
    UnknownDefinitionName { name: String },
}

impl RegistryError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::DuplicateRecordType { .. } | Self::DuplicateDefinitionName { .. } => {
                ErrorClass::Configuration
            }
            Self::UnknownRecordType { .. } | Self::UnknownDefinitionName { .. } => {
                ErrorClass::NotFound
            }
        }
    }
}

///
/// RepresenterRegistry
///
/// Process-wide table mapping record type to its definition, plus the
/// reverse mapping from definition name to record type.
///
/// Populated during boot behind `&mut`, then shared read-only for the
/// lifetime of the process: request paths only ever take `&self`, so
/// no locking is needed once registration is done.
///

#[derive(Default)]
pub struct RepresenterRegistry {
    definitions: HashMap<&'static str, RepresenterDefinition>,
    by_name: HashMap<&'static str, RecordType>,
}

impl RepresenterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Registration (boot phase)
    // ------------------------------------------------------------------

    /// Register one definition. Both the record type and the definition
    /// name must be unique; violations are fatal configuration errors.
    pub fn register(&mut self, definition: RepresenterDefinition) -> Result<(), Error> {
        let record_type = definition.record_type();
        let name = definition.name();

        if self.definitions.contains_key(record_type.as_str()) {
            return Err(RegistryError::DuplicateRecordType { record_type }.into());
        }
        if self.by_name.contains_key(name) {
            return Err(RegistryError::DuplicateDefinitionName { name }.into());
        }

        self.by_name.insert(name, record_type);
        self.definitions.insert(record_type.as_str(), definition);

        Ok(())
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub fn lookup(&self, record_type: RecordType) -> Result<&RepresenterDefinition, Error> {
        self.lookup_tag(record_type.as_str())
    }

    /// Look up by a runtime type tag, as carried on raw records.
    pub fn lookup_tag(&self, tag: &str) -> Result<&RepresenterDefinition, Error> {
        self.definitions.get(tag).ok_or_else(|| {
            RegistryError::UnknownRecordType {
                tag: tag.to_string(),
            }
            .into()
        })
    }

    /// Inverse lookup: resolve a definition from its human-readable
    /// name when the caller does not hold the record type.
    pub fn lookup_by_name(&self, name: &str) -> Result<&RepresenterDefinition, Error> {
        let record_type = self.record_type_for(name)?;
        self.lookup(record_type)
    }

    /// Owning record type for a definition name.
    pub fn record_type_for(&self, name: &str) -> Result<RecordType, Error> {
        self.by_name.get(name).copied().ok_or_else(|| {
            RegistryError::UnknownDefinitionName {
                name: name.to_string(),
            }
            .into()
        })
    }

    #[must_use]
    pub fn is_registered(&self, record_type: RecordType) -> bool {
        self.definitions.contains_key(record_type.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RepresenterDefinition> {
        self.definitions.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    // ------------------------------------------------------------------
    // Represent entry points (request time)
    // ------------------------------------------------------------------

    pub fn represent_single(
        &self,
        record_type: RecordType,
        record: &dyn SourceRecord,
        mode: &str,
        context: Option<&Value>,
    ) -> Result<RepresentedRecord, Error> {
        self.lookup(record_type)?
            .represent_single(self, record, mode, context)
    }

    pub fn represent_query(
        &self,
        record_type: RecordType,
        source: BoxedSource,
        mode: &str,
        opts: Option<&RepresentOptions>,
        context: Option<&Value>,
    ) -> Result<RepresentableCollection, Error> {
        self.lookup(record_type)?
            .represent_query(self, source, mode, opts, context)
    }

    pub fn represent_as(
        &self,
        record_type: RecordType,
        target: RepresentTarget<'_>,
        mode: &str,
        opts: Option<&RepresentOptions>,
        context: Option<&Value>,
    ) -> Result<Represented, Error> {
        self.lookup(record_type)?
            .represent_as(self, target, mode, opts, context)
    }

    pub fn paginate_with(
        &self,
        record_type: RecordType,
        source: BoxedSource,
        name: &str,
        params: &PageParams,
    ) -> Result<RepresentableCollection, Error> {
        self.lookup(record_type)?.paginate_with(source, name, params)
    }
}

///
/// TESTS
///
