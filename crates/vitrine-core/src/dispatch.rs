use crate::{
    definition::RepresenterDefinition, error::Error, registry::RepresenterRegistry,
    source::SourceRecord,
};

///
/// Resolution
///
/// Outcome of concrete-type resolution for one record: run the local
/// transform, or delegate to the definition registered for the
/// record's concrete subtype.
///

pub(crate) enum Resolution<'r> {
    Local,
    Delegated(&'r RepresenterDefinition),
}

/// Resolve which definition represents `record`.
///
/// Rows of a base type carry a concrete-type tag (single-table
/// inheritance). A tag matching the definition's own record type
/// resolves locally; anything else resolves through the registry so
/// the subtype's transform runs instead of the base one. A concrete
/// tag always resolves to its own definition, so delegation never
/// cycles.
pub(crate) fn resolve<'r>(
    registry: &'r RepresenterRegistry,
    definition: &RepresenterDefinition,
    record: &dyn SourceRecord,
) -> Result<Resolution<'r>, Error> {
    let tag = record.type_tag();

    if tag == definition.record_type().as_str() {
        return Ok(Resolution::Local);
    }

    registry.lookup_tag(tag).map(Resolution::Delegated)
}

///
/// TESTS
///
