//! In-memory query source and records for engine tests.
//!
//! The memory source honors the full `QuerySource` contract (filter,
//! order, limit, offset) so pagination tests exercise real query
//! shaping rather than canned responses.

use crate::{
    predicate::{Cmp, Predicate},
    source::{BoxedRecord, Direction, QuerySource, SourceError, SourceRecord},
    value::Value,
};
use std::cmp::Ordering;

///
/// MemoryRecord
///

#[derive(Clone, Debug)]
pub(crate) struct MemoryRecord {
    tag: &'static str,
    attributes: Vec<(String, Value)>,
}

impl MemoryRecord {
    pub(crate) const fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
        }
    }

    pub(crate) fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push((attribute.into(), value.into()));
        self
    }
}

impl SourceRecord for MemoryRecord {
    fn get(&self, attribute: &str) -> Option<Value> {
        self.attributes
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, value)| value.clone())
    }

    fn type_tag(&self) -> &str {
        self.tag
    }
}

///
/// MemorySource
///

pub(crate) struct MemorySource {
    records: Vec<MemoryRecord>,
    filters: Vec<Predicate>,
    order: Option<(String, Direction)>,
    limit: Option<u64>,
    offset: u64,
    fail_with: Option<String>,
}

impl MemorySource {
    pub(crate) fn new(records: Vec<MemoryRecord>) -> Self {
        Self {
            records,
            filters: Vec::new(),
            order: None,
            limit: None,
            offset: 0,
            fail_with: None,
        }
    }

    /// A source whose load always fails, for error-path tests.
    pub(crate) fn failing(message: impl Into<String>) -> Self {
        let mut source = Self::new(Vec::new());
        source.fail_with = Some(message.into());
        source
    }
}

impl QuerySource for MemorySource {
    fn filter(&mut self, predicate: Predicate) {
        self.filters.push(predicate);
    }

    fn order_by(&mut self, field: &str, direction: Direction) {
        self.order = Some((field.to_string(), direction));
    }

    fn limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }

    fn offset(&mut self, offset: u64) {
        self.offset = offset;
    }

    fn load(&mut self) -> Result<Vec<BoxedRecord>, SourceError> {
        if let Some(message) = &self.fail_with {
            return Err(SourceError::load(message.clone()));
        }

        let mut rows: Vec<MemoryRecord> = self
            .records
            .iter()
            .filter(|record| self.filters.iter().all(|p| matches(record, p)))
            .cloned()
            .collect();

        if let Some((field, direction)) = &self.order {
            rows.sort_by(|a, b| {
                let ordering = match (a.get(field), b.get(field)) {
                    (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                match direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }

        let rows = rows
            .into_iter()
            .skip(usize::try_from(self.offset).unwrap_or(usize::MAX));
        let rows: Vec<BoxedRecord> = match self.limit {
            Some(limit) => rows
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .map(|record| Box::new(record) as BoxedRecord)
                .collect(),
            None => rows.map(|record| Box::new(record) as BoxedRecord).collect(),
        };

        Ok(rows)
    }
}

fn matches(record: &MemoryRecord, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Cmp { field, op, value } => {
            let Some(actual) = record.get(field) else {
                return false;
            };
            let Some(ordering) = actual.compare(value) else {
                return false;
            };
            match op {
                Cmp::Eq => ordering == Ordering::Equal,
                Cmp::Ne => ordering != Ordering::Equal,
                Cmp::Lt => ordering == Ordering::Less,
                Cmp::Le => ordering != Ordering::Greater,
                Cmp::Gt => ordering == Ordering::Greater,
                Cmp::Ge => ordering != Ordering::Less,
            }
        }
        Predicate::And(parts) => parts.iter().all(|p| matches(record, p)),
        Predicate::Or(parts) => parts.iter().any(|p| matches(record, p)),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::FieldRef;

    fn ids(rows: &[BoxedRecord]) -> Vec<u64> {
        rows.iter()
            .map(|row| {
                row.get("id")
                    .and_then(|value| value.as_u64())
                    .expect("id should be a uint")
            })
            .collect()
    }

    fn source() -> MemorySource {
        MemorySource::new(vec![
            MemoryRecord::new("Item").with("id", 2u64),
            MemoryRecord::new("Item").with("id", 1u64),
            MemoryRecord::new("Item").with("id", 3u64),
        ])
    }

    #[test]
    fn load_applies_filter_order_offset_and_limit() {
        let mut source = source();
        source.filter(FieldRef::new("id").gt(1u64));
        source.order_by("id", Direction::Asc);
        source.offset(0);
        source.limit(1);

        let rows = source.load().expect("load should succeed");
        assert_eq!(ids(&rows), [2]);
    }

    #[test]
    fn unordered_load_preserves_insertion_order() {
        let rows = source().load().expect("load should succeed");
        assert_eq!(ids(&rows), [2, 1, 3]);
    }
}
