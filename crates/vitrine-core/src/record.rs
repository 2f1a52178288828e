use crate::value::Value;
use derive_more::IntoIterator;
use serde::{Serialize, Serializer, ser::SerializeMap};

///
/// RepresentedRecord
///
/// Insertion-ordered attribute container produced by one mode
/// transform run. Owned exclusively by the caller that produced it;
/// handed to the serialization layer as-is.
///
/// Attribute access is explicit: a lookup either returns the value or
/// `None`, never a dynamically dispatched fallback.
///

#[derive(Clone, Debug, Default, IntoIterator, PartialEq)]
pub struct RepresentedRecord {
    #[into_iterator(owned, ref)]
    attributes: Vec<(String, Value)>,
}

impl RepresentedRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one attribute.
    ///
    /// Setting an existing attribute replaces its value in place and
    /// keeps its original position.
    pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let attribute = attribute.into();
        let value = value.into();

        match self.attributes.iter_mut().find(|(name, _)| *name == attribute) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((attribute, value)),
        }

        self
    }

    /// Set several attributes at once, in iteration order.
    pub fn set_all<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (attribute, value) in pairs {
            self.set(attribute, value);
        }

        self
    }

    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn contains(&self, attribute: &str) -> bool {
        self.get(attribute).is_some()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.attributes.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for RepresentedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len()))?;
        for (name, value) in &self.attributes {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

///
/// TESTS
///
