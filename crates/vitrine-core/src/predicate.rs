use crate::value::Value;

///
/// Cmp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cmp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

///
/// Predicate
///
/// Filter value handed to `QuerySource::filter`. The engine only
/// composes predicates; evaluation belongs to the collaborator.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    Cmp {
        field: String,
        op: Cmp,
        value: Value,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

///
/// FieldRef
///
/// Builder for single-field comparisons:
///
///   FieldRef::new("id").gt(since_id)
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldRef(String);

#[allow(clippy::should_implement_trait)]
impl FieldRef {
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self(field.into())
    }

    #[must_use]
    pub fn eq(self, value: impl Into<Value>) -> Predicate {
        self.cmp(Cmp::Eq, value)
    }

    #[must_use]
    pub fn ne(self, value: impl Into<Value>) -> Predicate {
        self.cmp(Cmp::Ne, value)
    }

    #[must_use]
    pub fn lt(self, value: impl Into<Value>) -> Predicate {
        self.cmp(Cmp::Lt, value)
    }

    #[must_use]
    pub fn le(self, value: impl Into<Value>) -> Predicate {
        self.cmp(Cmp::Le, value)
    }

    #[must_use]
    pub fn gt(self, value: impl Into<Value>) -> Predicate {
        self.cmp(Cmp::Gt, value)
    }

    #[must_use]
    pub fn ge(self, value: impl Into<Value>) -> Predicate {
        self.cmp(Cmp::Ge, value)
    }

    fn cmp(self, op: Cmp, value: impl Into<Value>) -> Predicate {
        Predicate::Cmp {
            field: self.0,
            op,
            value: value.into(),
        }
    }
}

///
/// TESTS
///
