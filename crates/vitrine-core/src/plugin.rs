use crate::{
    collection::RepresentableCollection,
    error::Error,
    paginate::{PageParams, PaginatorFn},
};
use std::sync::Arc;

///
/// PluginDescriptor
///
/// Named bundle of pagination strategies. `install_plugin` registers
/// each entry on the target definition under the same name, so a
/// bundle shared by several record types is declared once.
///

pub struct PluginDescriptor {
    name: &'static str,
    paginators: Vec<(&'static str, PaginatorFn)>,
}

impl PluginDescriptor {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            paginators: Vec::new(),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Add one named pagination strategy to the bundle.
    #[must_use]
    pub fn paginator(
        mut self,
        name: &'static str,
        strategy: impl Fn(&mut RepresentableCollection, &PageParams) -> Result<(), Error>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.paginators.push((name, Arc::new(strategy)));
        self
    }

    pub(crate) fn paginators(&self) -> impl Iterator<Item = (&'static str, &PaginatorFn)> {
        self.paginators
            .iter()
            .map(|(name, strategy)| (*name, strategy))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paginators.is_empty()
    }
}

///
/// TESTS
///
