use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::{
    any::TypeInfo,
    binding::{Binding, BindingSource},
    class::Class,
    config::Config,
    key::BindingKey,
};

#[derive(Debug, Clone)]
pub(crate) enum Entry {
    Bound(Binding),
    /// Several classes claim the same implicit arg name
    Ambiguous(Vec<TypeInfo>),
}

/// Lookup from binding key to binding, fixed once the injector is built
#[derive(Debug, Default)]
pub(crate) struct BindingIndex {
    entries: BTreeMap<BindingKey, Entry>,
}

impl BindingIndex {
    /// Builds the index from implicit class bindings overridden by explicit bindings
    pub(crate) fn build(classes: Vec<Class>, explicit: Vec<Binding>, config: &Config) -> Self {
        let mut implicit: BTreeMap<BindingKey, Vec<Class>> = BTreeMap::new();
        if config.implicit_bindings {
            for class in classes {
                let Some(key) = class.arg_key(config.arg_naming) else {
                    warn!(class = %class, "Class name yields no arg name, class not bound");
                    continue;
                };
                let candidates = implicit.entry(key).or_default();
                if candidates.iter().all(|candidate| candidate.type_info() != class.type_info()) {
                    candidates.push(class);
                }
            }
        }

        let mut entries = BTreeMap::new();
        for (key, mut candidates) in implicit {
            let entry = if candidates.len() == 1 {
                Entry::Bound(Binding::implicit(key.clone(), candidates.remove(0), config.default_scope))
            } else {
                debug!(key = %key, candidates = candidates.len(), "Ambiguous implicit binding");
                Entry::Ambiguous(candidates.iter().map(Class::type_info).collect())
            };
            entries.insert(key, entry);
        }

        for binding in explicit {
            let key = binding.key().clone();
            match entries.insert(key.clone(), Entry::Bound(binding)) {
                Some(Entry::Bound(prev)) if prev.source() != BindingSource::ImplicitClass => {
                    warn!(key = %key, "Explicit binding overrides an earlier explicit binding");
                }
                Some(_) => warn!(key = %key, "Explicit binding overrides implicit binding"),
                None => {}
            }
        }

        Self { entries }
    }

    #[inline]
    pub(crate) fn get(&self, key: &BindingKey) -> Option<&Entry> {
        self.entries.get(key)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
