use std::marker::PhantomData;

use crate::event::Listeners;

/// Argument of a property-change notification. Setting `cancel` vetoes the
/// change; listeners may also rewrite `next`.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyChange<T> {
    pub name: &'static str,
    pub previous: T,
    pub next: T,
    pub cancel: bool,
}

/// Compare-and-notify property slot, typed by its owner `O` so listeners of
/// different owners cannot be mixed up.
pub struct Observed<O: ?Sized, T> {
    name: &'static str,
    value: T,
    generation: u64,
    listeners: Listeners<PropertyChange<T>>,
    _owner: PhantomData<fn(&O)>,
}

impl<O: ?Sized, T: std::fmt::Debug> std::fmt::Debug for Observed<O, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observed")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("generation", &self.generation)
            .finish()
    }
}

impl<O: ?Sized, T: Clone + PartialEq> Observed<O, T> {
    pub fn new(name: &'static str, value: T) -> Self {
        Self {
            name,
            value,
            generation: 0,
            listeners: Listeners::new(),
            _owner: PhantomData,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Bumped on every applied change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn on_change(&mut self, handler: impl FnMut(&mut PropertyChange<T>) + 'static) {
        self.listeners.add(handler);
    }

    /// Returns whether the stored value changed.
    pub fn set(&mut self, next: T) -> bool {
        if self.value == next {
            return false;
        }
        let mut change = PropertyChange {
            name: self.name,
            previous: self.value.clone(),
            next,
            cancel: false,
        };
        self.listeners.emit(&mut change);
        if change.cancel || change.next == self.value {
            log::trace!("property `{}` change vetoed", self.name);
            return false;
        }
        self.value = change.next;
        self.generation += 1;
        true
    }
}
