use smallvec::SmallVec;

/// Ordered listener list. Listeners run synchronously, in registration order,
/// and may mutate the argument (to mark it handled, or to veto).
pub struct Listeners<E> {
    handlers: SmallVec<[Box<dyn FnMut(&mut E)>; 2]>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            handlers: SmallVec::new(),
        }
    }
}

impl<E> std::fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listeners({})", self.handlers.len())
    }
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, handler: impl FnMut(&mut E) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    pub fn emit(&mut self, args: &mut E) {
        for h in self.handlers.iter_mut() {
            h(args);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}
