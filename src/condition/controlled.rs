/// A value owned by the caller plus the setter that publishes changes.
///
/// Editor surfaces hold one of these instead of reaching into a global store:
/// edits go through [`update`](Self::update), which runs a pure operation on
/// the current value and calls the setter only if the result differs.
pub struct Controlled<T, F>
where
    F: FnMut(&T),
{
    value: T,
    on_change: F,
}

impl<T, F> Controlled<T, F>
where
    T: PartialEq,
    F: FnMut(&T),
{
    pub fn new(value: T, on_change: F) -> Self {
        Self { value, on_change }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Applies `edit` and returns whether the value changed.
    pub fn update(&mut self, edit: impl FnOnce(&T) -> T) -> bool {
        let next = edit(&self.value);
        if next == self.value {
            return false;
        }
        self.value = next;
        (self.on_change)(&self.value);
        true
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}
