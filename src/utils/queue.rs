use std::collections::VecDeque;

/// Proxy providing pushing access to the queue of outgoing agent actions.
///
/// Actions keep the order in which they were pushed,
/// so a `FILLED` notification always precedes the `ORDER_EXECUTED` one it belongs to.
pub struct MessageReceiver<'a, T> (&'a mut VecDeque<T>);

impl<'a, T> MessageReceiver<'a, T> {
    pub fn new(queue: &'a mut VecDeque<T>) -> Self {
        Self(queue)
    }

    pub fn push(&mut self, item: T) {
        self.0.push_back(item)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a, T> Extend<T> for MessageReceiver<'a, T> {
    fn extend<I: IntoIterator<Item=T>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}
