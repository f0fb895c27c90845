//! Ordered composition of interceptor layers.

use std::sync::Arc;

/// Wrap `base` with `layers`, the first layer ending up outermost.
///
/// Each layer receives the already composed inner chain as its `next` and
/// returns the wrapping implementation of the same capability set.
pub fn build_chain<T, I, L>(base: Arc<T>, layers: I) -> Arc<T>
where
    T: ?Sized,
    I: IntoIterator<Item = L>,
    I::IntoIter: DoubleEndedIterator,
    L: FnOnce(Arc<T>) -> Arc<T>,
{
    layers
        .into_iter()
        .rev()
        .fold(base, |next, layer| layer(next))
}
