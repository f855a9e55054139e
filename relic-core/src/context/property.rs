//! Typed, per-context property storage. Keys are identified by instance,
//! not by type, so two `ContextProperty<T>` values never collide even when
//! `T` is the same for both.
use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_PROPERTY_ID: AtomicUsize = AtomicUsize::new(0);

/// A key into a [`Context`](super::Context)'s property bag.
///
/// `ContextProperty::new()` mints a fresh identity each call; store the
/// result somewhere stable (a `static` via `Lazy`/`OnceLock`, or a field on
/// the middleware that owns it) and reuse that value as the key.
pub struct ContextProperty<T> {
    id: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for ContextProperty<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ContextProperty<T> {
    pub fn new() -> Self {
        Self {
            id: NEXT_PROPERTY_ID.fetch_add(1, Ordering::Relaxed),
            _marker: PhantomData,
        }
    }

    pub fn get<'a>(&self, bag: &'a PropertyBag) -> Option<&'a T> {
        bag.0.get(&self.id).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn get_mut<'a>(&self, bag: &'a mut PropertyBag) -> Option<&'a mut T> {
        bag.0.get_mut(&self.id).and_then(|v| v.downcast_mut::<T>())
    }

    /// Sets the value, returning the previous one if this property was
    /// already set on `bag`.
    pub fn set(&self, bag: &mut PropertyBag, value: T) -> Option<T> {
        bag.0
            .insert(self.id, Box::new(value))
            .and_then(|old| old.downcast::<T>().ok().map(|b| *b))
    }

    pub fn get_or_insert_with(&self, bag: &mut PropertyBag, init: impl FnOnce() -> T) -> &mut T {
        bag.0
            .entry(self.id)
            .or_insert_with(|| Box::new(init()))
            .downcast_mut::<T>()
            .expect("ContextProperty id collisions cannot happen: ids are never reused")
    }
}

/// Opaque per-context storage. Dropped along with the `Context` it is
/// attached to; there is no global weak-map singleton here.
#[derive(Default)]
pub struct PropertyBag(HashMap<usize, Box<dyn Any>>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_property_reads_as_none() {
        let bag = PropertyBag::default();
        let prop: ContextProperty<u32> = ContextProperty::new();
        assert_eq!(prop.get(&bag), None);
    }

    #[test]
    fn distinct_properties_of_the_same_type_never_collide() {
        let mut bag = PropertyBag::default();
        let a: ContextProperty<u32> = ContextProperty::new();
        let b: ContextProperty<u32> = ContextProperty::new();
        a.set(&mut bag, 1);
        b.set(&mut bag, 2);
        assert_eq!(a.get(&bag), Some(&1));
        assert_eq!(b.get(&bag), Some(&2));
    }

    #[test]
    fn set_returns_previous_value() {
        let mut bag = PropertyBag::default();
        let prop: ContextProperty<&'static str> = ContextProperty::new();
        assert_eq!(prop.set(&mut bag, "first"), None);
        assert_eq!(prop.set(&mut bag, "second"), Some("first"));
    }

    #[test]
    fn get_or_insert_with_only_initializes_once() {
        let mut bag = PropertyBag::default();
        let prop: ContextProperty<Vec<u32>> = ContextProperty::new();
        prop.get_or_insert_with(&mut bag, Vec::new).push(1);
        prop.get_or_insert_with(&mut bag, || panic!("should not re-init")).push(2);
        assert_eq!(prop.get(&bag), Some(&vec![1, 2]));
    }
}
