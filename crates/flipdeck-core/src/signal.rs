use std::cell::RefCell;
use std::rc::Rc;

pub type SubId = usize;

/// Observable shared cell. Clones are handles to the same value.
///
/// Subscribers run after every `set`/`update`, once the write has finished,
/// and receive the new value by reference. They may read any handle to the
/// signal but must not write to it or subscribe from inside the callback.
#[derive(Clone)]
pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

struct Inner<T> {
    value: T,
    subs: Vec<Option<Rc<dyn Fn(&T)>>>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            subs: Vec::new(),
        })))
    }
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }
    /// Reads the value in place without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow().value)
    }
    pub fn set(&self, v: T) {
        self.update(|value| *value = v);
    }
    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        f(&mut self.0.borrow_mut().value);
        let subs: Vec<_> = self.0.borrow().subs.iter().flatten().cloned().collect();
        let inner = self.0.borrow();
        for s in &subs {
            s(&inner.value);
        }
    }
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        let mut inner = self.0.borrow_mut();
        inner.subs.push(Some(Rc::new(f)));
        inner.subs.len() - 1
    }
    pub fn unsubscribe(&self, id: SubId) {
        if let Some(slot) = self.0.borrow_mut().subs.get_mut(id) {
            *slot = None;
        }
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}
