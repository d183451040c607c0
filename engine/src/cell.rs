use std::cell::UnsafeCell;

/// State owned by the callback context and only touched from one thread at a time.
///
/// While a stream is open only the AAudio callback thread touches the value.
/// Once the stream is closed, AAudio guarantees no callback is in flight and
/// the driver may take it back.
#[derive(Debug)]
pub struct CallbackCell<T> {
    data: UnsafeCell<T>,
}

impl<T> CallbackCell<T> {
    pub fn new(data: T) -> Self {
        CallbackCell {
            data: UnsafeCell::new(data),
        }
    }

    /// # Safety
    ///
    /// No other reference to the value may be live for the duration of `f`.
    pub unsafe fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(unsafe { &mut *self.data.get() })
    }

    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

unsafe impl<T: Send> Send for CallbackCell<T> {}
unsafe impl<T: Send> Sync for CallbackCell<T> {}
