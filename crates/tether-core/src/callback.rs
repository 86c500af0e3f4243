//! The [`Callback`] signature trait.
//!
//! A callback signature is described by its argument tuple: `()` for a
//! callback taking nothing, `(String, i32)` for one taking a string and an
//! integer, `(u8,)` for a single argument. Any `Fn` closure, function item
//! or function pointer of matching arity implements [`Callback`] for that
//! tuple, so callers never implement the trait by hand.
//!
//! Callbacks return nothing. Arities 0 through 8 are supported.

/// A callable value with a fixed argument list and no result.
///
/// `Args` is the argument tuple. Invocation unpacks the tuple and forwards
/// each element to the underlying closure by value.
pub trait Callback<Args>: 'static {
    /// Invoke the callable with the given arguments.
    fn invoke(&self, args: Args);
}

macro_rules! impl_callback {
    ($($arg:ident),*) => {
        impl<Func, $($arg,)*> Callback<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) + 'static,
        {
            #[allow(non_snake_case)]
            #[inline]
            fn invoke(&self, ($($arg,)*): ($($arg,)*)) {
                (self)($($arg),*)
            }
        }
    };
}

impl_callback!();
impl_callback!(A0);
impl_callback!(A0, A1);
impl_callback!(A0, A1, A2);
impl_callback!(A0, A1, A2, A3);
impl_callback!(A0, A1, A2, A3, A4);
impl_callback!(A0, A1, A2, A3, A4, A5);
impl_callback!(A0, A1, A2, A3, A4, A5, A6);
impl_callback!(A0, A1, A2, A3, A4, A5, A6, A7);

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn dispatch<Args, F: Callback<Args>>(f: &F, args: Args) {
        f.invoke(args);
    }

    #[test]
    fn nullary_closure() {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let f = move || h.set(h.get() + 1);
        dispatch(&f, ());
        dispatch(&f, ());
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn arguments_forwarded_in_order() {
        let out = Rc::new(RefCell::new(String::new()));
        let o = Rc::clone(&out);
        let f = move |s: String, n: usize| {
            let mut out = o.borrow_mut();
            out.clear();
            for _ in 0..n {
                out.push_str(&s);
            }
        };
        dispatch(&f, ("ab".to_string(), 0usize));
        assert_eq!(*out.borrow(), "");
        dispatch(&f, ("ab".to_string(), 3usize));
        assert_eq!(*out.borrow(), "ababab");
    }

    #[test]
    fn function_item_is_a_callback() {
        thread_local! {
            static SEEN: Cell<u32> = const { Cell::new(0) };
        }
        fn record(v: u32) {
            SEEN.with(|s| s.set(v));
        }
        dispatch(&record, (42u32,));
        assert_eq!(SEEN.with(Cell::get), 42);
    }

    #[test]
    fn widest_arity() {
        let sum = Rc::new(Cell::new(0u32));
        let s = Rc::clone(&sum);
        let f = move |a: u32, b: u32, c: u32, d: u32, e: u32, f: u32, g: u32, h: u32| {
            s.set(a + b + c + d + e + f + g + h);
        };
        dispatch(&f, (1u32, 2u32, 3u32, 4u32, 5u32, 6u32, 7u32, 8u32));
        assert_eq!(sum.get(), 36);
    }
}
