use std::cell::{Cell, RefCell};
use std::sync::Arc;

use flexstr::SharedStr as FlexStr;

use tracing::debug;

use crate::web::sort::SortDirection;

// How memoized inputs are compared: maps and other shared values by pointer,
// scalars by value.
pub trait Identity {
    fn same(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Identity for Arc<T> {
    fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: Identity> Identity for Option<T> {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same(b),
            (None, None) => true,
            _ => false,
        }
    }
}

macro_rules! value_identity {
    ($($t:ty),*) => {
        $(
            impl Identity for $t {
                fn same(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    }
}

value_identity!(bool, i8, usize, String, FlexStr, SortDirection);

macro_rules! tuple_identity {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Identity),+> Identity for ($($name,)+) {
            fn same(&self, other: &Self) -> bool {
                $(self.$idx.same(&other.$idx))&&+
            }
        }
    }
}

tuple_identity!(A: 0, B: 1);
tuple_identity!(A: 0, B: 1, C: 2);
tuple_identity!(A: 0, B: 1, C: 2, D: 3);
tuple_identity!(A: 0, B: 1, C: 2, D: 3, E: 4);
tuple_identity!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
tuple_identity!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
tuple_identity!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

// A single-slot cache of a derivation.  The output is recomputed only when
// the inputs differ (by Identity) from the last call, otherwise the previous
// Arc is returned.
pub struct Memo<I, O> {
    name: &'static str,
    slot: RefCell<Option<(I, Arc<O>)>>,
    compute_count: Cell<usize>,
}

impl<I: Identity, O> Memo<I, O> {
    pub fn new(name: &'static str) -> Memo<I, O> {
        Memo {
            name,
            slot: RefCell::new(None),
            compute_count: Cell::new(0),
        }
    }

    pub fn get_or_compute(&self, inputs: I, compute: impl FnOnce(&I) -> O) -> Arc<O> {
        {
            let slot = self.slot.borrow();
            if let Some((last_inputs, last_output)) = slot.as_ref()
                && last_inputs.same(&inputs) {
                    return last_output.clone();
                }
        }

        debug!("recomputing {}", self.name);

        let output = Arc::new(compute(&inputs));
        self.compute_count.set(self.compute_count.get() + 1);
        *self.slot.borrow_mut() = Some((inputs, output.clone()));

        output
    }

    // the number of times the output has been computed
    pub fn compute_count(&self) -> usize {
        self.compute_count.get()
    }
}

#[test]
fn test_memo_identity() {
    let memo: Memo<(Arc<Vec<u32>>, usize), u32> = Memo::new("sum");
    let numbers = Arc::new(vec![1, 2, 3]);

    let first = memo.get_or_compute((numbers.clone(), 1), |(n, m)| n.iter().sum::<u32>() * *m as u32);
    let second = memo.get_or_compute((numbers.clone(), 1), |_| panic!("recomputed"));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*first, 6);

    // equal contents, different Arc
    let third = memo.get_or_compute((Arc::new(vec![1, 2, 3]), 1), |(n, _)| n.iter().sum());
    assert!(!Arc::ptr_eq(&first, &third));

    let fourth = memo.get_or_compute((numbers, 2), |(n, m)| n.iter().sum::<u32>() * *m as u32);
    assert_eq!(*fourth, 12);
    assert_eq!(memo.compute_count(), 3);
}
