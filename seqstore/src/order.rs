//! Runtime comparators and helpers for composing them.
//!
//! The structures in this crate are ordered by a caller-supplied [`Comparator`] rather than by [`Ord`], so that the
//! same element type can be ordered differently by different structures.

use std::cmp::Ordering;
use std::rc::Rc;

/// A shared total order over `T`.
pub type Comparator<T> = Rc<dyn Fn(&T, &T) -> Ordering>;

/// The natural [`Ord`] order.
pub fn natural<T: Ord + ?Sized + 'static>() -> Comparator<T> {
    Rc::new(|a: &T, b: &T| a.cmp(b))
}

/// The natural [`Ord`] order, descending.
pub fn natural_descending<T: Ord + ?Sized + 'static>() -> Comparator<T> {
    Rc::new(|a: &T, b: &T| b.cmp(a))
}

/// Wraps a comparator function.
pub fn from_fn<T: ?Sized + 'static>(func: impl Fn(&T, &T) -> Ordering + 'static) -> Comparator<T> {
    Rc::new(func)
}

/// Orders by a key extracted from each element.
pub fn by_key<T: ?Sized + 'static, K: Ord>(key_fn: impl Fn(&T) -> K + 'static) -> Comparator<T> {
    Rc::new(move |a: &T, b: &T| key_fn(a).cmp(&key_fn(b)))
}

/// Reverses `order`.
pub fn reverse<T: ?Sized + 'static>(order: Comparator<T>) -> Comparator<T> {
    Rc::new(move |a: &T, b: &T| order(b, a))
}

/// Orders by `first`, breaking ties with `second`.
pub fn then<T: ?Sized + 'static>(first: Comparator<T>, second: Comparator<T>) -> Comparator<T> {
    Rc::new(move |a: &T, b: &T| first(a, b).then_with(|| second(a, b)))
}

/// Orders lexicographically by `orders`: each comparator breaks the ties left by the ones before it.
///
/// An empty chain considers all elements equal.
pub fn chain<T: ?Sized + 'static>(orders: Rc<[Comparator<T>]>) -> Comparator<T> {
    if orders.len() == 1 {
        return orders[0].clone();
    }
    Rc::new(move |a: &T, b: &T| {
        orders
            .iter()
            .map(|order| order(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_chain() {
        let order = chain::<(i32, i32)>(Rc::from(vec![
            by_key(|&(a, _): &(i32, i32)| a),
            reverse(by_key(|&(_, b): &(i32, i32)| b)),
        ]));
        let mut items = vec![(1, 1), (0, 5), (1, 3), (0, 2)];
        items.sort_by(|a, b| order(a, b));
        assert_eq!(vec![(0, 5), (0, 2), (1, 3), (1, 1)], items);
    }

    #[test]
    fn test_empty_chain() {
        let order = chain::<i32>(Rc::from(Vec::new()));
        assert_eq!(Ordering::Equal, order(&1, &2));
    }

    #[test]
    fn test_natural_descending() {
        let order = natural_descending::<str>();
        assert_eq!(Ordering::Greater, order("a", "b"));
        assert_eq!(Ordering::Less, then(natural(), natural())(&1, &2));
    }
}
