//! Model-based checks of the store structures against `VecDeque` and a stable sort.

use std::collections::VecDeque;

use proptest::prelude::*;
use seqstore::{BoundedSortedSeq, RingBuffer, SizeLimit, order};

#[derive(Clone, Debug)]
enum Op {
    Push(u8),
    Pop,
    Shift,
    Unshift(u8),
    ExtendBack(Vec<u8>),
    ExtendFront(Vec<u8>),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::Push),
        Just(Op::Pop),
        Just(Op::Shift),
        any::<u8>().prop_map(Op::Unshift),
        prop::collection::vec(any::<u8>(), 0..12).prop_map(Op::ExtendBack),
        prop::collection::vec(any::<u8>(), 0..12).prop_map(Op::ExtendFront),
    ]
}

fn apply_model(model: &mut VecDeque<u8>, capacity: usize, op: &Op) {
    match op {
        Op::Push(v) => {
            if model.len() == capacity {
                model.pop_front();
            }
            model.push_back(*v);
        }
        Op::Pop => {
            model.pop_back();
        }
        Op::Shift => {
            model.pop_front();
        }
        Op::Unshift(v) => {
            if model.len() == capacity {
                model.pop_back();
            }
            model.push_front(*v);
        }
        Op::ExtendBack(batch) => {
            for &v in batch {
                if model.len() == capacity {
                    model.pop_front();
                }
                model.push_back(v);
            }
        }
        Op::ExtendFront(batch) => {
            for &v in batch.iter().rev() {
                if model.len() == capacity {
                    model.pop_back();
                }
                model.push_front(v);
            }
        }
    }
}

proptest! {
    #[test]
    fn ring_buffer_matches_model(capacity in 1_usize..8, ops in prop::collection::vec(op(), 0..64)) {
        let mut ring = RingBuffer::new(capacity).unwrap();
        let mut model = VecDeque::new();
        for op in &ops {
            match op {
                Op::Push(v) => { ring.push(*v); }
                Op::Pop => { ring.pop(); }
                Op::Shift => { ring.shift(); }
                Op::Unshift(v) => { ring.unshift(*v); }
                Op::ExtendBack(batch) => ring.extend_back(batch.iter().copied()).unwrap(),
                Op::ExtendFront(batch) => ring.extend_front(batch.iter().copied()).unwrap(),
            }
            apply_model(&mut model, capacity, op);

            prop_assert_eq!(model.len(), ring.len());
            for (i, expected) in model.iter().enumerate() {
                prop_assert_eq!(Some(expected), ring.get(i as isize));
            }
            prop_assert!(ring.iter().rev().eq(model.iter().rev()));
        }
    }

    #[test]
    fn bounded_sorted_keeps_stable_head(values in prop::collection::vec(0_u8..16, 0..48), k in 0_usize..12) {
        // Tag each value with its arrival position so ties are observable.
        let tagged: Vec<(u8, usize)> = values.iter().copied().zip(0..).collect();
        let mut sorted = tagged.clone();
        sorted.sort_by_key(|&(v, _)| v);

        let by_value = order::by_key(|&(v, _): &(u8, usize)| v);
        let mut least = BoundedSortedSeq::with_limit(by_value.clone(), SizeLimit::least(k));
        least.push_many(tagged.iter().copied());
        let expected: Vec<_> = sorted.iter().copied().take(k).collect();
        prop_assert_eq!(expected, least.into_vec());

        let mut greatest = BoundedSortedSeq::with_limit(by_value, SizeLimit::greatest(k));
        greatest.push_many(tagged.iter().copied());
        let expected: Vec<_> = sorted[sorted.len().saturating_sub(k)..].to_vec();
        prop_assert_eq!(expected, greatest.into_vec());
    }

    #[test]
    fn bounded_sorted_retained_set_ignores_push_order(
        values in prop::collection::vec(any::<i16>(), 0..48).prop_shuffle(),
        k in 0_usize..12,
    ) {
        let mut least = BoundedSortedSeq::with_limit(order::natural(), SizeLimit::least(k));
        least.push_many(values.iter().copied());

        let mut sorted = values.clone();
        sorted.sort();
        sorted.truncate(k);
        prop_assert_eq!(sorted, least.into_vec());
    }
}
