//! Property tests: every rewrite must agree with a plain `Vec` model.

use proptest::prelude::*;
use seqtools::Pipeline;

#[derive(Clone, Copy, Debug)]
enum Slice {
    Take(usize),
    Skip(usize),
    TakeFinal(usize),
    SkipFinal(usize),
    Reverse,
}

fn slice() -> impl Strategy<Value = Slice> {
    prop_oneof![
        (0..12_usize).prop_map(Slice::Take),
        (0..12_usize).prop_map(Slice::Skip),
        (0..12_usize).prop_map(Slice::TakeFinal),
        (0..12_usize).prop_map(Slice::SkipFinal),
        Just(Slice::Reverse),
    ]
}

fn apply<T: Clone + 'static>(pipeline: &Pipeline<T>, op: Slice) -> Pipeline<T> {
    match op {
        Slice::Take(n) => pipeline.take(n),
        Slice::Skip(n) => pipeline.skip(n),
        Slice::TakeFinal(n) => pipeline.take_final(n).unwrap(),
        Slice::SkipFinal(n) => pipeline.skip_final(n).unwrap(),
        Slice::Reverse => pipeline.reverse().unwrap(),
    }
}

fn apply_model<T>(mut vec: Vec<T>, op: Slice) -> Vec<T> {
    match op {
        Slice::Take(n) => vec.truncate(n),
        Slice::Skip(n) => {
            vec.drain(..n.min(vec.len()));
        }
        Slice::TakeFinal(n) => {
            vec.drain(..vec.len().saturating_sub(n));
        }
        Slice::SkipFinal(n) => vec.truncate(vec.len().saturating_sub(n)),
        Slice::Reverse => vec.reverse(),
    }
    vec
}

/// The same elements behind each kind of source: shared, unknown size, and fresh.
fn sources(values: &[i32]) -> [Pipeline<i32>; 3] {
    let shared = Pipeline::from_slice(values);
    let unsized_source = shared.filter(|_| true);
    let fresh = unsized_source.collect_fresh().unwrap();
    [shared, unsized_source, fresh]
}

proptest! {
    #[test]
    fn reverse_twice_is_identity(values in prop::collection::vec(any::<i32>(), 0..40)) {
        for source in sources(&values) {
            let twice = source.reverse().unwrap().reverse().unwrap();
            prop_assert!(twice.sequence_equals(&source).unwrap());
        }
    }

    #[test]
    fn sorted_take_is_stable_head(
        values in prop::collection::vec(0..20_i32, 0..40),
        k in 0..45_usize,
    ) {
        let mut expected = values.clone();
        expected.sort_by_key(|n| n % 5);
        let head = expected.iter().copied().take(k).collect::<Vec<_>>();
        let tail = expected[expected.len().saturating_sub(k)..].to_vec();
        for source in sources(&values) {
            let sorted = source.sort_by_key(|n| n % 5).unwrap();
            prop_assert_eq!(&head, &sorted.take(k).to_vec().unwrap());
            prop_assert_eq!(&head, &source.min_k_by_key(k, |n| n % 5).unwrap().to_vec().unwrap());
            prop_assert_eq!(&tail, &sorted.take_final(k).unwrap().to_vec().unwrap());
            prop_assert_eq!(&tail, &source.max_k_by_key(k, |n| n % 5).unwrap().to_vec().unwrap());
        }
    }

    #[test]
    fn final_slices_partition(values in prop::collection::vec(any::<i32>(), 0..40), n in 0..45_usize) {
        for source in sources(&values) {
            let count = source.count().unwrap();
            prop_assert_eq!(n.min(count), source.take_final(n).unwrap().count().unwrap());
            if n <= count {
                let rejoined = source
                    .skip_final(n)
                    .unwrap()
                    .concat(&source.take_final(n).unwrap());
                prop_assert!(rejoined.sequence_equals(&source).unwrap());
            }
        }
    }

    #[test]
    fn slicing_a_mapping_matches_model(
        values in prop::collection::vec(any::<i16>(), 0..30),
        ops in prop::collection::vec(slice(), 0..5),
    ) {
        let values = values.into_iter().map(i32::from).collect::<Vec<_>>();
        let mut model = values
            .iter()
            .enumerate()
            .map(|(i, &n)| (n, i))
            .collect::<Vec<_>>();
        for &op in &ops {
            model = apply_model(model, op);
        }
        for source in sources(&values) {
            let mut pipeline = source.map_indexed(|n, i| (n, i));
            for &op in &ops {
                pipeline = apply(&pipeline, op);
            }
            prop_assert_eq!(&model, &pipeline.to_vec().unwrap());
            prop_assert_eq!(model.len(), pipeline.count().unwrap());
        }
    }

    #[test]
    fn windows_match_slice_windows(values in prop::collection::vec(any::<i32>(), 0..30), size in 1..6_usize) {
        let expected = values.windows(size).map(<[i32]>::to_vec).collect::<Vec<_>>();
        for source in sources(&values) {
            let windows = source.windows(size).unwrap();
            prop_assert_eq!(&expected, &windows.to_vec().unwrap());
            prop_assert_eq!(expected.len(), windows.count().unwrap());
        }
    }
}
