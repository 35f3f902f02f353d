#![forbid(unsafe_code)]

//! Property-based invariant tests for tour progression.
//!
//! ## Invariants
//!
//! 1. The persisted step never leaves `0..step_count`.
//! 2. `doneTour`, once set, is never cleared by navigation.
//! 3. The in-memory step always equals the persisted step.
//! 4. Advancing from `k < N-1` persists `k+1` without finishing.
//! 5. Unknown fields survive any sequence of operations.
//! 6. Any corrupt record loads as absent and `init` repairs it.

use std::rc::Rc;

use proptest::prelude::*;
use wayfinder_core::{TourProgress, TourStep};
use wayfinder_runtime::{
    Absent, MemoryStorage, Navigator, ProgressStore, StorageBackend, Tour,
};

#[derive(Debug, Clone)]
enum Op {
    Next,
    Back,
    Jump(usize),
    Finish,
    Navigate(u8),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Next),
        3 => Just(Op::Back),
        1 => (0usize..20).prop_map(Op::Jump),
        1 => Just(Op::Finish),
        1 => (0u8..4).prop_map(Op::Navigate),
    ]
}

fn steps(n: usize) -> Vec<TourStep> {
    (0..n).map(|i| TourStep::new(format!("s{i}"), "body")).collect()
}

fn persisted(backend: &MemoryStorage, id: &str) -> TourProgress {
    let raw = backend
        .get(&format!("tour-{id}"))
        .unwrap()
        .expect("record present");
    TourProgress::from_json(&raw).expect("well-typed record")
}

// ── 1-3. State machine ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn operations_preserve_invariants(
        n in 1usize..8,
        ops in prop::collection::vec(arb_op(), 0..40),
    ) {
        let backend = Rc::new(MemoryStorage::new());
        let tour = Tour::mount("p", steps(n), ProgressStore::new(backend.clone()));
        let navigator = tour.navigator(|_: &str| {});
        let mut was_done = false;

        for op in ops {
            match op {
                Op::Next => { tour.next(); }
                Op::Back => { tour.back(); }
                Op::Jump(i) => { tour.jump_to(i); }
                Op::Finish => tour.finish(),
                Op::Navigate(page) => navigator.navigate(&format!("/page/{page}")),
            }
            let record = persisted(&backend, "p");
            prop_assert!(record.step < n, "step {} of {}", record.step, n);
            prop_assert_eq!(record.step, tour.step());
            prop_assert_eq!(record.done_tour, tour.is_done());
            prop_assert!(!was_done || record.done_tour, "doneTour was cleared");
            was_done = record.done_tour;
        }
    }
}

// ── 4. Advance semantics ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn advance_before_last_does_not_finish(
        (n, k) in (2usize..50).prop_flat_map(|n| (Just(n), 0..n - 1)),
    ) {
        let backend = Rc::new(MemoryStorage::new());
        let store = ProgressStore::new(backend.clone());
        let next = store.advance("a", k, n);
        prop_assert_eq!(next, k + 1);
        let record = persisted(&backend, "a");
        prop_assert_eq!(record.step, k + 1);
        prop_assert!(!record.done_tour);
    }

    #[test]
    fn advance_from_last_clamps_and_finishes(n in 1usize..50) {
        let backend = Rc::new(MemoryStorage::new());
        let store = ProgressStore::new(backend.clone());
        prop_assert_eq!(store.advance("a", n - 1, n), n - 1);
        let record = persisted(&backend, "a");
        prop_assert_eq!(record.step, n - 1);
        prop_assert!(record.done_tour);
    }

    #[test]
    fn retreat_saturates(k in 0usize..100) {
        let store = ProgressStore::new(Rc::new(MemoryStorage::new()));
        prop_assert_eq!(store.retreat("r", k), k.saturating_sub(1));
    }
}

// ── 5. Unknown fields ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn unknown_fields_survive(
        key in "[a-z]{3,8}",
        value in any::<i32>(),
        ops in prop::collection::vec(arb_op(), 1..15),
    ) {
        prop_assume!(!["step", "doneTour", "route"].contains(&key.as_str()));
        let backend = Rc::new(MemoryStorage::new());
        backend
            .set("tour-u", &format!(r#"{{"step":0,"doneTour":false,"{key}":{value}}}"#))
            .unwrap();
        let store = ProgressStore::new(backend.clone());
        for op in ops {
            match op {
                Op::Next => { store.advance("u", 0, 3); }
                Op::Back => { store.retreat("u", 1); }
                Op::Jump(i) => { store.jump("u", i, 3); }
                Op::Finish => store.finish("u"),
                Op::Navigate(page) => store.record_route("u", &format!("/{page}")),
            }
        }
        let record = persisted(&backend, "u");
        prop_assert_eq!(record.extra.get(&key), Some(&serde_json::json!(value)));
    }
}

// ── 6. Corruption ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn corrupt_records_reset_to_default(garbage in "[^{]{0,16}") {
        let backend = Rc::new(MemoryStorage::new());
        backend.set("tour-c", &garbage).unwrap();
        let store = ProgressStore::new(backend.clone());
        let loaded = store.load("c");
        prop_assert!(
            matches!(loaded, Err(Absent::Corrupt)),
            "{:?} loaded as {:?}",
            garbage,
            loaded
        );
        prop_assert_eq!(store.init("c"), TourProgress::default());
        prop_assert_eq!(persisted(&backend, "c"), TourProgress::default());
    }
}
