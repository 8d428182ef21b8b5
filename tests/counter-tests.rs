use std::thread;

use clicker::{create, Counter, OverflowPolicy, SharedCounter};

#[test]
fn nth_call_returns_n() {
    let mut click = create();
    for n in 1..=500 {
        assert_eq!(click(), n);
    }
}

#[test]
fn separately_created_functions_do_not_share_state() {
    let mut c1 = create();
    let mut c2 = create();
    assert_eq!(c1(), 1);
    assert_eq!(c1(), 2);
    assert_eq!(c2(), 1);
}

#[test]
fn strictly_increasing() {
    let mut counter = Counter::with_policy(OverflowPolicy::Checked);
    let mut previous = counter.clicks();
    for _ in 0..100 {
        let next = counter.try_increment().unwrap();
        assert!(next > previous);
        previous = next;
    }
}

#[test]
fn closure_moves_to_another_thread() {
    let mut click = create();
    assert_eq!(click(), 1);
    let rest = thread::spawn(move || [click(), click()]).join().unwrap();
    assert_eq!(rest, [2, 3]);
}

#[test]
fn shared_counter_across_threads() {
    let counter = SharedCounter::with_policy(OverflowPolicy::Checked);
    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..100 {
                    counter.increment().unwrap();
                }
            });
        }
    });
    assert_eq!(counter.clicks(), Ok(400));
}
