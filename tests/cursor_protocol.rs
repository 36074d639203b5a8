//! End-to-end staleness scenarios through the public API.

use bivec::{BiVec, BiVecConfig, Error, Severity};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn seeded() -> BiVec<u32> {
    let mut v = BiVec::with_capacity(8);
    for i in 1..=4 {
        v.push_back(i).unwrap();
    }
    v
}

fn invalid(severity: Severity) -> Error {
    Error::InvalidCursor { severity }
}

#[test]
fn reallocation_after_five_pushes_is_moderate() {
    init_tracing();
    let mut v = seeded();
    let it = v.begin().offset(&v, 2).unwrap();
    assert_eq!(it.get(&v), Ok(&3));
    for i in 0..5 {
        v.push_back(100 + i).unwrap();
    }
    assert_eq!(v.capacity(), 16);
    assert_eq!(v.reallocations(), 1);
    assert_eq!(it.get(&v), Err(invalid(Severity::Moderate)));
}

#[test]
fn popping_the_last_element_is_severe() {
    init_tracing();
    let mut v = seeded();
    let it = v.begin().offset(&v, 3).unwrap();
    assert_eq!(it.get(&v), Ok(&4));
    v.pop_back().unwrap();
    assert_eq!(it.get(&v), Err(invalid(Severity::Severe)));
}

#[test]
fn push_into_spare_is_mild() {
    init_tracing();
    let mut v = seeded();
    let it = v.begin();
    v.push_back(5).unwrap();
    assert_eq!(v.reallocations(), 0);
    assert_eq!(it.get(&v), Err(invalid(Severity::Mild)));
}

#[test]
fn front_pop_moves_the_window_but_keeps_the_position() {
    init_tracing();
    let mut v = seeded();
    let last = v.begin().offset(&v, 3).unwrap();
    let first = v.begin();
    v.pop_front().unwrap();
    // Relative position 3 is now past the end.
    assert_eq!(last.get(&v), Err(invalid(Severity::Severe)));
    assert_eq!(first.get(&v), Err(invalid(Severity::Mild)));
}

#[test]
fn moved_from_sequence_is_a_fresh_shell() {
    init_tracing();
    let mut a = seeded();
    let stale = a.begin();
    let b = a.take();
    assert_eq!(b.as_slice(), &[1, 2, 3, 4]);
    assert_eq!(a.len(), 0);
    assert_eq!(stale.get(&a), Err(invalid(Severity::Moderate)));

    a.push_back(9).unwrap();
    a.push_front(8).unwrap();
    assert_eq!(a.as_slice(), &[8, 9]);
    assert_eq!(a.begin().get(&a), Ok(&8));
}

#[test]
fn configured_minimum_drives_growth() {
    init_tracing();
    let mut v: BiVec<u32> = BiVec::with_config(BiVecConfig::new().with_min_capacity(1));
    let mut capacities = Vec::new();
    for i in 0..9 {
        v.push_back(i).unwrap();
        capacities.push(v.capacity());
    }
    assert_eq!(capacities, vec![1, 2, 4, 4, 8, 8, 8, 8, 16]);
    assert_eq!(v.reallocations(), 4);
}
