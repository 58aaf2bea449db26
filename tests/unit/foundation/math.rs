use super::*;

#[test]
fn rng_is_deterministic_per_seed() {
    let mut a = Rng64::new(7);
    let mut b = Rng64::new(7);
    for _ in 0..16 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
    let mut c = Rng64::new(8);
    assert_ne!(Rng64::new(7).next_u64(), c.next_u64());
}

#[test]
fn rng_unit_interval_and_index_bounds() {
    let mut r = Rng64::new(42);
    for _ in 0..1000 {
        let f = r.next_f64_01();
        assert!((0.0..1.0).contains(&f));
        assert!(r.next_index(7) < 7);
    }
}

#[test]
fn hash_stays_in_unit_interval() {
    for i in 0..64 {
        let h = hash21(i as f32 * 0.37, i as f32 * 1.91);
        assert!((0.0..1.0).contains(&h));
    }
}
