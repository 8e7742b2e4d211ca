#![no_main]
use libfuzzer_sys::fuzz_target;
use monofano::EliasFano;

fuzz_target!(|data: (Vec<u64>, usize, Vec<u8>)| {
    let (mut values, probe, bytes) = data;

    // Arbitrary bytes must decode or fail, never panic.
    if let Ok(ef) = EliasFano::from_bytes(&bytes) {
        let _ = ef.select(probe % ef.len());
    }

    if values.is_empty() {
        assert!(EliasFano::new(&values).is_err());
        return;
    }
    values.sort_unstable();

    let ef = EliasFano::new(&values).unwrap();
    let k = probe % values.len();
    let v = ef.select(k).unwrap();
    assert_eq!(v, values[k]);

    let r = ef.rank(v).unwrap();
    assert!(r <= k);
    assert_eq!(values[r], v);

    let back = EliasFano::from_bytes(&ef.to_bytes()).unwrap();
    assert_eq!(back, ef);
});
