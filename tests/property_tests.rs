use proptest::prelude::*;
use monofano::bitvec::BitVector;
use monofano::unary;
use monofano::{EliasFano, Error};

fn sorted_values() -> impl Strategy<Value = Vec<u64>> {
    prop_oneof![
        prop::collection::vec(0..10_000u64, 1..200),
        prop::collection::vec(0..4u64, 1..50),
        prop::collection::vec(any::<u64>(), 1..50),
    ]
    .prop_map(|mut v| {
        v.sort_unstable();
        v
    })
}

proptest! {
    #[test]
    fn test_select_roundtrip(values in sorted_values()) {
        let ef = EliasFano::new(&values).unwrap();
        prop_assert_eq!(ef.len(), values.len());

        for (i, &expected) in values.iter().enumerate() {
            prop_assert_eq!(ef.select(i).unwrap(), expected);
        }
        let out_of_range = matches!(
            ef.select(values.len()),
            Err(Error::IndexOutOfRange { .. })
        );
        prop_assert!(out_of_range);
        prop_assert_eq!(ef.iter().collect::<Vec<_>>(), values);
    }

    #[test]
    fn test_rank_inverts_select(values in sorted_values()) {
        let ef = EliasFano::new(&values).unwrap();

        for (i, &v) in values.iter().enumerate() {
            let k = ef.rank(v).unwrap();
            prop_assert!(k <= i);
            prop_assert_eq!(ef.select(k).unwrap(), v);
            // First occurrence.
            let first = values.iter().position(|&x| x == v).unwrap();
            prop_assert_eq!(k, first);
        }
    }

    #[test]
    fn test_rank_missing_values(values in sorted_values(), probe in any::<u64>()) {
        let ef = EliasFano::new(&values).unwrap();
        match ef.rank(probe) {
            Ok(k) => prop_assert_eq!(values[k], probe),
            Err(Error::ValueNotFound(p)) => {
                prop_assert_eq!(p, probe);
                prop_assert!(!values.contains(&probe));
            }
            Err(e) => prop_assert!(false, "unexpected error: {e}"),
        }
    }

    #[test]
    fn test_space_identity(values in sorted_values()) {
        let ef = EliasFano::new(&values).unwrap();
        let n = values.len();
        let w = ef.width();
        let last_high = if w >= 64 { 0 } else { (values[n - 1] >> w) as usize };

        prop_assert_eq!(ef.low_bits_len(), n * w);
        prop_assert_eq!(ef.high_bits_len(), last_high + n);
        prop_assert_eq!(ef.num_bits(), n * w + last_high + n);
        // Elias-Fano bound on the high store.
        prop_assert!(ef.high_bits_len() <= 2 * n);
    }

    #[test]
    fn test_bytes_roundtrip(values in sorted_values()) {
        let ef = EliasFano::new(&values).unwrap();
        let back = EliasFano::from_bytes(&ef.to_bytes()).unwrap();
        prop_assert_eq!(&back, &ef);
    }

    #[test]
    fn test_from_bytes_damaged_encoding(
        values in sorted_values(),
        damage in 0..4u8,
        at in any::<prop::sample::Index>(),
        field in 0..1_000u64,
    ) {
        let mut bytes = EliasFano::new(&values).unwrap().to_bytes();
        match damage {
            0 => {
                let bit = at.index(bytes.len() * 8);
                bytes[bit / 8] ^= 1 << (bit % 8);
            }
            1 => bytes[8..16].copy_from_slice(&field.to_le_bytes()),
            2 => bytes[16..24].copy_from_slice(&(field % 70).to_le_bytes()),
            _ => bytes.truncate(at.index(bytes.len())),
        }

        match EliasFano::from_bytes(&bytes) {
            Ok(ef) => {
                let decoded: Vec<u64> = ef.iter().collect();
                prop_assert_eq!(decoded.len(), ef.len());
                prop_assert!(decoded.windows(2).all(|w| w[0] <= w[1]));
                for (k, &v) in decoded.iter().enumerate() {
                    prop_assert_eq!(ef.select(k).unwrap(), v);
                    let r = ef.rank(v).unwrap();
                    prop_assert_eq!(ef.select(r).unwrap(), v);
                }
            }
            Err(Error::InvalidEncoding(_)) => {}
            Err(e) => prop_assert!(false, "unexpected error: {e}"),
        }
    }

    #[test]
    fn test_unsorted_rejected(mut values in prop::collection::vec(0..1_000u64, 2..100)) {
        values.sort_unstable();
        values.dedup();
        prop_assume!(values.len() >= 2);
        values.reverse();
        let rejected = matches!(EliasFano::new(&values), Err(Error::InvalidInput(_)));
        prop_assert!(rejected);
    }

    #[test]
    fn test_unary_stream_roundtrip(deltas in prop::collection::vec(0..300u64, 0..100)) {
        let mut bits = BitVector::new();
        for &d in &deltas {
            unary::encode_into(&mut bits, d);
        }
        prop_assert_eq!(bits.len() as u64, deltas.iter().sum::<u64>() + deltas.len() as u64);
        prop_assert_eq!(unary::codes(&bits, 0).collect::<Vec<_>>(), deltas);
    }
}

#[test]
fn test_boundary_cases() {
    assert_eq!(EliasFano::new(&[5]).unwrap().select(0).unwrap(), 5);

    let ef = EliasFano::new(&[3, 3, 3]).unwrap();
    assert_eq!(ef.select(1).unwrap(), 3);
    assert!(ef.rank(3).unwrap() < 3);

    let ef = EliasFano::new(&[0, 1, 1_000_000]).unwrap();
    assert_eq!(ef.select(2).unwrap(), 1_000_000);

    assert!(matches!(
        EliasFano::new(&[3, 1, 2]),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(EliasFano::new(&[]), Err(Error::InvalidInput(_))));
}

#[test]
fn test_shared_across_threads() {
    let values: Vec<u64> = (0..1_000).map(|i| i * 37).collect();
    let ef = std::sync::Arc::new(EliasFano::new(&values).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let ef = std::sync::Arc::clone(&ef);
            std::thread::spawn(move || {
                for k in (t..1_000).step_by(4) {
                    assert_eq!(ef.select(k).unwrap(), k as u64 * 37);
                    assert_eq!(ef.rank(k as u64 * 37).unwrap(), k);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}
