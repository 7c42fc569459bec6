use super::*;

use proptest::prelude::*;

fn reference_digest(data: &[u8]) -> RollingDigest {
    let mut s1: u64 = 0;
    let mut s2: u64 = 0;

    for &byte in data {
        s1 += u64::from(byte);
        s2 += s1;
    }

    RollingDigest::new((s1 & 0xffff) as u16, (s2 & 0xffff) as u16, data.len())
}

fn data_and_window() -> impl Strategy<Value = (Vec<u8>, usize)> {
    prop::collection::vec(any::<u8>(), 1..=256)
        .prop_flat_map(|data| {
            let len = data.len();
            (Just(data), 1..=len)
        })
}

#[test]
fn digest_matches_reference_for_known_input() {
    let data = b"rolling checksum over a block";
    let mut checksum = RollingChecksum::new();
    checksum.update(data);

    assert_eq!(checksum.digest(), reference_digest(data));
    assert_eq!(checksum.value(), reference_digest(data).value());
}

#[test]
fn empty_window_cannot_roll() {
    let mut checksum = RollingChecksum::new();
    assert_eq!(checksum.roll(1, 2), Err(RollingError::EmptyWindow));
    assert_eq!(checksum.rotate_out(1), Err(RollingError::EmptyWindow));
}

#[test]
fn reset_clears_state() {
    let mut checksum = RollingChecksum::new();
    checksum.update(b"abc");
    checksum.reset();
    assert!(checksum.is_empty());
    assert_eq!(checksum, RollingChecksum::new());
}

#[test]
fn digest_round_trips_through_packed_value() {
    let sample = RollingDigest::new(0x1357, 0x2468, 4096);
    let unpacked = RollingDigest::from_value(sample.value(), sample.len());
    assert_eq!(unpacked, sample);
    assert_eq!(RollingChecksum::from(sample).digest(), sample);
}

#[test]
fn rotate_out_shrinks_window_to_suffix() {
    let data = b"shrinking window";
    let mut checksum = RollingChecksum::new();
    checksum.update(data);

    for start in 1..data.len() {
        checksum.rotate_out(data[start - 1]).expect("non-empty window");
        assert_eq!(checksum.digest(), reference_digest(&data[start..]));
    }
}

proptest! {
    #[test]
    fn chunked_update_matches_single_pass(chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..=64), 1..=8)) {
        let mut incremental = RollingChecksum::new();
        let mut whole = Vec::new();
        for chunk in &chunks {
            incremental.update(chunk);
            whole.extend_from_slice(chunk);
        }

        prop_assert_eq!(incremental.digest(), reference_digest(&whole));
    }

    #[test]
    fn rolling_matches_recomputation((data, window) in data_and_window()) {
        let mut rolling = RollingChecksum::new();
        rolling.update(&data[..window]);

        for start in 1..=data.len() - window {
            rolling.roll(data[start - 1], data[start + window - 1]).expect("roll");
            prop_assert_eq!(rolling.digest(), reference_digest(&data[start..start + window]));
        }
    }
}
