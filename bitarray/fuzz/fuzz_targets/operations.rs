#![no_main]

use arbitrary::Arbitrary;
use compact_bitarray::{compact_marshal, compact_unmarshal, BitArray};
use libfuzzer_sys::fuzz_target;

/// Largest array the fuzzer allocates.
const MAX_BITS: isize = 1 << 16;

#[derive(Arbitrary, Debug)]
enum Operation {
    Set(isize, bool),
    Get(isize),
    NumTrueBitsBefore(isize),
    CloneAndSet(isize, bool),
    RoundTrip,
}

#[derive(Arbitrary, Debug)]
struct Input {
    bits: isize,
    ops: Vec<Operation>,
}

fn fuzz(input: Input) {
    let bits = input.bits.min(MAX_BITS);
    let Some(mut array) = BitArray::new(bits) else {
        assert!(bits <= 0);
        return;
    };
    let len = array.len() as isize;
    assert_eq!(len, bits);

    // Reference model
    let mut model = vec![false; len as usize];
    for op in input.ops {
        match op {
            Operation::Set(index, value) => {
                let in_range = (0..len).contains(&index);
                assert_eq!(array.set_index(index, value), in_range);
                if in_range {
                    model[index as usize] = value;
                }
            }
            Operation::Get(index) => {
                let expected = (0..len).contains(&index) && model[index as usize];
                assert_eq!(array.get_index(index), expected);
            }
            Operation::NumTrueBitsBefore(index) => {
                let end = index.clamp(0, len) as usize;
                let expected = model[..end].iter().filter(|&&b| b).count();
                assert_eq!(array.num_true_bits_before(index), expected);
            }
            Operation::CloneAndSet(index, value) => {
                let mut copy = array.clone();
                assert_eq!(copy, array);
                if copy.set_index(index, value) && array.get_index(index) != value {
                    assert_ne!(copy, array);
                }
            }
            Operation::RoundTrip => {
                let decoded = compact_unmarshal(&compact_marshal(Some(&array))).unwrap();
                assert_eq!(decoded.as_ref(), Some(&array));
                let text = array.to_string();
                assert_eq!(text.parse::<BitArray>().unwrap(), array);
            }
        }
    }
    assert_eq!(array.count_ones(), model.iter().filter(|&&b| b).count());
}

fuzz_target!(|input: Input| {
    fuzz(input);
});
