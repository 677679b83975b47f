//! End-to-end checks of the wire encodings through the public API.

use compact_bitarray::{
    compact_marshal, compact_unmarshal, marshal_json, unmarshal_json, BitArray, Error, NULL,
};

fn with_bits(bits: isize, set: &[isize]) -> BitArray {
    let mut array = BitArray::new(bits).unwrap();
    for &i in set {
        assert!(array.set_index(i, true));
    }
    array
}

#[test]
fn single_bit() {
    let array = with_bits(1, &[0]);
    assert_eq!(array.to_string(), "x");
    assert_eq!(marshal_json(Some(&array)).unwrap(), b"\"x\"");
    assert_eq!(compact_marshal(Some(&array)), [1, 128]);
}

#[test]
fn partial_byte() {
    let array = with_bits(5, &[0, 1]);
    assert_eq!(array.to_string(), "xx___");
    assert_eq!(compact_marshal(Some(&array)), [5, 192]);
}

#[test]
fn two_full_bytes() {
    let array = with_bits(16, &[0, 1, 15]);
    assert_eq!(compact_marshal(Some(&array)), [16, 192, 1]);
    assert_eq!(array.num_true_bits_before(16), 3);
}

#[test]
fn absence_encodes_as_null() {
    let empty = BitArray::new(0);
    assert_eq!(empty, None);
    assert_eq!(marshal_json(empty.as_ref()).unwrap(), b"null");
    assert_eq!(marshal_json(None).unwrap(), b"null");
    assert_eq!(compact_marshal(empty.as_ref()), NULL);
    assert_eq!(compact_marshal(None), b"null");
    assert_eq!(unmarshal_json(b"null").unwrap(), None);
    assert_eq!(compact_unmarshal(b"null").unwrap(), None);
}

#[test]
fn malicious_varint_is_rejected() {
    let malicious = [
        0xd7, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01, 0x24, 0x28,
    ];
    match compact_unmarshal(&malicious) {
        Err(err @ Error::InvalidVarintLength { n, len }) => {
            assert_eq!((n, len), (-11, 13));
            assert!(err.to_string().contains("n=-11"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn encodings_agree() {
    for bits in 1..=40 {
        let set: Vec<isize> = (0..bits).filter(|i| i % 3 == 0).collect();
        let array = with_bits(bits, &set);

        let from_json = unmarshal_json(&marshal_json(Some(&array)).unwrap())
            .unwrap()
            .unwrap();
        let from_compact = compact_unmarshal(&compact_marshal(Some(&array)))
            .unwrap()
            .unwrap();
        assert_eq!(from_json, array);
        assert_eq!(from_compact, array);
        assert_eq!(from_json.elems(), from_compact.elems());
        assert_eq!(from_json.to_string().len(), bits as usize);
    }
}
