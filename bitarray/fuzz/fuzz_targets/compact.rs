#![no_main]

use compact_bitarray::{compact_marshal, compact_unmarshal, marshal_json, unmarshal_json};
use libfuzzer_sys::fuzz_target;

fn fuzz(data: &[u8]) {
    // Anything that decodes must survive a round trip
    if let Ok(array) = compact_unmarshal(data) {
        let encoded = compact_marshal(array.as_ref());
        assert!(encoded.len() <= data.len());
        assert_eq!(compact_unmarshal(&encoded).unwrap(), array);
    }

    if let Ok(array) = unmarshal_json(data) {
        let encoded = marshal_json(array.as_ref()).unwrap();
        assert_eq!(unmarshal_json(&encoded).unwrap(), array);
    }
}

fuzz_target!(|data: &[u8]| {
    fuzz(data);
});
