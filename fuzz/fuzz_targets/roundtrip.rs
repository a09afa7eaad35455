#![no_main]
use libfuzzer_sys::fuzz_target;
use tstlzw::{decode, encode, Config};

fuzz_target!(|data: &[u8]| {
    let data: Vec<u8> = data.iter().map(|b| b & 0x7f).collect();
    let config = Config::new(10).unwrap();

    let mut encoder = encode::Encoder::new(config);
    let mut buffer = Vec::with_capacity(2 * data.len() + 40);
    let result = encoder.into_stream(&mut buffer).encode_all(data.as_slice());
    assert!(result.status.is_ok(), "{:?}", result.status);

    let mut decoder = decode::Decoder::new(config);
    let mut compare = vec![];
    let result = decoder.into_stream(&mut compare).decode_all(buffer.as_slice());
    assert!(result.status.is_ok(), "{:?}", result.status);
    assert_eq!(data, compare);
});
