#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|raw_data: &[u8]| {
    let config = tstlzw::Config::new(9).unwrap();
    let mut decoder = tstlzw::Decoder::new(config);
    let _ = decoder.into_stream(std::io::sink()).decode_all(raw_data);
});
