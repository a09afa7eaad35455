use tokio_util::compat::{TokioAsyncReadCompatExt, TokioAsyncWriteCompatExt};
use tstlzw::{decode, encode, Config};

#[tokio::test]
async fn async_roundtrip() {
    let config = Config::new(14).unwrap();
    let data = b"It was the best of times, it was the worst of times, it was the age of wisdom"
        .repeat(50);

    let mut encoded = vec![];
    let result = encode::Encoder::new(config)
        .into_async((&mut encoded).compat_write())
        .encode_all(data.as_slice().compat())
        .await;
    assert!(result.status.is_ok(), "{:?}", result.status);
    assert_eq!(result.bytes_read, data.len());

    let mut decoded = vec![];
    let result = decode::Decoder::new(config)
        .into_async((&mut decoded).compat_write())
        .decode_all(encoded.as_slice().compat())
        .await;
    assert!(result.status.is_ok(), "{:?}", result.status);
    assert_eq!(decoded, data);
}

#[tokio::test]
async fn async_truncated_stream() {
    let config = Config::new(12).unwrap();
    let mut encoded = encode::Encoder::new(config).encode(b"abcabcabc").unwrap();
    encoded.truncate(encoded.len() - 2);

    let mut decoded = vec![];
    let result = decode::Decoder::new(config)
        .into_async((&mut decoded).compat_write())
        .decode_all(encoded.as_slice().compat())
        .await;
    let err = result.status.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}
