//! Truncated and corrupted inputs fail cleanly

mod common;

use common::*;
use elassets_parsers::e3d::{format, options};
use elassets_parsers::{
    CafDecoder, CmfDecoder, CsfDecoder, DecodeError, DecodeOptions, DecodeResult, Decoder,
    E3dDecoder, E3dVersion, ElmDecoder, ErrorKind, VertexPlan,
};
use proptest::prelude::*;

fn assert_clean_failure<T: std::fmt::Debug>(result: DecodeResult<T>, len: usize) {
    match result {
        Ok(value) => panic!("prefix of {len} bytes decoded: {value:?}"),
        Err(e) => assert!(
            matches!(e.kind(), ErrorKind::Bounds | ErrorKind::SizeMismatch | ErrorKind::Format),
            "prefix of {len} bytes: unexpected error {e}"
        ),
    }
}

fn check_every_prefix<D: Decoder>(decoder: &D, data: &[u8])
where
    D::Output: std::fmt::Debug,
{
    assert!(decoder.decode(data).is_ok());
    for len in 0..data.len() {
        assert_clean_failure(decoder.decode(&data[..len]), len);
    }
}

#[test]
fn test_truncated_mesh() {
    check_every_prefix(&CmfDecoder::new(), &encode_cmf(&sample_mesh()));
}

#[test]
fn test_truncated_skeleton() {
    check_every_prefix(&CsfDecoder::new(), &encode_csf(&sample_skeleton()));
}

#[test]
fn test_truncated_animation() {
    check_every_prefix(&CafDecoder::new(), &encode_caf(&sample_animation()));
}

#[test]
fn test_truncated_map() {
    check_every_prefix(&ElmDecoder::new(), &encode_elm(&sample_map()));
}

#[test]
fn test_truncated_magic_is_bounds_error() {
    let data = encode_cmf(&sample_mesh());
    let err = CmfDecoder::new().decode(&data[..2]).unwrap_err();
    assert!(matches!(err, DecodeError::OutOfBounds { .. }));
}

#[test]
fn test_truncated_submesh_reports_context() {
    let data = encode_cmf(&sample_mesh());
    let err = CmfDecoder::new().decode(&data[..data.len() - 1]).unwrap_err();
    assert!(err.to_string().contains("submesh 1"), "{err}");
    assert_eq!(err.kind(), ErrorKind::Bounds);
}

#[test]
fn test_limit_applies_before_allocation() {
    let mut data = encode_caf(&sample_animation());
    // track count
    data[12..16].copy_from_slice(&u32::MAX.to_le_bytes());
    let err = CafDecoder::new().decode(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Limit);

    let tight = DecodeOptions {
        max_element_count: 2,
        ..Default::default()
    };
    let err = CafDecoder::new()
        .decode_with_options(&encode_caf(&sample_animation()), &tight)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Limit);
}

proptest! {
    #[test]
    fn prop_truncated_static_object(opts in 0..=options::MASK, fmt in 0..=format::MASK, cut in 0.0f64..1.0) {
        let plan = VertexPlan::compile(E3dVersion::V1_1, opts, fmt);
        let data = encode_e3d(&sample_static_object(E3dVersion::V1_1, plan));
        let len = (data.len() as f64 * cut) as usize;
        assert_clean_failure(E3dDecoder::new().decode(&data[..len]), len);
    }

    #[test]
    fn prop_corrupted_bytes_never_panic(index in 0usize..4096, value in any::<u8>()) {
        let inputs = [
            encode_cmf(&sample_mesh()),
            encode_csf(&sample_skeleton()),
            encode_caf(&sample_animation()),
            encode_e3d(&sample_static_object(
                E3dVersion::V1_1,
                VertexPlan::compile(E3dVersion::V1_1, options::MASK, format::MASK),
            )),
            encode_elm(&sample_map()),
        ];
        for mut data in inputs {
            let at = index % data.len();
            data[at] = value;
            let _ = CmfDecoder::new().decode(&data);
            let _ = CsfDecoder::new().decode(&data);
            let _ = CafDecoder::new().decode(&data);
            let _ = E3dDecoder::new().decode(&data);
            let _ = ElmDecoder::new().decode(&data);
        }
    }

    #[test]
    fn prop_random_bytes_never_panic(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = CmfDecoder::new().decode(&data);
        let _ = CsfDecoder::new().decode(&data);
        let _ = CafDecoder::new().decode(&data);
        let _ = E3dDecoder::new().decode(&data);
        let _ = ElmDecoder::new().decode(&data);
        let _ = elassets_parsers::FlatObjectDecoder::new().decode(&data);
    }
}
