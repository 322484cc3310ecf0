use super::*;

fn sample_tex(version: i32) -> Tex {
    Tex {
        signature: TEX_SIGNATURE.to_string(),
        version,
        texture_name: "dress_wear".to_string(),
        rects: Vec::new(),
        width: 16,
        height: 8,
        format: Some(TextureFormat::Argb32),
        data: vec![0xAB; 32],
    }
}

fn encode(tex: &Tex) -> Vec<u8> {
    let mut buf = Vec::new();
    tex.write(&mut buf).expect("tex should encode");
    buf
}

/// Hand-builds a legacy (< 1010) stream, which has no explicit size fields.
fn encode_legacy(version: i32, data: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut w = Writer::new(&mut buf);
    w.write_str("signature", TEX_SIGNATURE).expect("write signature");
    w.write_i32("version", version).expect("write version");
    w.write_str("textureName", "legacy").expect("write name");
    w.write_i32("data length", data.len() as i32).expect("write data length");
    w.write_bytes("data", data).expect("write data");
    buf
}

/// Payload whose header carries width/height at bytes 16..24, big-endian.
fn legacy_payload(width: i32, height: i32) -> Vec<u8> {
    let mut data = vec![0u8; 32];
    data[16..20].copy_from_slice(&width.to_be_bytes());
    data[20..24].copy_from_slice(&height.to_be_bytes());
    data
}

#[test]
fn version_1011_roundtrips_with_rects() {
    let tex = Tex {
        version: TEX_VERSION_RECTS,
        rects: vec![
            TexRect {
                x: 0.0,
                y: 0.0,
                w: 0.5,
                h: 0.5,
            },
            TexRect {
                x: 0.5,
                y: 0.5,
                w: 0.5,
                h: 0.5,
            },
        ],
        ..sample_tex(TEX_VERSION_RECTS)
    };

    let decoded = Tex::read(encode(&tex).as_slice()).expect("tex should decode");
    assert_eq!(decoded, tex);
}

#[test]
fn version_1010_has_size_but_no_rects() {
    let tex = sample_tex(TEX_VERSION);
    let decoded = Tex::read(encode(&tex).as_slice()).expect("tex should decode");
    assert!(decoded.rects.is_empty());
    assert_eq!(decoded.width, 16);
    assert_eq!(decoded.height, 8);
    assert_eq!(decoded.format, Some(TextureFormat::Argb32));
}

#[test]
fn rect_count_zero_decodes_to_empty_table() {
    let tex = sample_tex(TEX_VERSION_RECTS);
    let buf = encode(&tex);
    let decoded = Tex::read(buf.as_slice()).expect("tex should decode");
    assert!(decoded.rects.is_empty());
}

#[test]
fn version_1000_derives_size_from_payload_header() {
    let buf = encode_legacy(1000, &legacy_payload(512, 768));
    let decoded = Tex::read(buf.as_slice()).expect("legacy tex should decode");
    assert_eq!(decoded.width, 512);
    assert_eq!(decoded.height, 768);
    assert_eq!(decoded.format, None);
}

#[test]
fn version_1009_uses_the_legacy_layout() {
    // Versions between the documented breakpoints fall into the nearest
    // bracket: 1009 reads like 1000.
    let buf = encode_legacy(1009, &legacy_payload(64, 32));
    let decoded = Tex::read(buf.as_slice()).expect("1009 tex should decode");
    assert!(decoded.rects.is_empty());
    assert_eq!(decoded.width, 64);
    assert_eq!(decoded.height, 32);
    assert_eq!(decoded.format, None);
}

#[test]
fn legacy_payload_shorter_than_header_is_rejected() {
    let buf = encode_legacy(1000, &[0u8; 16]);
    let err = Tex::read(buf.as_slice()).expect_err("short legacy payload must fail");
    assert!(matches!(
        err,
        CodecError::Truncated {
            field: "legacy data header",
            expected: 24,
            actual: 16,
        }
    ));
}

#[test]
fn legacy_version_encode_is_refused() {
    let tex = Tex {
        version: 1000,
        format: None,
        ..sample_tex(1000)
    };
    let err = tex.write(Vec::new()).expect_err("legacy encode must fail");
    assert!(matches!(err, CodecError::LegacyTexEncode { version: 1000 }));
}

#[test]
fn missing_format_encode_is_refused() {
    let tex = Tex {
        format: None,
        ..sample_tex(TEX_VERSION)
    };
    let err = tex.write(Vec::new()).expect_err("format-less encode must fail");
    assert!(matches!(err, CodecError::MissingTextureFormat));
}

#[test]
fn wrong_signature_is_rejected() {
    let tex = Tex {
        signature: "CM3D2_MATERIAL".to_string(),
        ..sample_tex(TEX_VERSION)
    };
    let err = Tex::read(encode(&tex).as_slice()).expect_err("wrong signature must fail");
    assert!(matches!(
        err,
        CodecError::SignatureMismatch {
            format: ".tex",
            ..
        }
    ));
}

#[test]
fn unknown_texture_format_is_rejected() {
    let mut buf = Vec::new();
    let mut w = Writer::new(&mut buf);
    w.write_str("signature", TEX_SIGNATURE).expect("write signature");
    w.write_i32("version", TEX_VERSION).expect("write version");
    w.write_str("textureName", "t").expect("write name");
    w.write_i32("width", 4).expect("write width");
    w.write_i32("height", 4).expect("write height");
    w.write_i32("textureFormat", 7).expect("write format");

    let err = Tex::read(buf.as_slice()).expect_err("unknown format must fail");
    assert!(matches!(
        err,
        CodecError::UnknownTextureFormat { value: 7 }
    ));
}

#[test]
fn short_data_block_is_rejected() {
    let mut buf = encode(&sample_tex(TEX_VERSION));
    buf.truncate(buf.len() - 8);
    let err = Tex::read(buf.as_slice()).expect_err("short data must fail");
    assert!(matches!(
        err,
        CodecError::Truncated {
            field: "data",
            expected: 32,
            actual: 24,
        }
    ));
}

#[test]
fn texture_format_raw_values_match_unity() {
    assert_eq!(TextureFormat::Rgb24.raw(), 3);
    assert_eq!(TextureFormat::Argb32.raw(), 5);
    assert_eq!(TextureFormat::Dxt1.raw(), 10);
    assert_eq!(TextureFormat::Dxt5.raw(), 12);
    for format in [
        TextureFormat::Rgb24,
        TextureFormat::Argb32,
        TextureFormat::Dxt1,
        TextureFormat::Dxt5,
    ] {
        assert_eq!(TextureFormat::from_raw(format.raw()), Some(format));
    }
    assert_eq!(TextureFormat::from_raw(0), None);
}
