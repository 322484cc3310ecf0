use super::*;

fn sample_base() -> ColliderBase {
    ColliderBase {
        parent_name: "Bip01 Spine".to_string(),
        self_name: "Skirt_R_01".to_string(),
        local_position: [0.01, -0.02, 0.3],
        local_rotation: [0.0, 0.0, 0.0, 1.0],
        local_scale: [1.0, 1.0, 1.0],
        direction: 1,
        center: [0.0, 0.05, 0.0],
        bound: 0,
    }
}

fn encode(col: &Col) -> Vec<u8> {
    let mut buf = Vec::new();
    col.write(&mut buf).expect("col should encode");
    buf
}

#[test]
fn plane_roundtrip() {
    let col = Col {
        signature: COL_SIGNATURE.to_string(),
        version: COL_VERSION,
        colliders: vec![Collider::Plane {
            base: sample_base(),
        }],
    };

    let decoded = Col::read(encode(&col).as_slice()).expect("col should decode");
    assert_eq!(decoded.colliders.len(), 1);
    assert_eq!(decoded.colliders[0].type_name(), "dpc");
    assert_eq!(decoded, col);
}

#[test]
fn all_variants_roundtrip_in_order() {
    let col = Col {
        signature: COL_SIGNATURE.to_string(),
        version: COL_VERSION,
        colliders: vec![
            Collider::Capsule {
                base: sample_base(),
                radius: 0.04,
                height: 0.12,
            },
            Collider::Missing,
            Collider::Mune {
                base: sample_base(),
                radius: 0.08,
                height: 0.0,
                scale_rate_mul_max: 1.5,
                center_rate_max: [0.1, 0.2, 0.3],
            },
            Collider::Plane {
                base: sample_base(),
            },
        ],
    };

    let decoded = Col::read(encode(&col).as_slice()).expect("col should decode");
    assert_eq!(decoded, col);
    let tags: Vec<&str> = decoded.colliders.iter().map(Collider::type_name).collect();
    assert_eq!(tags, vec!["dbc", "missing", "dbm", "dpc"]);
}

#[test]
fn any_signature_is_accepted() {
    let col = Col {
        signature: "SOMETHING_ELSE".to_string(),
        version: 3,
        colliders: Vec::new(),
    };
    let decoded = Col::read(encode(&col).as_slice()).expect("odd signature should decode");
    assert_eq!(decoded.signature, "SOMETHING_ELSE");
}

#[test]
fn unknown_tag_fails_with_index() {
    let mut buf = Vec::new();
    let mut w = Writer::new(&mut buf);
    w.write_str("signature", COL_SIGNATURE).expect("write signature");
    w.write_i32("version", COL_VERSION).expect("write version");
    w.write_i32("collider count", 2).expect("write count");
    write_collider(
        &mut w,
        &Collider::Plane {
            base: sample_base(),
        },
    )
    .expect("write first collider");
    w.write_str("collider type", "bogus").expect("write bad tag");

    let err = Col::read(buf.as_slice()).expect_err("unknown tag must fail");
    match err {
        CodecError::Element {
            kind: "collider",
            index: 1,
            source,
        } => assert!(matches!(
            *source,
            CodecError::UnknownColliderTag { ref tag } if tag == "bogus"
        )),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn json_roundtrip_uses_type_discriminator() {
    let col = Col {
        signature: COL_SIGNATURE.to_string(),
        version: COL_VERSION,
        colliders: vec![
            Collider::Capsule {
                base: sample_base(),
                radius: 0.04,
                height: 0.12,
            },
            Collider::Missing,
        ],
    };

    let json = col.to_json().expect("col should serialize to json");
    assert!(json.contains("\"type\": \"dbc\""));
    assert!(json.contains("\"type\": \"missing\""));

    let parsed = Col::from_json(&json).expect("json should parse back");
    assert_eq!(parsed, col);
}

#[test]
fn json_with_unknown_discriminator_is_rejected() {
    let json = r#"{
        "signature": "CM3D21_COL",
        "version": 24102,
        "colliders": [{ "type": "nope" }]
    }"#;
    let err = Col::from_json(json).expect_err("unknown json variant must fail");
    assert!(matches!(err, CodecError::Json(_)));
}
