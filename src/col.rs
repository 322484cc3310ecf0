//! Codec for .col collider list files.
//!
//! A .col file is a header followed by a counted sequence of tagged collider
//! records. Every variant except `Missing` opens with the same base geometry
//! block; variant-specific fields follow it.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};
use crate::wire::{Reader, Writer};

/// Signature written by the game. Decoding accepts any leading string: the
/// game itself never checks it and files in the wild carry variations.
pub const COL_SIGNATURE: &str = "CM3D21_COL";
/// Format version written by the current game build.
pub const COL_VERSION: i32 = 24102;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Col {
    pub signature: String,
    pub version: i32,
    pub colliders: Vec<Collider>,
}

/// Geometry block shared by every collider variant except `Missing`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColliderBase {
    pub parent_name: String,
    pub self_name: String,
    pub local_position: [f32; 3],
    pub local_rotation: [f32; 4],
    pub local_scale: [f32; 3],
    pub direction: i32,
    pub center: [f32; 3],
    pub bound: i32,
}

/// One collider record. The wire tag selecting the variant doubles as the
/// JSON discriminator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Collider {
    #[serde(rename = "dbc")]
    Capsule {
        base: ColliderBase,
        radius: f32,
        height: f32,
    },
    #[serde(rename = "dpc")]
    Plane { base: ColliderBase },
    #[serde(rename = "dbm")]
    Mune {
        base: ColliderBase,
        radius: f32,
        height: f32,
        scale_rate_mul_max: f32,
        center_rate_max: [f32; 3],
    },
    /// Tombstone for a collider that failed to resolve at authoring time.
    /// Carries no payload.
    #[serde(rename = "missing")]
    Missing,
}

impl Collider {
    /// The tag written ahead of this variant's payload.
    pub fn type_name(&self) -> &'static str {
        match self {
            Collider::Capsule { .. } => "dbc",
            Collider::Plane { .. } => "dpc",
            Collider::Mune { .. } => "dbm",
            Collider::Missing => "missing",
        }
    }
}

impl Col {
    /// Decodes a .col file from a byte stream.
    pub fn read<R: Read>(input: R) -> CodecResult<Self> {
        let mut r = Reader::new(input);
        let signature = r.read_str("signature")?;
        let version = r.read_i32("version")?;
        let count = r.read_i32("collider count")?;

        let mut colliders = Vec::new();
        for index in 0..count.max(0) as usize {
            let collider =
                read_collider(&mut r).map_err(|err| err.at_element("collider", index))?;
            colliders.push(collider);
        }

        Ok(Self {
            signature,
            version,
            colliders,
        })
    }

    /// Encodes this collider list to a byte stream.
    pub fn write<W: Write>(&self, output: W) -> CodecResult<()> {
        let mut w = Writer::new(output);
        w.write_str("signature", &self.signature)?;
        w.write_i32("version", self.version)?;
        let count =
            i32::try_from(self.colliders.len()).map_err(|_| CodecError::LengthOverflow {
                field: "collider count",
                len: self.colliders.len(),
            })?;
        w.write_i32("collider count", count)?;
        for (index, collider) in self.colliders.iter().enumerate() {
            write_collider(&mut w, collider).map_err(|err| err.at_element("collider", index))?;
        }
        Ok(())
    }

    /// Parses the JSON form, dispatching each element on its `type` field.
    pub fn from_json(input: &str) -> CodecResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Serializes to the JSON form consumed by editor frontends.
    pub fn to_json(&self) -> CodecResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn read_collider<R: Read>(r: &mut Reader<R>) -> CodecResult<Collider> {
    let tag = r.read_str("collider type")?;
    match tag.as_str() {
        "dbc" => {
            let base = read_base(r)?;
            let radius = r.read_f32("m_Radius")?;
            let height = r.read_f32("m_Height")?;
            Ok(Collider::Capsule {
                base,
                radius,
                height,
            })
        }
        "dpc" => Ok(Collider::Plane { base: read_base(r)? }),
        "dbm" => {
            let base = read_base(r)?;
            let radius = r.read_f32("m_Radius")?;
            let height = r.read_f32("m_Height")?;
            let scale_rate_mul_max = r.read_f32("m_fScaleRateMulMax")?;
            let center_rate_max = r.read_f32_array("m_CenterRateMax")?;
            Ok(Collider::Mune {
                base,
                radius,
                height,
                scale_rate_mul_max,
                center_rate_max,
            })
        }
        "missing" => Ok(Collider::Missing),
        _ => Err(CodecError::UnknownColliderTag { tag }),
    }
}

fn write_collider<W: Write>(w: &mut Writer<W>, collider: &Collider) -> CodecResult<()> {
    w.write_str("collider type", collider.type_name())?;
    match collider {
        Collider::Capsule {
            base,
            radius,
            height,
        } => {
            write_base(w, base)?;
            w.write_f32("m_Radius", *radius)?;
            w.write_f32("m_Height", *height)?;
        }
        Collider::Plane { base } => write_base(w, base)?,
        Collider::Mune {
            base,
            radius,
            height,
            scale_rate_mul_max,
            center_rate_max,
        } => {
            write_base(w, base)?;
            w.write_f32("m_Radius", *radius)?;
            w.write_f32("m_Height", *height)?;
            w.write_f32("m_fScaleRateMulMax", *scale_rate_mul_max)?;
            w.write_f32_array("m_CenterRateMax", center_rate_max)?;
        }
        Collider::Missing => {}
    }
    Ok(())
}

// Field order here is the wire layout; it must stay identical for every
// variant that embeds the base block.
fn read_base<R: Read>(r: &mut Reader<R>) -> CodecResult<ColliderBase> {
    Ok(ColliderBase {
        parent_name: r.read_str("parentName")?,
        self_name: r.read_str("selfName")?,
        local_position: r.read_f32_array("localPosition")?,
        local_rotation: r.read_f32_array("localRotation")?,
        local_scale: r.read_f32_array("localScale")?,
        direction: r.read_i32("direction")?,
        center: r.read_f32_array("center")?,
        bound: r.read_i32("bound")?,
    })
}

fn write_base<W: Write>(w: &mut Writer<W>, base: &ColliderBase) -> CodecResult<()> {
    w.write_str("parentName", &base.parent_name)?;
    w.write_str("selfName", &base.self_name)?;
    w.write_f32_array("localPosition", &base.local_position)?;
    w.write_f32_array("localRotation", &base.local_rotation)?;
    w.write_f32_array("localScale", &base.local_scale)?;
    w.write_i32("direction", base.direction)?;
    w.write_f32_array("center", &base.center)?;
    w.write_i32("bound", base.bound)?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/col_tests.rs"]
mod tests;
