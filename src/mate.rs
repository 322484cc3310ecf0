//! Codec for .mate material files.
//!
//! The shader property list is not counted: it runs until the reserved tag
//! `end` appears where the next property's type tag would be. Detecting that
//! requires the reader's one-token look-ahead, because the terminator and the
//! next record's tag share the same field position.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};
use crate::wire::{Reader, Writer};

/// Signature a .mate file must open with. Enforced on decode.
pub const MATE_SIGNATURE: &str = "CM3D2_MATERIAL";
/// Format version written by the current game build.
pub const MATE_VERSION: i32 = 2001;

/// Terminates the property list on the wire. Never stored as a property.
const PROPERTY_END: &str = "end";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mate {
    pub signature: String,
    pub version: i32,
    pub name: String,
    pub material: Material,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub shader_name: String,
    pub shader_filename: String,
    /// Order is rendering-significant and round-trips unchanged.
    pub properties: Vec<Property>,
}

/// One shader property. The wire tag doubles as the JSON discriminator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Property {
    #[serde(rename = "tex")]
    Texture { name: String, value: TextureValue },
    #[serde(rename = "col")]
    Color { name: String, color: [f32; 4] },
    #[serde(rename = "vec")]
    Vector { name: String, vector: [f32; 4] },
    #[serde(rename = "f")]
    Float { name: String, number: f32 },
}

impl Property {
    /// The tag written ahead of this property's payload.
    pub fn type_name(&self) -> &'static str {
        match self {
            Property::Texture { .. } => "tex",
            Property::Color { .. } => "col",
            Property::Vector { .. } => "vec",
            Property::Float { .. } => "f",
        }
    }

    /// The shader parameter this property binds to.
    pub fn name(&self) -> &str {
        match self {
            Property::Texture { name, .. }
            | Property::Color { name, .. }
            | Property::Vector { name, .. }
            | Property::Float { name, .. } => name,
        }
    }
}

/// Payload of a `tex` property, selected by a second-level sub tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sub_tag")]
pub enum TextureValue {
    #[serde(rename = "tex2d")]
    Tex2d(TextureMap),
    #[serde(rename = "cube")]
    Cube(TextureMap),
    /// Render-target reference. The game discards both strings on load; they
    /// are kept verbatim so a decode/encode pass is byte-identical.
    #[serde(rename = "texRT")]
    RenderTexture {
        discarded_str1: String,
        discarded_str2: String,
    },
}

impl TextureValue {
    /// The sub tag written ahead of this payload.
    pub fn sub_tag(&self) -> &'static str {
        match self {
            TextureValue::Tex2d(_) => "tex2d",
            TextureValue::Cube(_) => "cube",
            TextureValue::RenderTexture { .. } => "texRT",
        }
    }
}

/// Shared payload of the `tex2d` and `cube` sub tags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureMap {
    pub name: String,
    pub path: String,
    pub offset: [f32; 2],
    pub scale: [f32; 2],
}

impl Mate {
    /// Decodes a .mate file from a byte stream.
    pub fn read<R: Read>(input: R) -> CodecResult<Self> {
        let mut r = Reader::new(input);
        let signature = r.read_str("signature")?;
        if signature != MATE_SIGNATURE {
            return Err(CodecError::SignatureMismatch {
                format: ".mate",
                found: signature,
                expected: MATE_SIGNATURE,
            });
        }
        let version = r.read_i32("version")?;
        let name = r.read_str("name")?;
        let material = read_material(&mut r)?;
        Ok(Self {
            signature,
            version,
            name,
            material,
        })
    }

    /// Encodes this material to a byte stream.
    pub fn write<W: Write>(&self, output: W) -> CodecResult<()> {
        let mut w = Writer::new(output);
        w.write_str("signature", &self.signature)?;
        w.write_i32("version", self.version)?;
        w.write_str("name", &self.name)?;
        write_material(&mut w, &self.material)
    }
}

fn read_material<R: Read>(r: &mut Reader<R>) -> CodecResult<Material> {
    let name = r.read_str("material.name")?;
    let shader_name = r.read_str("material.shaderName")?;
    let shader_filename = r.read_str("material.shaderFilename")?;

    let mut properties = Vec::new();
    loop {
        if r.peek_str("property type")? == PROPERTY_END {
            r.read_str("property list end")?;
            break;
        }
        let index = properties.len();
        let property = read_property(r).map_err(|err| err.at_element("property", index))?;
        properties.push(property);
    }

    Ok(Material {
        name,
        shader_name,
        shader_filename,
        properties,
    })
}

fn write_material<W: Write>(w: &mut Writer<W>, material: &Material) -> CodecResult<()> {
    w.write_str("material.name", &material.name)?;
    w.write_str("material.shaderName", &material.shader_name)?;
    w.write_str("material.shaderFilename", &material.shader_filename)?;
    for (index, property) in material.properties.iter().enumerate() {
        write_property(w, property).map_err(|err| err.at_element("property", index))?;
    }
    w.write_str("property list end", PROPERTY_END)
}

fn read_property<R: Read>(r: &mut Reader<R>) -> CodecResult<Property> {
    let tag = r.read_str("property type")?;
    let name = r.read_str("property name")?;
    match tag.as_str() {
        "tex" => Ok(Property::Texture {
            name,
            value: read_texture_value(r)?,
        }),
        "col" => Ok(Property::Color {
            name,
            color: r.read_f32_array("color")?,
        }),
        "vec" => Ok(Property::Vector {
            name,
            vector: r.read_f32_array("vector")?,
        }),
        "f" => Ok(Property::Float {
            name,
            number: r.read_f32("number")?,
        }),
        _ => Err(CodecError::UnknownPropertyTag { tag }),
    }
}

fn write_property<W: Write>(w: &mut Writer<W>, property: &Property) -> CodecResult<()> {
    w.write_str("property type", property.type_name())?;
    w.write_str("property name", property.name())?;
    match property {
        Property::Texture { value, .. } => write_texture_value(w, value),
        Property::Color { color, .. } => w.write_f32_array("color", color),
        Property::Vector { vector, .. } => w.write_f32_array("vector", vector),
        Property::Float { number, .. } => w.write_f32("number", *number),
    }
}

fn read_texture_value<R: Read>(r: &mut Reader<R>) -> CodecResult<TextureValue> {
    let sub_tag = r.read_str("tex subTag")?;
    match sub_tag.as_str() {
        "tex2d" => Ok(TextureValue::Tex2d(read_texture_map(r)?)),
        "cube" => Ok(TextureValue::Cube(read_texture_map(r)?)),
        "texRT" => Ok(TextureValue::RenderTexture {
            discarded_str1: r.read_str("texRT.discardedStr1")?,
            discarded_str2: r.read_str("texRT.discardedStr2")?,
        }),
        _ => Err(CodecError::UnknownTextureSubTag { tag: sub_tag }),
    }
}

fn write_texture_value<W: Write>(w: &mut Writer<W>, value: &TextureValue) -> CodecResult<()> {
    w.write_str("tex subTag", value.sub_tag())?;
    match value {
        TextureValue::Tex2d(map) | TextureValue::Cube(map) => write_texture_map(w, map),
        TextureValue::RenderTexture {
            discarded_str1,
            discarded_str2,
        } => {
            w.write_str("texRT.discardedStr1", discarded_str1)?;
            w.write_str("texRT.discardedStr2", discarded_str2)
        }
    }
}

fn read_texture_map<R: Read>(r: &mut Reader<R>) -> CodecResult<TextureMap> {
    Ok(TextureMap {
        name: r.read_str("tex2d.name")?,
        path: r.read_str("tex2d.path")?,
        offset: r.read_f32_array("tex2d.offset")?,
        scale: r.read_f32_array("tex2d.scale")?,
    })
}

fn write_texture_map<W: Write>(w: &mut Writer<W>, map: &TextureMap) -> CodecResult<()> {
    w.write_str("tex2d.name", &map.name)?;
    w.write_str("tex2d.path", &map.path)?;
    w.write_f32_array("tex2d.offset", &map.offset)?;
    w.write_f32_array("tex2d.scale", &map.scale)?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/mate_tests.rs"]
mod tests;
