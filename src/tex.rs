//! Codec for .tex texture container files.
//!
//! The field set depends on the version number:
//!
//! - below 1010 there are no explicit width/height/format fields; width and
//!   height live at fixed offsets inside the payload header
//! - 1010 adds explicit width, height and texture format
//! - 1011 adds the atlas rect table
//!
//! Unknown versions fall into the nearest bracket.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};
use crate::wire::{Reader, Writer};

/// Signature a .tex file must open with. Enforced on decode.
pub const TEX_SIGNATURE: &str = "CM3D2_TEX";
/// Default version for freshly built containers without an atlas table.
pub const TEX_VERSION: i32 = 1010;
/// Version that introduced the atlas rect table.
pub const TEX_VERSION_RECTS: i32 = 1011;

/// First version carrying explicit width/height/format fields.
const TEX_VERSION_EXPLICIT_SIZE: i32 = 1010;

/// Pixel formats the game's texture loader accepts (Unity enum values).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureFormat {
    Rgb24,
    Argb32,
    Dxt1,
    Dxt5,
}

impl TextureFormat {
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            3 => Some(TextureFormat::Rgb24),
            5 => Some(TextureFormat::Argb32),
            10 => Some(TextureFormat::Dxt1),
            12 => Some(TextureFormat::Dxt5),
            _ => None,
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            TextureFormat::Rgb24 => 3,
            TextureFormat::Argb32 => 5,
            TextureFormat::Dxt1 => 10,
            TextureFormat::Dxt5 => 12,
        }
    }
}

/// Atlas sub-rectangle. Units are defined by the consuming shader; the codec
/// treats them as opaque.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TexRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tex {
    pub signature: String,
    pub version: i32,
    pub texture_name: String,
    /// Present on the wire only for versions >= 1011. A stored count of zero
    /// decodes to an empty table, same as this field's default.
    pub rects: Vec<TexRect>,
    pub width: i32,
    pub height: i32,
    /// `None` for legacy (< 1010) files, which do not store a format.
    pub format: Option<TextureFormat>,
    /// Raw payload: a DDS container for DXT formats, PNG or JPEG bytes for
    /// the uncompressed ones.
    pub data: Vec<u8>,
}

impl Tex {
    /// Decodes a .tex file from a byte stream.
    pub fn read<R: Read>(input: R) -> CodecResult<Self> {
        let mut r = Reader::new(input);
        let signature = r.read_str("signature")?;
        if signature != TEX_SIGNATURE {
            return Err(CodecError::SignatureMismatch {
                format: ".tex",
                found: signature,
                expected: TEX_SIGNATURE,
            });
        }
        let version = r.read_i32("version")?;
        let texture_name = r.read_str("textureName")?;

        let mut rects = Vec::new();
        if version >= TEX_VERSION_RECTS {
            let count = r.read_i32("rect count")?;
            for index in 0..count.max(0) as usize {
                let rect = read_rect(&mut r).map_err(|err| err.at_element("rect", index))?;
                rects.push(rect);
            }
        }

        let mut width = 0;
        let mut height = 0;
        let mut format = None;
        if version >= TEX_VERSION_EXPLICIT_SIZE {
            width = r.read_i32("width")?;
            height = r.read_i32("height")?;
            let raw = r.read_i32("textureFormat")?;
            format = Some(
                TextureFormat::from_raw(raw)
                    .ok_or(CodecError::UnknownTextureFormat { value: raw })?,
            );
        }

        let data_len = r.read_i32("data length")?;
        let data_len = usize::try_from(data_len).map_err(|_| CodecError::NegativeLength {
            field: "data length",
            len: data_len,
        })?;
        let data = r.read_bytes("data", data_len)?;

        if version < TEX_VERSION_EXPLICIT_SIZE {
            // Legacy layout: the dimensions sit at bytes 16..24 of the payload
            // header. The game reads them big-endian even though a DDS header
            // is little-endian; kept that way so legacy files decode the same.
            if data.len() < 24 {
                return Err(CodecError::Truncated {
                    field: "legacy data header",
                    expected: 24,
                    actual: data.len(),
                });
            }
            width = i32::from_be_bytes([data[16], data[17], data[18], data[19]]);
            height = i32::from_be_bytes([data[20], data[21], data[22], data[23]]);
        }

        Ok(Self {
            signature,
            version,
            texture_name,
            rects,
            width,
            height,
            format,
            data,
        })
    }

    /// Encodes this container to a byte stream.
    ///
    /// Versions below 1010 are refused: their width and height are not stored
    /// independently and cannot be reconstructed from arbitrary field values.
    pub fn write<W: Write>(&self, output: W) -> CodecResult<()> {
        if self.version < TEX_VERSION_EXPLICIT_SIZE {
            return Err(CodecError::LegacyTexEncode {
                version: self.version,
            });
        }
        let format = self.format.ok_or(CodecError::MissingTextureFormat)?;

        let mut w = Writer::new(output);
        w.write_str("signature", &self.signature)?;
        w.write_i32("version", self.version)?;
        w.write_str("textureName", &self.texture_name)?;

        if self.version >= TEX_VERSION_RECTS {
            let count = i32::try_from(self.rects.len()).map_err(|_| CodecError::LengthOverflow {
                field: "rect count",
                len: self.rects.len(),
            })?;
            w.write_i32("rect count", count)?;
            for (index, rect) in self.rects.iter().enumerate() {
                write_rect(&mut w, rect).map_err(|err| err.at_element("rect", index))?;
            }
        }

        w.write_i32("width", self.width)?;
        w.write_i32("height", self.height)?;
        w.write_i32("textureFormat", format.raw())?;

        let data_len = i32::try_from(self.data.len()).map_err(|_| CodecError::LengthOverflow {
            field: "data length",
            len: self.data.len(),
        })?;
        w.write_i32("data length", data_len)?;
        w.write_bytes("data", &self.data)
    }
}

fn read_rect<R: Read>(r: &mut Reader<R>) -> CodecResult<TexRect> {
    Ok(TexRect {
        x: r.read_f32("rect.x")?,
        y: r.read_f32("rect.y")?,
        w: r.read_f32("rect.w")?,
        h: r.read_f32("rect.h")?,
    })
}

fn write_rect<W: Write>(w: &mut Writer<W>, rect: &TexRect) -> CodecResult<()> {
    w.write_f32("rect.x", rect.x)?;
    w.write_f32("rect.y", rect.y)?;
    w.write_f32("rect.w", rect.w)?;
    w.write_f32("rect.h", rect.h)?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/tex_tests.rs"]
mod tests;
