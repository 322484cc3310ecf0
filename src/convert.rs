//! Interchange between .tex containers and ordinary image files.
//!
//! ARGB32 payloads hold PNG bytes and RGB24 payloads hold JPEG bytes (the
//! game hands both to `Texture2D.LoadImage`); DXT1/DXT5 payloads hold a whole
//! DDS container fed to `LoadRawTextureData`. The atlas rect table
//! round-trips through a `<image>.uv.csv` sidecar of semicolon-separated
//! float quadruples, one rect per line.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::error::{CodecError, CodecResult};
use crate::tex::{Tex, TexRect, TextureFormat, TEX_SIGNATURE, TEX_VERSION, TEX_VERSION_RECTS};

const SIDECAR_SUFFIX: &str = ".uv.csv";
const DDS_MAGIC: &[u8] = b"DDS ";

/// Path of the atlas sidecar belonging to `image_path`.
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    let mut os = image_path.as_os_str().to_os_string();
    os.push(SIDECAR_SUFFIX);
    PathBuf::from(os)
}

/// Reads an atlas sidecar. Returns `Ok(None)` when the file does not exist.
///
/// Blank lines and lines that do not parse as exactly four floats are
/// skipped rather than rejected; sidecars are hand-edited files.
pub fn read_uv_sidecar(path: &Path) -> CodecResult<Option<Vec<TexRect>>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CodecError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut rects = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split(';').collect();
        if parts.len() != 4 {
            continue;
        }
        let (Ok(x), Ok(y), Ok(w), Ok(h)) = (
            parts[0].trim().parse::<f32>(),
            parts[1].trim().parse::<f32>(),
            parts[2].trim().parse::<f32>(),
            parts[3].trim().parse::<f32>(),
        ) else {
            continue;
        };
        rects.push(TexRect { x, y, w, h });
    }
    Ok(Some(rects))
}

/// Writes an atlas sidecar next to an exported image.
pub fn write_uv_sidecar(path: &Path, rects: &[TexRect]) -> CodecResult<()> {
    let mut text = String::new();
    for rect in rects {
        use std::fmt::Write as _;
        let _ = writeln!(&mut text, "{:.6};{:.6};{:.6};{:.6}", rect.x, rect.y, rect.w, rect.h);
    }
    fs::write(path, text).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Exports a decoded container to an image file.
///
/// PNG/JPEG payloads are written through unchanged when the requested
/// extension matches their native format, otherwise transcoded in memory.
/// DXT payloads are written as `.dds` after validating the container. When
/// the atlas table is non-empty a `.uv.csv` sidecar is written next to the
/// image. Returns the path actually written.
pub fn tex_to_image(tex: &Tex, output_path: &Path) -> CodecResult<PathBuf> {
    let format = tex.format.ok_or(CodecError::MissingTextureFormat)?;

    let path = match format {
        TextureFormat::Dxt1 | TextureFormat::Dxt5 => {
            ddsfile::Dds::read(&mut tex.data.as_slice())
                .map_err(|err| CodecError::InvalidDds(err.to_string()))?;
            let path = with_default_extension(output_path, "dds");
            fs::write(&path, &tex.data).map_err(|source| CodecError::Io {
                path: path.clone(),
                source,
            })?;
            path
        }
        TextureFormat::Argb32 | TextureFormat::Rgb24 => {
            let (native, default_ext) = match format {
                TextureFormat::Argb32 => (ImageFormat::Png, "png"),
                _ => (ImageFormat::Jpeg, "jpg"),
            };
            let path = with_default_extension(output_path, default_ext);
            let wanted = ImageFormat::from_path(&path).unwrap_or(native);
            if wanted == native {
                // Write-through avoids a decode/re-encode quality loss.
                fs::write(&path, &tex.data).map_err(|source| CodecError::Io {
                    path: path.clone(),
                    source,
                })?;
            } else {
                let decoded = image::load_from_memory(&tex.data)
                    .map_err(|err| CodecError::Image(err.to_string()))?;
                let decoded = if wanted == ImageFormat::Jpeg {
                    // The JPEG encoder rejects alpha channels.
                    image::DynamicImage::ImageRgb8(decoded.to_rgb8())
                } else {
                    decoded
                };
                decoded
                    .save_with_format(&path, wanted)
                    .map_err(|err| CodecError::Image(err.to_string()))?;
            }
            path
        }
    };

    if !tex.rects.is_empty() {
        write_uv_sidecar(&sidecar_path(&path), &tex.rects)?;
    }
    Ok(path)
}

/// Builds a container from an image file.
///
/// PNG becomes ARGB32 and JPEG becomes RGB24, both with the file bytes kept
/// verbatim; a DDS file becomes DXT1/DXT5 depending on its FourCC; anything
/// else the decoder understands is re-encoded to PNG. A `<input>.uv.csv`
/// sidecar, when present and non-empty, fills the atlas table and selects
/// version 1011 instead of 1010.
pub fn image_to_tex(input_path: &Path, texture_name: &str) -> CodecResult<Tex> {
    let bytes = fs::read(input_path).map_err(|source| CodecError::Io {
        path: input_path.to_path_buf(),
        source,
    })?;

    let rects = read_uv_sidecar(&sidecar_path(input_path))?.unwrap_or_default();
    let version = if rects.is_empty() {
        TEX_VERSION
    } else {
        TEX_VERSION_RECTS
    };

    if bytes.starts_with(DDS_MAGIC) {
        let dds = ddsfile::Dds::read(&mut bytes.as_slice())
            .map_err(|err| CodecError::InvalidDds(err.to_string()))?;
        let format = match dds.get_d3d_format() {
            Some(ddsfile::D3DFormat::DXT1) => TextureFormat::Dxt1,
            Some(ddsfile::D3DFormat::DXT5) => TextureFormat::Dxt5,
            other => {
                return Err(CodecError::InvalidDds(format!(
                    "unsupported dds pixel format {other:?}"
                )))
            }
        };
        return Ok(Tex {
            signature: TEX_SIGNATURE.to_string(),
            version,
            texture_name: texture_name.to_string(),
            rects,
            width: dds.get_width() as i32,
            height: dds.get_height() as i32,
            format: Some(format),
            data: bytes,
        });
    }

    let detected =
        image::guess_format(&bytes).map_err(|err| CodecError::Image(err.to_string()))?;
    let decoded =
        image::load_from_memory(&bytes).map_err(|err| CodecError::Image(err.to_string()))?;
    let width = decoded.width() as i32;
    let height = decoded.height() as i32;

    let (format, data) = match detected {
        ImageFormat::Png => (TextureFormat::Argb32, bytes),
        ImageFormat::Jpeg => (TextureFormat::Rgb24, bytes),
        _ => {
            let mut out = Cursor::new(Vec::new());
            decoded
                .write_to(&mut out, ImageFormat::Png)
                .map_err(|err| CodecError::Image(err.to_string()))?;
            (TextureFormat::Argb32, out.into_inner())
        }
    };

    Ok(Tex {
        signature: TEX_SIGNATURE.to_string(),
        version,
        texture_name: texture_name.to_string(),
        rects,
        width,
        height,
        format: Some(format),
        data,
    })
}

fn with_default_extension(path: &Path, ext: &str) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(ext)
    }
}

#[cfg(test)]
#[path = "tests/convert_tests.rs"]
mod tests;
