//! Codecs for COM3D2's asset pipeline formats: .col collider lists, .mate
//! materials and .tex texture containers.
//!
//! All three codecs are synchronous and stateless: one call consumes one
//! stream and yields either a complete value or a [`CodecError`] naming the
//! field (and list index, where applicable) that failed.

mod col;
mod convert;
mod error;
mod mate;
mod tex;
mod wire;

pub use col::{Col, Collider, ColliderBase, COL_SIGNATURE, COL_VERSION};
pub use convert::{image_to_tex, read_uv_sidecar, sidecar_path, tex_to_image, write_uv_sidecar};
pub use error::{CodecError, CodecResult};
pub use mate::{
    Mate, Material, Property, TextureMap, TextureValue, MATE_SIGNATURE, MATE_VERSION,
};
pub use tex::{Tex, TexRect, TextureFormat, TEX_SIGNATURE, TEX_VERSION, TEX_VERSION_RECTS};
pub use wire::{Reader, Writer};
