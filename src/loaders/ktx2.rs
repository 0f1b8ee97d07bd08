//! Minimal KTX2 container parsing.
//!
//! Validates the header and level index and decodes uncompressed RGBA8
//! payloads. Supercompressed or non-RGBA8 files are rejected as
//! unsupported rather than silently substituted.

use super::LoadError;
use crate::texture::Texture2D;
use log::debug;
use std::path::Path;

/// KTX2 file identifier.
pub const KTX2_MAGIC: [u8; 12] = [
    0xAB, 0x4B, 0x54, 0x58, 0x20, 0x32, 0x30, 0xBB, 0x0D, 0x0A, 0x1A, 0x0A,
];

const VK_FORMAT_R8G8B8A8_UNORM: u32 = 37;
const VK_FORMAT_R8G8B8A8_SRGB: u32 = 43;

const HEADER_LENGTH: usize = 80;

/// The fixed-size KTX2 header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ktx2Header {
    /// Vulkan format identifier.
    pub vk_format: u32,
    /// Size in bytes of one data type component.
    pub type_size: u32,
    /// Base level width in pixels.
    pub pixel_width: u32,
    /// Base level height in pixels.
    pub pixel_height: u32,
    /// Depth for 3D textures; 0 for 2D.
    pub pixel_depth: u32,
    /// Array layer count; 0 for non-arrays.
    pub layer_count: u32,
    /// Face count; 6 for cube maps, 1 otherwise.
    pub face_count: u32,
    /// Mip level count; 0 means "one level, generate the rest".
    pub level_count: u32,
    /// Supercompression scheme; 0 is none.
    pub supercompression: u32,
}

#[derive(Debug, Clone, Copy)]
struct LevelIndexEntry {
    byte_offset: u64,
    byte_length: u64,
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32, LoadError> {
    let bytes: [u8; 4] = data
        .get(offset..offset + 4)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| LoadError::Parse("unexpected end of KTX2 data".into()))?;
    Ok(u32::from_le_bytes(bytes))
}

fn read_u64(data: &[u8], offset: usize) -> Result<u64, LoadError> {
    let bytes: [u8; 8] = data
        .get(offset..offset + 8)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| LoadError::Parse("unexpected end of KTX2 data".into()))?;
    Ok(u64::from_le_bytes(bytes))
}

/// Whether the byte stream carries the KTX2 identifier.
pub fn is_ktx2(data: &[u8]) -> bool {
    data.len() >= KTX2_MAGIC.len() && data[..KTX2_MAGIC.len()] == KTX2_MAGIC
}

/// Parse the header of a KTX2 byte stream.
pub fn parse_header(data: &[u8]) -> Result<Ktx2Header, LoadError> {
    if !is_ktx2(data) {
        return Err(LoadError::Parse("not a KTX2 file".into()));
    }
    if data.len() < HEADER_LENGTH {
        return Err(LoadError::Parse("unexpected end of KTX2 data".into()));
    }
    let at = KTX2_MAGIC.len();
    Ok(Ktx2Header {
        vk_format: read_u32(data, at)?,
        type_size: read_u32(data, at + 4)?,
        pixel_width: read_u32(data, at + 8)?,
        pixel_height: read_u32(data, at + 12)?,
        pixel_depth: read_u32(data, at + 16)?,
        layer_count: read_u32(data, at + 20)?,
        face_count: read_u32(data, at + 24)?,
        level_count: read_u32(data, at + 28)?,
        supercompression: read_u32(data, at + 32)?,
    })
}

fn parse_level_index(data: &[u8], level_count: usize) -> Result<Vec<LevelIndexEntry>, LoadError> {
    let mut levels = Vec::with_capacity(level_count);
    for i in 0..level_count {
        let at = HEADER_LENGTH + i * 24;
        levels.push(LevelIndexEntry {
            byte_offset: read_u64(data, at)?,
            byte_length: read_u64(data, at + 8)?,
        });
    }
    Ok(levels)
}

/// Decode a KTX2 byte stream into a texture.
///
/// Only 2D, single-layer, single-face, uncompressed RGBA8 payloads are
/// handled; everything else is [`LoadError::Unsupported`]. The base
/// level is decoded and the mipmap chain regenerated from it.
pub fn load_ktx2(data: &[u8]) -> Result<Texture2D, LoadError> {
    let header = parse_header(data)?;

    if header.supercompression != 0 {
        return Err(LoadError::Unsupported(format!(
            "KTX2 supercompression scheme {}",
            header.supercompression
        )));
    }
    if header.vk_format != VK_FORMAT_R8G8B8A8_UNORM && header.vk_format != VK_FORMAT_R8G8B8A8_SRGB {
        return Err(LoadError::Unsupported(format!(
            "KTX2 vkFormat {}",
            header.vk_format
        )));
    }
    if header.pixel_depth > 1 || header.layer_count > 1 || header.face_count > 1 {
        return Err(LoadError::Unsupported(
            "only 2D single-layer KTX2 textures are supported".into(),
        ));
    }

    let level_count = header.level_count.max(1) as usize;
    let levels = parse_level_index(data, level_count)?;

    let base = levels
        .first()
        .ok_or_else(|| LoadError::Parse("no texture levels in KTX2 file".into()))?;
    let offset = base.byte_offset as usize;
    let length = base.byte_length as usize;
    let payload = offset
        .checked_add(length)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| LoadError::Parse("KTX2 level data out of range".into()))?;

    let width = header.pixel_width as usize;
    let height = header.pixel_height as usize;
    let expected = width * height * 4;
    if payload.len() != expected {
        return Err(LoadError::Parse(format!(
            "KTX2 level 0 holds {} bytes, expected {expected}",
            payload.len()
        )));
    }

    debug!(
        "ktx2: {}x{}, {} level(s), vkFormat {}",
        width, height, level_count, header.vk_format
    );
    Ok(Texture2D::new(width, height, payload.to_vec())?)
}

/// Load a KTX2 texture from a file.
pub fn load_ktx2_file(path: impl AsRef<Path>) -> Result<Texture2D, LoadError> {
    let data = std::fs::read(path)?;
    load_ktx2(&data)
}
