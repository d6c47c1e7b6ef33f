//! ICNS container encoding and decoding.
//!
//! The `.icns` format is a flat sequence of length-prefixed chunks behind
//! an 8-byte header, big-endian throughout. Each chunk carries one PNG
//! payload under a 4-ASCII-byte type tag that identifies its pixel edge.
//! There are no checksums; consumers validate purely by the length fields
//! and the self-validating payloads, so those lengths must be exact.

use std::collections::BTreeMap;
use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use thiserror::Error;

use crate::variant::VariantSet;

/// Magic tag at offset 0 of every container.
pub const MAGIC: &[u8; 4] = b"icns";

/// Maps a pixel edge to its PNG-bearing icon type tag.
///
/// The table deliberately covers edges the current variant table does not
/// produce at 1x (64 comes from 32@2x, 1024 from 512@2x) so the encoder
/// stays correct if the variant table is ever extended.
pub fn type_tag(edge: u32) -> Option<[u8; 4]> {
    Some(match edge {
        16 => *b"icp4",
        32 => *b"icp5",
        64 => *b"icp6",
        128 => *b"ic07",
        256 => *b"ic08",
        512 => *b"ic09",
        1024 => *b"ic10",
        _ => return None,
    })
}

/// Reverse lookup of [`type_tag`].
pub fn edge_for_tag(tag: &[u8; 4]) -> Option<u32> {
    Some(match tag {
        b"icp4" => 16,
        b"icp5" => 32,
        b"icp6" => 64,
        b"ic07" => 128,
        b"ic08" => 256,
        b"ic09" => 512,
        b"ic10" => 1024,
        _ => return None,
    })
}

/// Errors raised while parsing a container.
#[derive(Debug, Error)]
pub enum IcnsError {
    #[error("invalid magic number")]
    InvalidMagic,
    #[error("declared length does not match the chunk layout")]
    LengthMismatch,
    #[error("unknown chunk tag {0:?}")]
    UnknownTag([u8; 4]),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// One retained chunk: a pixel edge, its type tag, and the raw PNG bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcnsEntry {
    pub edge: u32,
    pub tag: [u8; 4],
    pub data: Vec<u8>,
}

/// An assembled multi-resolution icon container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IcnsContainer {
    /// Retained entries, strictly ascending by edge, one per edge.
    pub entries: Vec<IcnsEntry>,
}

impl IcnsContainer {
    /// Builds a container from a rendered variant set.
    ///
    /// Variants sharing an actual edge are deduplicated first-seen-wins
    /// (which is why the set's table order matters), edges without a type
    /// tag are dropped, and the survivors are sorted ascending by edge.
    pub fn from_variants(variants: &VariantSet) -> Self {
        Self::from_payloads(variants.iter().map(|v| (v.actual_edge, v.png.clone())))
    }

    /// Builds a container from raw `(edge, payload)` pairs.
    ///
    /// Applies the same selection rules as [`from_variants`](Self::from_variants).
    pub fn from_payloads(payloads: impl IntoIterator<Item = (u32, Vec<u8>)>) -> Self {
        let mut unique: BTreeMap<u32, Vec<u8>> = BTreeMap::new();
        for (edge, data) in payloads {
            unique.entry(edge).or_insert(data);
        }

        let entries = unique
            .into_iter()
            .filter_map(|(edge, data)| type_tag(edge).map(|tag| IcnsEntry { edge, tag, data }))
            .collect();

        Self { entries }
    }

    /// Total byte length of the serialized container, header included.
    pub fn total_len(&self) -> u32 {
        8 + self
            .entries
            .iter()
            .map(|e| 8 + e.data.len() as u32)
            .sum::<u32>()
    }

    /// Serializes the container. Every length field is exact; a consumer
    /// that finds a mismatch rejects the whole file.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_u32::<BigEndian>(self.total_len())?;
        for entry in &self.entries {
            writer.write_all(&entry.tag)?;
            writer.write_u32::<BigEndian>(entry.data.len() as u32 + 8)?;
            writer.write_all(&entry.data)?;
        }
        Ok(())
    }

    /// Parses a serialized container, validating magic and length fields.
    pub fn read<R: Read>(mut reader: R) -> Result<Self, IcnsError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(IcnsError::InvalidMagic);
        }

        let total = reader.read_u32::<BigEndian>()?;
        if total < 8 {
            return Err(IcnsError::LengthMismatch);
        }

        let mut remaining = total - 8;
        let mut entries = Vec::new();
        while remaining > 0 {
            if remaining < 8 {
                return Err(IcnsError::LengthMismatch);
            }
            let mut tag = [0u8; 4];
            reader.read_exact(&mut tag)?;
            let chunk_len = reader.read_u32::<BigEndian>()?;
            if chunk_len < 8 || chunk_len > remaining {
                return Err(IcnsError::LengthMismatch);
            }
            let mut data = vec![0u8; (chunk_len - 8) as usize];
            reader.read_exact(&mut data)?;

            let edge = edge_for_tag(&tag).ok_or(IcnsError::UnknownTag(tag))?;
            entries.push(IcnsEntry { edge, tag, data });
            remaining -= chunk_len;
        }

        Ok(Self { entries })
    }
}
