//! On-disk artifact formats for the feature matrix and the fitted index.
//!
//! Feature matrix: `[magic "MFEA"][version: u32][dimension: u32][rows: u32]`
//! followed by `rows * dimension` little-endian f32 values, row-major.
//!
//! Neighbor index: `[magic "MKNN"][crc32: u32][payload: bincode(IndexArtifact)]`.
//!
//! Writers exist for the offline pipeline and for tests. The runtime only reads.

use crate::distance::DistanceMetric;
use crate::error::{Result, RecommenderError};
use crate::vector::Vector;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub const FEATURE_MAGIC: &[u8; 4] = b"MFEA";
pub const INDEX_MAGIC: &[u8; 4] = b"MKNN";
pub const FORMAT_VERSION: u32 = 1;

const FEATURE_HEADER_SIZE: usize = 16;
const INDEX_HEADER_SIZE: usize = 8;

/// Decoded feature matrix, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub dimension: usize,
    pub rows: usize,
    pub data: Vec<f32>,
}

/// Serializable form of a fitted flat index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexArtifact {
    pub version: u32,
    pub metric: DistanceMetric,
    /// Queries are L2-normalized before search; rows are stored normalized.
    pub normalize: bool,
    pub dimension: usize,
    pub rows: Vec<Vec<f32>>,
}

/// Encode data to bincode bytes.
pub fn to_bincode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| RecommenderError::SerializationError(e.to_string()))
}

/// Decode data from bincode bytes.
pub fn from_bincode<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| RecommenderError::SerializationError(e.to_string()))
}

fn corrupt(path: &Path, reason: impl Into<String>) -> RecommenderError {
    RecommenderError::CorruptArtifact {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(buf)
}

/// Write a feature matrix file. All rows must share one dimension.
pub fn write_features(path: impl AsRef<Path>, rows: &[Vector]) -> Result<()> {
    let dimension = rows.first().map(Vector::dimension).unwrap_or(0);
    if let Some(bad) = rows.iter().find(|r| r.dimension() != dimension) {
        return Err(RecommenderError::DimensionMismatch {
            expected: dimension,
            actual: bad.dimension(),
        });
    }
    let count = u32::try_from(rows.len()).map_err(|_| {
        RecommenderError::SerializationError(format!("Too many rows: {}", rows.len()))
    })?;

    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    writer.write_all(FEATURE_MAGIC)?;
    writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
    writer.write_all(&(dimension as u32).to_le_bytes())?;
    writer.write_all(&count.to_le_bytes())?;
    for row in rows {
        for &val in row.as_slice() {
            writer.write_all(&val.to_le_bytes())?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Read a feature matrix file.
///
/// The file is memory-mapped for decoding; if mapping fails the bytes are
/// read with regular file I/O instead.
pub fn read_features(path: impl AsRef<Path>) -> Result<FeatureMatrix> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let len = file.metadata()?.len() as usize;
    if len < FEATURE_HEADER_SIZE {
        return Err(corrupt(path, "file too small for header"));
    }

    match unsafe { memmap2::Mmap::map(&file) } {
        Ok(mmap) => decode_features(path, &mmap),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "mmap failed, falling back to buffered read");
            decode_features(path, &fs::read(path)?)
        }
    }
}

fn decode_features(path: &Path, bytes: &[u8]) -> Result<FeatureMatrix> {
    if bytes.len() < FEATURE_HEADER_SIZE {
        return Err(corrupt(path, "file too small for header"));
    }
    if &bytes[0..4] != FEATURE_MAGIC {
        return Err(corrupt(path, "not a feature matrix (bad magic)"));
    }
    let version = read_u32(bytes, 4);
    if version != FORMAT_VERSION {
        return Err(corrupt(path, format!("unsupported version {}", version)));
    }
    let dimension = read_u32(bytes, 8) as usize;
    let rows = read_u32(bytes, 12) as usize;

    let expected = rows
        .checked_mul(dimension)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| corrupt(path, "header overflows"))?;
    let body = &bytes[FEATURE_HEADER_SIZE..];
    if body.len() != expected {
        return Err(corrupt(
            path,
            format!(
                "expected {} data bytes for {} x {}, found {}",
                expected,
                rows,
                dimension,
                body.len()
            ),
        ));
    }

    let data = body
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    Ok(FeatureMatrix {
        dimension,
        rows,
        data,
    })
}

/// Write a fitted index artifact with its checksum.
pub fn write_index(path: impl AsRef<Path>, artifact: &IndexArtifact) -> Result<()> {
    let payload = to_bincode(artifact)?;
    let crc = crc32fast::hash(&payload);

    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    writer.write_all(INDEX_MAGIC)?;
    writer.write_all(&crc.to_le_bytes())?;
    writer.write_all(&payload)?;
    writer.flush()?;
    Ok(())
}

/// Read and verify a fitted index artifact.
pub fn read_index(path: impl AsRef<Path>) -> Result<IndexArtifact> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    if bytes.len() < INDEX_HEADER_SIZE {
        return Err(corrupt(path, "file too small for header"));
    }
    if &bytes[0..4] != INDEX_MAGIC {
        return Err(corrupt(path, "not a neighbor index (bad magic)"));
    }

    let expected_crc = read_u32(&bytes, 4);
    let payload = &bytes[INDEX_HEADER_SIZE..];
    let actual_crc = crc32fast::hash(payload);
    if actual_crc != expected_crc {
        return Err(corrupt(
            path,
            format!(
                "checksum mismatch: expected {:08x}, got {:08x}",
                expected_crc, actual_crc
            ),
        ));
    }

    let artifact: IndexArtifact = from_bincode(payload)?;
    if artifact.version != FORMAT_VERSION {
        return Err(corrupt(
            path,
            format!("unsupported version {}", artifact.version),
        ));
    }
    Ok(artifact)
}
