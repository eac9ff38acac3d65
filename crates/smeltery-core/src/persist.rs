//! Region-scoped persistence of furnace records.
//!
//! Each region is stored as one bitcode blob with a versioned header. The
//! header carries the region id so a blob filed under the wrong key is
//! rejected instead of loading furnaces into the wrong place.

use crate::id::{Location, RegionId};
use crate::state::FurnaceRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a furnace region blob.
pub const REGION_MAGIC: u32 = 0x5E17_0001;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", REGION_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("region blob from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("blob for region {found:?} filed under {expected:?}")]
    RegionMismatch { expected: RegionId, found: RegionId },
    #[error("storage backend failed: {0}")]
    Backend(String),
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// Header prepended to every region blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionHeader {
    pub magic: u32,
    pub version: u32,
    pub region: RegionId,
}

impl RegionHeader {
    pub fn new(region: RegionId) -> Self {
        Self {
            magic: REGION_MAGIC,
            version: FORMAT_VERSION,
            region,
        }
    }

    /// Validate the header against the region it was loaded for.
    pub fn validate(&self, expected: RegionId) -> Result<(), StoreError> {
        if self.magic != REGION_MAGIC {
            return Err(StoreError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(StoreError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion(self.version));
        }
        if self.region != expected {
            return Err(StoreError::RegionMismatch {
                expected,
                found: self.region,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RegionBlob {
    header: RegionHeader,
    records: Vec<FurnaceRecord>,
}

/// Encode a region's records.
pub fn encode_region(region: RegionId, records: &[FurnaceRecord]) -> Result<Vec<u8>, StoreError> {
    let blob = RegionBlob {
        header: RegionHeader::new(region),
        records: records.to_vec(),
    };
    bitcode::serialize(&blob).map_err(|e| StoreError::Encode(e.to_string()))
}

/// Decode a region blob, validating its header.
pub fn decode_region(region: RegionId, data: &[u8]) -> Result<Vec<FurnaceRecord>, StoreError> {
    let blob: RegionBlob =
        bitcode::deserialize(data).map_err(|e| StoreError::Decode(e.to_string()))?;
    blob.header.validate(region)?;
    Ok(blob.records)
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Durable storage for furnace records, addressed by region.
pub trait FurnaceStore {
    /// All records saved for a region. A region never saved loads empty.
    fn load_region(&mut self, region: RegionId) -> Result<Vec<FurnaceRecord>, StoreError>;

    /// Replace the saved records of a region.
    fn save_region(&mut self, region: RegionId, records: &[FurnaceRecord])
    -> Result<(), StoreError>;

    /// Forget the record at a location.
    fn remove(&mut self, at: Location) -> Result<(), StoreError>;
}

/// In-memory store holding one encoded blob per region.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: HashMap<RegionId, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw blob for a region, if any.
    pub fn blob(&self, region: RegionId) -> Option<&[u8]> {
        self.blobs.get(&region).map(Vec::as_slice)
    }

    /// Overwrite a region's raw blob.
    pub fn insert_blob(&mut self, region: RegionId, data: Vec<u8>) {
        self.blobs.insert(region, data);
    }

    pub fn region_count(&self) -> usize {
        self.blobs.len()
    }
}

impl FurnaceStore for MemoryStore {
    fn load_region(&mut self, region: RegionId) -> Result<Vec<FurnaceRecord>, StoreError> {
        match self.blobs.get(&region) {
            Some(data) => decode_region(region, data),
            None => Ok(Vec::new()),
        }
    }

    fn save_region(
        &mut self,
        region: RegionId,
        records: &[FurnaceRecord],
    ) -> Result<(), StoreError> {
        if records.is_empty() {
            self.blobs.remove(&region);
            return Ok(());
        }
        let data = encode_region(region, records)?;
        self.blobs.insert(region, data);
        Ok(())
    }

    fn remove(&mut self, at: Location) -> Result<(), StoreError> {
        let region = at.region();
        if !self.blobs.contains_key(&region) {
            return Ok(());
        }
        let mut records = self.load_region(region)?;
        let before = records.len();
        records.retain(|r| r.location != at);
        if records.len() != before {
            self.save_region(region, &records)?;
        }
        Ok(())
    }
}
