use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::HandoverError;

/// The five photographs every handover needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoSlot {
    Front,
    Interior,
    Vin,
    TitleFront,
    TitleBack,
}

impl PhotoSlot {
    /// Document order
    pub const ALL: [PhotoSlot; 5] = [
        PhotoSlot::Front,
        PhotoSlot::Interior,
        PhotoSlot::Vin,
        PhotoSlot::TitleFront,
        PhotoSlot::TitleBack,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PhotoSlot::Front => "front",
            PhotoSlot::Interior => "interior",
            PhotoSlot::Vin => "vin",
            PhotoSlot::TitleFront => "title_front",
            PhotoSlot::TitleBack => "title_back",
        }
    }

    /// Caption printed under the photo
    pub fn label(self) -> &'static str {
        match self {
            PhotoSlot::Front => "Foto zepředu",
            PhotoSlot::Interior => "Interiér",
            PhotoSlot::Vin => "VIN",
            PhotoSlot::TitleFront => "TP - první strana",
            PhotoSlot::TitleBack => "TP - druhá strana",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PhotoSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PhotoSlot {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "front" => Ok(PhotoSlot::Front),
            "interior" => Ok(PhotoSlot::Interior),
            "vin" => Ok(PhotoSlot::Vin),
            "title_front" | "tpfront" => Ok(PhotoSlot::TitleFront),
            "title_back" | "tpback" => Ok(PhotoSlot::TitleBack),
            _ => Err(anyhow::anyhow!("Invalid photo slot: {}", s)),
        }
    }
}

/// A locally selected image file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoSource(PathBuf);

impl PhotoSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Five slots, each empty or holding a photo
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoSet {
    slots: [Option<PhotoSource>; 5],
}

impl PhotoSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, slot: PhotoSlot, source: PhotoSource) {
        self.slots[slot.index()] = Some(source);
    }

    pub fn clear(&mut self, slot: PhotoSlot) -> Option<PhotoSource> {
        self.slots[slot.index()].take()
    }

    pub fn get(&self, slot: PhotoSlot) -> Option<&PhotoSource> {
        self.slots[slot.index()].as_ref()
    }

    pub fn missing(&self) -> Vec<PhotoSlot> {
        PhotoSlot::ALL
            .into_iter()
            .filter(|slot| self.get(*slot).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Fails with [`HandoverError::MissingPhotos`] naming the empty slots.
    pub fn require_complete(&self) -> Result<(), HandoverError> {
        let missing = self.missing();
        if missing.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = missing.iter().map(|s| s.key()).collect();
        Err(HandoverError::MissingPhotos(names.join(", ")))
    }

    /// Populated slots in document order
    pub fn iter(&self) -> impl Iterator<Item = (PhotoSlot, &PhotoSource)> + '_ {
        PhotoSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|src| (slot, src)))
    }

    pub fn clear_all(&mut self) {
        self.slots = Default::default();
    }
}
