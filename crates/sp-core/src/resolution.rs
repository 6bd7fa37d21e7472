//! Resolution ladder.
//!
//! A decoded video height is snapped to the nearest standard height. Ties go
//! to the first minimum found scanning [`LADDER`] top-down, i.e. the higher
//! bucket.

use crate::media::ScanType;
use serde::{Serialize, Serializer};
use std::fmt;

/// Standard heights, descending.
pub const LADDER: [u32; 7] = [4320, 2160, 1440, 1080, 720, 576, 480];

/// Label used when no height could be decoded.
pub const OTHER: &str = "other";

/// A resolved bucket: a ladder height with scan type, or `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionBucket {
    Standard { height: u32, scan: ScanType },
    Other,
}

impl ResolutionBucket {
    /// Map a decoded height and scan signals to a bucket.
    ///
    /// `scan` is the container's declared scan type; `interlaced` is the
    /// secondary flag consulted only when `scan` is unknown. With neither
    /// signal the video is assumed progressive.
    pub fn resolve(height: Option<u32>, scan: Option<ScanType>, interlaced: Option<bool>) -> Self {
        let Some(height) = height.filter(|h| *h > 0) else {
            return ResolutionBucket::Other;
        };
        let scan = scan.unwrap_or(match interlaced {
            Some(true) => ScanType::Interlaced,
            _ => ScanType::Progressive,
        });
        ResolutionBucket::Standard {
            height: nearest_height(height),
            scan,
        }
    }

    pub fn is_other(&self) -> bool {
        matches!(self, ResolutionBucket::Other)
    }
}

impl fmt::Display for ResolutionBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionBucket::Standard { height, scan } => write!(f, "{height}{}", scan.suffix()),
            ResolutionBucket::Other => f.write_str(OTHER),
        }
    }
}

impl Serialize for ResolutionBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Nearest ladder height by absolute distance.
///
/// # Examples
///
/// ```
/// use sp_core::resolution::nearest_height;
///
/// assert_eq!(nearest_height(1000), 1080);
/// assert_eq!(nearest_height(1800), 2160);
/// ```
pub fn nearest_height(height: u32) -> u32 {
    let mut best = LADDER[0];
    let mut best_distance = best.abs_diff(height);
    for &step in &LADDER[1..] {
        let distance = step.abs_diff(height);
        // strict: an equal distance keeps the earlier (higher) entry
        if distance < best_distance {
            best = step;
            best_distance = distance;
        }
    }
    best
}
