//! Price segments, the brackets used to describe how premium a device is.

use serde::Serialize;

use crate::Error;

/// A price bracket with a left-inclusive lower bound.
///
/// The variants are declared in ascending price order, so the derived [Ord]
/// can be used to sort sales by segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PriceSegment {
    /// `[0, 10,000)`
    Under10K,
    /// `[10,000, 15,000)`
    From10KTo15K,
    /// `[15,000, 20,000)`
    From15KTo20K,
    /// `[20,000, 30,000)`
    From20KTo30K,
    /// `[30,000, 40,000)`
    From30KTo40K,
    /// `[40,000, 70,000)`
    From40KTo70K,
    /// `[70,000, 100,000)`
    From70KTo100K,
    /// `[100,000, ∞)`
    Over100K,
}

impl PriceSegment {
    /// Every segment, cheapest first.
    pub const ALL: [PriceSegment; 8] = [
        PriceSegment::Under10K,
        PriceSegment::From10KTo15K,
        PriceSegment::From15KTo20K,
        PriceSegment::From20KTo30K,
        PriceSegment::From30KTo40K,
        PriceSegment::From40KTo70K,
        PriceSegment::From70KTo100K,
        PriceSegment::Over100K,
    ];

    /// Classify a unit price into its segment.
    ///
    /// Boundary prices belong to the upper segment, e.g. exactly 10,000 is
    /// [PriceSegment::From10KTo15K].
    ///
    /// # Errors
    /// Returns [Error::InvalidPrice] if `price` is NaN or infinite, or
    /// [Error::NegativePrice] if it is below zero.
    pub fn classify(price: f64) -> Result<Self, Error> {
        if !price.is_finite() {
            return Err(Error::InvalidPrice(price));
        }

        if price < 0.0 {
            return Err(Error::NegativePrice(price));
        }

        let segment = if price < 10_000.0 {
            Self::Under10K
        } else if price < 15_000.0 {
            Self::From10KTo15K
        } else if price < 20_000.0 {
            Self::From15KTo20K
        } else if price < 30_000.0 {
            Self::From20KTo30K
        } else if price < 40_000.0 {
            Self::From30KTo40K
        } else if price < 70_000.0 {
            Self::From40KTo70K
        } else if price < 100_000.0 {
            Self::From70KTo100K
        } else {
            Self::Over100K
        };

        Ok(segment)
    }

    /// The column label used in reports and the backup file.
    pub fn label(self) -> &'static str {
        match self {
            Self::Under10K => "<10K",
            Self::From10KTo15K => "10K-15K",
            Self::From15KTo20K => "15K-20K",
            Self::From20KTo30K => "20K-30K",
            Self::From30KTo40K => "30K-40K",
            Self::From40KTo70K => "40K-70K",
            Self::From70KTo100K => "70K-100K",
            Self::Over100K => ">100K",
        }
    }

    /// Position of the segment in [PriceSegment::ALL].
    pub fn index(self) -> usize {
        self as usize
    }
}
