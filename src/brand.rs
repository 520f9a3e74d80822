//! The reference list of brands used for bucketing sales in reports.
//!
//! Sales keep the brand string exactly as entered. Reports that lay brands out
//! in fixed columns or rows (the matrix, segment grid and brand performance
//! table) go through [BrandBucket::of] so that they all agree on what counts as
//! "Other".

use serde::Serialize;

/// One of the fixed brand columns in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum BrandBucket {
    Samsung,
    Apple,
    Realme,
    Oppo,
    Vivo,
    Xiaomi,
    Moto,
    Other,
}

impl BrandBucket {
    /// Every bucket in report column order, "Other" last.
    pub const ALL: [BrandBucket; 8] = [
        BrandBucket::Samsung,
        BrandBucket::Apple,
        BrandBucket::Realme,
        BrandBucket::Oppo,
        BrandBucket::Vivo,
        BrandBucket::Xiaomi,
        BrandBucket::Moto,
        BrandBucket::Other,
    ];

    /// Find the bucket for a brand as it was entered.
    ///
    /// Matching ignores case and surrounding whitespace. "Motorola" shares the
    /// "Moto" bucket. Anything not on the reference list is [BrandBucket::Other].
    pub fn of(brand: &str) -> Self {
        match brand.trim().to_lowercase().as_str() {
            "samsung" => Self::Samsung,
            "apple" => Self::Apple,
            "realme" => Self::Realme,
            "oppo" => Self::Oppo,
            "vivo" => Self::Vivo,
            "xiaomi" => Self::Xiaomi,
            "moto" | "motorola" => Self::Moto,
            _ => Self::Other,
        }
    }

    /// The display name used for column headers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Samsung => "Samsung",
            Self::Apple => "Apple",
            Self::Realme => "Realme",
            Self::Oppo => "Oppo",
            Self::Vivo => "Vivo",
            Self::Xiaomi => "Xiaomi",
            Self::Moto => "Moto",
            Self::Other => "Other",
        }
    }

    /// Position of the bucket in [BrandBucket::ALL].
    pub fn index(self) -> usize {
        self as usize
    }
}
