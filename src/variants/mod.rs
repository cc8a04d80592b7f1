// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Structural variant records as handed over by the caller.

use std::str::FromStr;

use anyhow::Result;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::errors::Error;

/// Largest 0-based coordinate a record may carry.
pub const MAX_COORDINATE: i64 = i64::MAX - 2;

/// Uncertainty range `(lo, hi)` of a breakpoint, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(from = "(i64, i64)", into = "(i64, i64)")]
pub struct Breakpoint {
    pub lo: i64,
    pub hi: i64,
}

impl From<(i64, i64)> for Breakpoint {
    fn from((lo, hi): (i64, i64)) -> Self {
        Breakpoint { lo, hi }
    }
}

impl From<Breakpoint> for (i64, i64) {
    fn from(bp: Breakpoint) -> Self {
        (bp.lo, bp.hi)
    }
}

impl Breakpoint {
    /// Median of the range, rounded down.
    pub fn point_estimate(&self) -> i64 {
        ((i128::from(self.lo) + i128::from(self.hi)).div_euclid(2)) as i64
    }

    /// Confidence interval around the point estimate, `None` if the range
    /// spans at most two positions.
    pub fn confidence_interval(&self) -> Option<(i64, i64)> {
        let cilen = self.hi.checked_sub(self.lo)?.checked_sub(2)?;
        if cilen > 0 {
            let half = cilen.div_euclid(2);
            Some((-half, cilen - half))
        } else {
            None
        }
    }

    /// Range moved by `offset`, `None` on overflow.
    pub fn shifted(&self, offset: i64) -> Option<Self> {
        Some(Breakpoint::new(
            self.lo.checked_add(offset)?,
            self.hi.checked_add(offset)?,
        ))
    }

    pub fn is_valid(&self) -> bool {
        self.hi >= self.lo
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum Orientation {
    #[strum(serialize = "+")]
    #[serde(rename = "+")]
    Plus,
    #[strum(serialize = "-")]
    #[serde(rename = "-")]
    Minus,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum BaseSvType {
    #[strum(serialize = "DEL")]
    Deletion,
    #[strum(serialize = "INS")]
    Insertion,
    #[strum(serialize = "DUP")]
    Duplication,
    #[strum(serialize = "INV")]
    Inversion,
    #[strum(serialize = "BND")]
    Breakend,
}

/// An SV type such as `DEL` or `DUP:TANDEM`.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct SvType {
    #[getset(skip)]
    base: BaseSvType,
    subtype: Option<String>,
}

impl SvType {
    pub fn base(&self) -> BaseSvType {
        self.base
    }

    pub fn is_breakend(&self) -> bool {
        self.base == BaseSvType::Breakend
    }
}

impl FromStr for SvType {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (base, subtype) = match s.split_once(':') {
            Some((base, subtype)) => (base, Some(subtype.to_owned())),
            None => (s, None),
        };
        let base = BaseSvType::from_str(base).map_err(|_| Error::UnsupportedSvType {
            svtype: s.to_owned(),
        })?;
        Ok(SvType { base, subtype })
    }
}

impl std::fmt::Display for SvType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.subtype {
            Some(subtype) => write!(f, "{}:{}", self.base, subtype),
            None => write!(f, "{}", self.base),
        }
    }
}

/// Names of all supported base SV types, in declaration order.
pub fn supported_sv_types() -> Vec<&'static str> {
    BaseSvType::iter().map(|t| t.into()).collect()
}

/// A finalized structural variant call.
#[derive(Debug, Clone, PartialEq, Builder, Getters, Serialize, Deserialize)]
#[getset(get = "pub")]
pub struct StructuralVariant {
    #[builder(setter(into))]
    #[serde(rename = "type")]
    sv_type: String,
    #[builder(setter(into))]
    ref_chrom: String,
    bp1: Breakpoint,
    bp2: Breakpoint,
    #[builder(default)]
    #[serde(default)]
    bnd_orientation: Vec<Orientation>,
    #[builder(default)]
    #[serde(default)]
    #[getset(skip)]
    bnd_ins: u64,
    #[builder(default)]
    #[serde(default)]
    #[getset(skip)]
    length: Option<i64>,
    #[builder(default)]
    #[serde(default)]
    #[getset(skip)]
    copynumber: Option<i64>,
    #[builder(setter(into))]
    genotype: String,
    #[builder(setter(into))]
    event_id: String,
    #[builder(default)]
    #[serde(default)]
    #[getset(skip)]
    split_support: u32,
    #[builder(default)]
    #[serde(default)]
    #[getset(skip)]
    pe_support: u32,
    #[builder(setter(into))]
    event_type: String,
}

impl StructuralVariant {
    pub fn bnd_ins(&self) -> u64 {
        self.bnd_ins
    }

    pub fn length(&self) -> Option<i64> {
        self.length
    }

    pub fn copynumber(&self) -> Option<i64> {
        self.copynumber
    }

    pub fn split_support(&self) -> u32 {
        self.split_support
    }

    pub fn pe_support(&self) -> u32 {
        self.pe_support
    }

    /// Parse the type of this record.
    pub fn svtype(&self) -> Result<SvType> {
        Ok(self.sv_type.parse::<SvType>()?)
    }

    /// Check the structural invariants of the record.
    pub fn validate(&self) -> Result<()> {
        if self.event_id.is_empty() {
            return Err(Error::EmptyEventId.into());
        }
        for bp in &[self.bp1, self.bp2] {
            if bp.lo < 0 {
                return Err(Error::NegativeBreakpoint {
                    event_id: self.event_id.clone(),
                    lo: bp.lo,
                    hi: bp.hi,
                }
                .into());
            }
            if !bp.is_valid() {
                return Err(Error::InvalidBreakpointRange {
                    event_id: self.event_id.clone(),
                    lo: bp.lo,
                    hi: bp.hi,
                }
                .into());
            }
            // 1-based shift plus the breakend shift must stay representable
            if bp.hi > MAX_COORDINATE {
                return Err(Error::CoordinateOutOfRange {
                    event_id: self.event_id.clone(),
                    value: bp.hi,
                }
                .into());
            }
        }
        if self.svtype()?.is_breakend() && self.bnd_orientation.len() != 2 {
            return Err(Error::InvalidBndOrientationCount {
                event_id: self.event_id.clone(),
                found: self.bnd_orientation.len(),
            }
            .into());
        }
        Ok(())
    }
}
