// Copyright 2020 Johannes Köster.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Breakend pairs, encoded as two mate records in VCF bracket notation.

use std::str::FromStr;

use anyhow::Result;
use bio_types::genome::{self, AbstractLocus};
use regex::Regex;

use crate::encoding::{filter_column, Info, Likelihoods, Record};
use crate::errors::Error;
use crate::reference::{self, SequenceProvider};
use crate::variants::{Breakpoint, Orientation, StructuralVariant};

/// Side of the bracketed mate locus on which the reference base is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefPlacement {
    Before,
    After,
}

/// Bracket character and placement of REF for a breakend with the given
/// orientation whose mate has `other_orient`.
///
/// The bracket points in the mate's orientation and REF follows the own one.
/// Mates therefore pair up as `t[p[`/`t[p[`, `t]p]`/`[p[t`, `[p[t`/`t]p]` and
/// `]p]t`/`]p]t`. This differs from the VCF 4.2 breakend pairing (where `t[p[`
/// pairs with `]p]t` and `t]p]` with `t]p]`). [`BreakendAlt::orientations`]
/// recovers the orientations this table was built from.
pub fn notation(orient: Orientation, other_orient: Orientation) -> (char, RefPlacement) {
    match (orient, other_orient) {
        (Orientation::Plus, Orientation::Plus) => ('[', RefPlacement::Before),
        (Orientation::Plus, Orientation::Minus) => (']', RefPlacement::Before),
        (Orientation::Minus, Orientation::Plus) => ('[', RefPlacement::After),
        (Orientation::Minus, Orientation::Minus) => (']', RefPlacement::After),
    }
}

/// 1-based position of a breakend. Minus-oriented adjacencies sit one base
/// left of the point estimate.
fn breakend_pos(bp: &Breakpoint, orient: Orientation) -> i64 {
    let pos = bp.point_estimate();
    match orient {
        Orientation::Plus => pos,
        Orientation::Minus => pos - 1,
    }
}

/// ID of the given side (0 or 1) of a breakend event.
pub fn mate_id(event_id: &str, side: usize) -> String {
    format!("{}_{}", event_id, side + 1)
}

/// A breakend ALT allele such as `G]chr2:3000]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakendAlt {
    pub ref_allele: String,
    pub mate: genome::Locus,
    pub bracket: char,
    pub ref_placement: RefPlacement,
}

impl BreakendAlt {
    pub fn new(ref_allele: &str, mate: genome::Locus, orient: Orientation, other_orient: Orientation) -> Self {
        let (bracket, ref_placement) = notation(orient, other_orient);
        BreakendAlt {
            ref_allele: ref_allele.to_owned(),
            mate,
            bracket,
            ref_placement,
        }
    }

    /// Orientations of this breakend and its mate, inverse of [`notation`].
    pub fn orientations(&self) -> (Orientation, Orientation) {
        let orient = match self.ref_placement {
            RefPlacement::Before => Orientation::Plus,
            RefPlacement::After => Orientation::Minus,
        };
        let other_orient = if self.bracket == '[' {
            Orientation::Plus
        } else {
            Orientation::Minus
        };
        (orient, other_orient)
    }
}

impl std::fmt::Display for BreakendAlt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let locus = format!(
            "{b}{}:{}{b}",
            self.mate.contig(),
            self.mate.pos(),
            b = self.bracket
        );
        match self.ref_placement {
            RefPlacement::Before => write!(f, "{}{}", self.ref_allele, locus),
            RefPlacement::After => write!(f, "{}{}", locus, self.ref_allele),
        }
    }
}

impl FromStr for BreakendAlt {
    type Err = anyhow::Error;

    fn from_str(spec: &str) -> Result<Self> {
        lazy_static! {
            static ref RE: Regex = Regex::new(
                r"^(?P<before>[A-Za-z.*]*)(?P<bracket1>[\]\[])(?P<contig>[^\]\[]+):(?P<pos>[0-9]+)(?P<bracket2>[\]\[])(?P<after>[A-Za-z.*]*)$"
            )
            .unwrap();
        }
        let invalid = || Error::InvalidBndAlt {
            spec: spec.to_owned(),
        };

        let caps = RE.captures(spec).ok_or_else(invalid)?;
        let bracket = &caps["bracket1"];
        if bracket != &caps["bracket2"] {
            return Err(invalid().into());
        }
        let (before, after) = (&caps["before"], &caps["after"]);
        let (ref_allele, ref_placement) = match (before.is_empty(), after.is_empty()) {
            (false, true) => (before, RefPlacement::Before),
            (true, false) => (after, RefPlacement::After),
            _ => return Err(invalid().into()),
        };
        let pos: u64 = caps["pos"].parse().map_err(|_| invalid())?;

        Ok(BreakendAlt {
            ref_allele: ref_allele.to_owned(),
            mate: genome::Locus::new(caps["contig"].to_owned(), pos),
            bracket: if bracket == "[" { '[' } else { ']' },
            ref_placement,
        })
    }
}

/// Build both mate records of a breakend event, first side first.
pub fn records<S: SequenceProvider + ?Sized>(
    sv: &StructuralVariant,
    reference: &S,
    filter: Option<&str>,
    likelihoods: &Likelihoods,
) -> Result<[Record; 2]> {
    let svtype = sv.svtype()?;
    if !svtype.is_breakend() {
        return Err(Error::UnsupportedSvType {
            svtype: sv.sv_type().to_owned(),
        }
        .into());
    }
    sv.validate()?;

    let orientations = sv.bnd_orientation();
    // VCF is 1-based
    let shift = |bp: &Breakpoint| {
        bp.shifted(1).ok_or_else(|| Error::CoordinateOutOfRange {
            event_id: sv.event_id().to_owned(),
            value: bp.hi,
        })
    };
    let bps = [shift(sv.bp1())?, shift(sv.bp2())?];
    let chrom = sv.ref_chrom();

    let side = |i: usize| -> Result<Record> {
        let (bp, other_bp) = (&bps[i], &bps[1 - i]);
        let (orient, other_orient) = (orientations[i], orientations[1 - i]);

        let pos = breakend_pos(bp, orient);
        let other_pos = breakend_pos(other_bp, other_orient);
        let ref_allele = reference::ref_base(reference, chrom, pos)?;

        let mate = genome::Locus::new(chrom.to_owned(), other_pos as u64);
        let alt = BreakendAlt::new(&ref_allele, mate, orient, other_orient);

        let mut info = Info::default();
        info.push("SVTYPE", "BND")
            .push("MATEID", mate_id(sv.event_id(), 1 - i))
            .push_ci("CIPOS", bp.confidence_interval());
        if sv.bnd_ins() > 0 {
            info.push("INSLEN", sv.bnd_ins());
        }
        info.push_evidence(sv, likelihoods);

        Ok(Record {
            chrom: chrom.to_owned(),
            pos,
            id: mate_id(sv.event_id(), i),
            ref_allele,
            alt_allele: alt.to_string(),
            filter: filter_column(filter),
            info,
            format: "GT".to_owned(),
            sample: sv.genotype().to_owned(),
        })
    };

    Ok([side(0)?, side(1)?])
}

/// Encode a breakend event as its two newline-terminated mate lines.
pub fn encode<S: SequenceProvider + ?Sized>(
    sv: &StructuralVariant,
    reference: &S,
    filter: Option<&str>,
    likelihoods: &Likelihoods,
) -> Result<String> {
    let [first, second] = records(sv, reference, filter, likelihoods)?;
    debug!(
        "encoded breakend pair {} ({}:{}) and {} ({}:{})",
        first.id(),
        first.chrom(),
        first.pos(),
        second.id(),
        second.chrom(),
        second.pos()
    );
    Ok(format!("{}{}", first, second))
}
