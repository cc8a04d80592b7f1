// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Deletions, insertions, duplications and inversions, each as a single
//! record with a symbolic ALT allele.

use anyhow::Result;

use crate::encoding::{filter_column, Info, Likelihoods, Record};
use crate::errors::Error;
use crate::reference::{self, SequenceProvider};
use crate::variants::{BaseSvType, StructuralVariant};

/// Signed length difference between REF and ALT, `None` where it is not defined.
fn svlen(sv: &StructuralVariant, svtype: BaseSvType, pos: i64, end: i64) -> Result<Option<i64>> {
    Ok(match svtype {
        BaseSvType::Deletion => Some(-(end - pos)),
        BaseSvType::Insertion => sv.length(),
        BaseSvType::Duplication => {
            let copies = copynumber(sv)?;
            let svlen = copies
                .checked_sub(1)
                .and_then(|extra| (end - pos).checked_mul(extra))
                .ok_or_else(|| Error::SvLenOutOfRange {
                    event_id: sv.event_id().to_owned(),
                    copynumber: copies,
                })?;
            Some(svlen)
        }
        BaseSvType::Inversion => None,
        BaseSvType::Breakend => unreachable!("bug: breakends are encoded separately"),
    })
}

fn copynumber(sv: &StructuralVariant) -> Result<i64> {
    sv.copynumber().ok_or_else(|| {
        Error::MissingCopyNumber {
            event_id: sv.event_id().to_owned(),
        }
        .into()
    })
}

/// Build the record for a DEL, INS, DUP or INV.
pub fn record<S: SequenceProvider + ?Sized>(
    sv: &StructuralVariant,
    reference: &S,
    filter: Option<&str>,
    likelihoods: &Likelihoods,
) -> Result<Record> {
    let svtype = sv.svtype()?;
    if svtype.is_breakend() {
        return Err(Error::BreakendNotSimple {
            svtype: sv.sv_type().to_owned(),
        }
        .into());
    }
    sv.validate()?;
    let base = svtype.base();

    // VCF is 1-based
    let pos = sv.bp1().point_estimate() + 1;
    let end = sv.bp2().point_estimate() + 1;
    let ref_allele = reference::ref_base(reference, sv.ref_chrom(), pos)?;

    let mut info = Info::default();
    info.push("SVTYPE", base).push("END", end);
    if let Some(svlen) = svlen(sv, base, pos, end)? {
        info.push("SVLEN", svlen);
    }
    info.push_ci("CIPOS", sv.bp1().confidence_interval());
    if base != BaseSvType::Insertion {
        info.push_ci("CIEND", sv.bp2().confidence_interval());
    }
    info.push_evidence(sv, likelihoods);

    let (format, sample) = if base == BaseSvType::Duplication {
        (
            "GT:HCN".to_owned(),
            format!("{}:{}", sv.genotype(), copynumber(sv)?),
        )
    } else {
        ("GT".to_owned(), sv.genotype().to_owned())
    };

    Ok(Record {
        chrom: sv.ref_chrom().to_owned(),
        pos,
        id: sv.event_id().to_owned(),
        ref_allele,
        alt_allele: format!("<{}>", base),
        filter: filter_column(filter),
        info,
        format,
        sample,
    })
}

/// Encode a DEL, INS, DUP or INV as one newline-terminated VCF line.
pub fn encode<S: SequenceProvider + ?Sized>(
    sv: &StructuralVariant,
    reference: &S,
    filter: Option<&str>,
    likelihoods: &Likelihoods,
) -> Result<String> {
    let record = record(sv, reference, filter, likelihoods)?;
    debug!(
        "encoded {} {} at {}:{}",
        sv.sv_type(),
        record.id(),
        record.chrom(),
        record.pos()
    );
    Ok(record.to_string())
}
