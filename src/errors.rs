// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error(
        "unsupported SV type {svtype}, must be one of {} (optionally followed by :SUBTYPE)",
        crate::variants::supported_sv_types().join(", ")
    )]
    UnsupportedSvType { svtype: String },
    #[error("SV type {svtype} cannot be encoded as a single VCF record, use the breakend encoder")]
    BreakendNotSimple { svtype: String },
    #[error("contig {contig} not found in reference")]
    UnknownContig { contig: String },
    #[error("reference lookup failed for {contig}:{start}-{end}: {msg}")]
    ReferenceLookup {
        contig: String,
        start: i64,
        end: i64,
        msg: String,
    },
    #[error("unable to read contig index of reference {path}: {msg}")]
    ContigIndexUnreadable { path: String, msg: String },
    #[error("invalid breakpoint range ({lo}, {hi}) in event {event_id}: upper bound is smaller than lower bound")]
    InvalidBreakpointRange { event_id: String, lo: i64, hi: i64 },
    #[error("breakend event {event_id} must have exactly two orientations, found {found}")]
    InvalidBndOrientationCount { event_id: String, found: usize },
    #[error("negative breakpoint range ({lo}, {hi}) in event {event_id}")]
    NegativeBreakpoint { event_id: String, lo: i64, hi: i64 },
    #[error("coordinate {value} of event {event_id} is too large to be written as a VCF position")]
    CoordinateOutOfRange { event_id: String, value: i64 },
    #[error("SVLEN of duplication {event_id} with copy number {copynumber} does not fit into 64 bits")]
    SvLenOutOfRange { event_id: String, copynumber: i64 },
    #[error("duplication {event_id} does not define a copy number")]
    MissingCopyNumber { event_id: String },
    #[error("SV record with empty event ID")]
    EmptyEventId,
    #[error("invalid BND ALT {spec}: does not follow the VCF breakend notation")]
    InvalidBndAlt { spec: String },
}

/// Coarse classification of encoding failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedType,
    LookupFailure,
    MalformedRecord,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedSvType { .. } | Error::BreakendNotSimple { .. } => {
                ErrorKind::UnsupportedType
            }
            Error::UnknownContig { .. }
            | Error::ReferenceLookup { .. }
            | Error::ContigIndexUnreadable { .. } => ErrorKind::LookupFailure,
            Error::InvalidBreakpointRange { .. }
            | Error::InvalidBndOrientationCount { .. }
            | Error::NegativeBreakpoint { .. }
            | Error::CoordinateOutOfRange { .. }
            | Error::SvLenOutOfRange { .. }
            | Error::MissingCopyNumber { .. }
            | Error::EmptyEventId
            | Error::InvalidBndAlt { .. } => ErrorKind::MalformedRecord,
        }
    }
}

pub(crate) fn reference_lookup(contig: &str, start: i64, end: i64, msg: &str) -> Error {
    Error::ReferenceLookup {
        contig: contig.to_owned(),
        start,
        end,
        msg: msg.to_owned(),
    }
}
