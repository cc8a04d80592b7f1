// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Encoding of structural variants as VCF text records.

use std::fmt;

use anyhow::Result;
use itertools::Itertools;

use crate::reference::SequenceProvider;
use crate::variants::StructuralVariant;

pub mod breakends;
pub mod simple;

/// Placeholder for missing values.
pub(crate) const MISSING: &str = ".";

/// Log-likelihoods of the called event and of the reference hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, new)]
pub struct Likelihoods {
    pub event_lh: f64,
    pub ref_lh: f64,
}

impl Likelihoods {
    /// Log likelihood ratio, rendered with two decimals.
    pub fn lhr(&self) -> String {
        format!("{:.2}", self.event_lh - self.ref_lh)
    }
}

/// INFO column. Keys are kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info {
    fields: Vec<(&'static str, String)>,
}

impl Info {
    pub fn push<V: ToString>(&mut self, key: &'static str, value: V) -> &mut Self {
        self.fields.push((key, value.to_string()));
        self
    }

    pub fn push_ci(&mut self, key: &'static str, ci: Option<(i64, i64)>) -> &mut Self {
        if let Some((low, high)) = ci {
            self.push(key, format!("{},{}", low, high));
        }
        self
    }

    /// Append the evidence fields shared by all record kinds.
    pub(crate) fn push_evidence(&mut self, sv: &StructuralVariant, likelihoods: &Likelihoods) -> &mut Self {
        self.push("LHR", likelihoods.lhr())
            .push("SR", sv.split_support())
            .push("PE", sv.pe_support())
            .push("EVENTTYPE", sv.event_type())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(k, _)| *k).collect()
    }
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .join(";")
        )
    }
}

/// One VCF data line.
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct Record {
    chrom: String,
    pos: i64,
    id: String,
    ref_allele: String,
    alt_allele: String,
    filter: String,
    info: Info,
    format: String,
    sample: String,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.chrom,
            self.pos,
            self.id,
            self.ref_allele,
            self.alt_allele,
            MISSING,
            self.filter,
            self.info,
            self.format,
            self.sample
        )
    }
}

pub(crate) fn filter_column(filter: Option<&str>) -> String {
    filter.unwrap_or(MISSING).to_owned()
}

/// Encode the given SV as VCF text: one line for simple variants, two mate
/// lines for breakends.
pub fn encode<S: SequenceProvider + ?Sized>(
    sv: &StructuralVariant,
    reference: &S,
    filter: Option<&str>,
    likelihoods: &Likelihoods,
) -> Result<String> {
    if sv.svtype()?.is_breakend() {
        breakends::encode(sv, reference, filter, likelihoods)
    } else {
        simple::encode(sv, reference, filter, likelihoods)
    }
}
