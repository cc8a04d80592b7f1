// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! VCF meta-information and column header.

use std::path::Path;

use anyhow::Result;
use itertools::Itertools;
use time::{Date, OffsetDateTime};
use typed_builder::TypedBuilder;

use crate::reference::ContigIndex;

pub const FILEFORMAT: &str = "VCFv4.2";

pub const DEFINITIONS: &[&str] = &[
    r#"##ALT=<ID=DEL,Description="Deletion">"#,
    r#"##ALT=<ID=DUP,Description="Duplication">"#,
    r#"##ALT=<ID=INV,Description="Inversion">"#,
    r#"##ALT=<ID=DUP:TANDEM,Description="Tandem duplication">"#,
    r#"##ALT=<ID=INS,Description="Insertion of novel sequence">"#,
    r#"##INFO=<ID=CIEND,Number=2,Type=Integer,Description="Confidence interval around END for imprecise variants">"#,
    r#"##INFO=<ID=CIPOS,Number=2,Type=Integer,Description="Confidence interval around POS for imprecise variants">"#,
    r#"##INFO=<ID=END,Number=1,Type=Integer,Description="End position of the variant described in this record">"#,
    r#"##INFO=<ID=INSLEN,Number=1,Type=Integer,Description="Inserted sequence at breakend adjacency">"#,
    r#"##INFO=<ID=LHR,Number=1,Type=Float,Description="Log likelihood ratio of this event (higher is better)">"#,
    r#"##INFO=<ID=MATEID,Number=.,Type=String,Description="ID of mate breakends">"#,
    r#"##INFO=<ID=SR,Number=1,Type=Integer,Description="Number of split reads supporting this variant">"#,
    r#"##INFO=<ID=PE,Number=1,Type=Integer,Description="Number of discordant read pairs supporting this variant">"#,
    r#"##INFO=<ID=SVLEN,Number=1,Type=Integer,Description="Difference in length between REF and ALT alleles">"#,
    r#"##INFO=<ID=SVTYPE,Number=1,Type=String,Description="Type of structural variant">"#,
    r#"##INFO=<ID=EVENTTYPE,Number=1,Type=String,Description="Type of rearrangement on this allele (simple/complex)">"#,
    r#"##FILTER=<ID=INSERTION,Description="Event contains an insertion call">"#,
    r#"##FORMAT=<ID=HCN,Number=1,Type=Integer,Description="Haploid copy number for duplications">"#,
    r#"##FORMAT=<ID=GT,Number=1,Type=String,Description="Genotype">"#,
];

const COLUMNS: &[&str] = &[
    "#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT",
];

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// `YYYYMMDD` as used by the `fileDate` line.
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}{:02}{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Options for rendering a VCF header.
#[derive(TypedBuilder, Debug, Clone)]
pub struct Header<'a> {
    /// Version of the producing tool, written as `##source=sv2vcf-<version>`.
    source_version: &'a str,
    reference_path: &'a Path,
    #[builder(default = "sample1")]
    sample_name: &'a str,
    #[builder(default = today())]
    file_date: Date,
}

impl<'a> Header<'a> {
    /// Render the header, taking contig lines from the given index.
    pub fn render<C: ContigIndex + ?Sized>(&self, contigs: &C) -> Result<String> {
        let contigs = contigs.contigs()?;
        let reference_name = self
            .reference_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.reference_path.display().to_string());

        let mut lines = vec![
            format!("##fileformat={}", FILEFORMAT),
            format!("##fileDate={}", format_date(self.file_date)),
            format!("##source=sv2vcf-{}", self.source_version),
            format!("##reference={}", reference_name),
        ];
        lines.extend(
            contigs
                .iter()
                .map(|contig| format!("##contig=<ID={},length={}>", contig.name, contig.len)),
        );
        lines.extend(DEFINITIONS.iter().map(|line| (*line).to_owned()));
        lines.push(COLUMNS.iter().chain(&[self.sample_name]).join("\t"));

        debug!(
            "rendered VCF header with {} contigs for sample {}",
            contigs.len(),
            self.sample_name
        );
        Ok(lines.iter().map(|line| format!("{}\n", line)).collect())
    }
}
