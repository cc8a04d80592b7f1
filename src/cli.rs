// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use structopt::StructOpt;

use crate::encoding::{self, Likelihoods};
use crate::header::Header;
use crate::reference::{self, SequenceProvider};
use crate::variants::StructuralVariant;

/// Number of contigs kept in memory while encoding.
const REFERENCE_BUFFER_CAPACITY: usize = 3;

#[derive(Debug, StructOpt, Clone)]
#[structopt(
    name = "sv2vcf",
    about = "Encode structural variant calls as VCF records."
)]
#[structopt(setting = structopt::clap::AppSettings::ColoredHelp)]
pub enum Sv2Vcf {
    #[structopt(
        name = "convert",
        about = "Convert SV calls (one JSON object per line) into a VCF file written to STDOUT."
    )]
    Convert {
        #[structopt(
            parse(from_os_str),
            help = "FASTA file with reference genome. Has to be indexed with samtools faidx."
        )]
        reference: PathBuf,
        #[structopt(
            parse(from_os_str),
            long,
            help = "File with SV calls in JSON lines format (if omitted, read from STDIN)."
        )]
        input: Option<PathBuf>,
        #[structopt(long = "sample-name", default_value = "sample1", help = "Name of the sample column.")]
        sample_name: String,
        #[structopt(
            long = "skip-invalid",
            help = "Skip SV calls that cannot be encoded instead of aborting (a warning is logged for each)."
        )]
        skip_invalid: bool,
        #[structopt(long, help = "Print debug information.")]
        verbose: bool,
    },
    #[structopt(name = "header", about = "Write only the VCF header to STDOUT.")]
    Header {
        #[structopt(
            parse(from_os_str),
            help = "FASTA file with reference genome. Has to be indexed with samtools faidx."
        )]
        reference: PathBuf,
        #[structopt(long = "sample-name", default_value = "sample1", help = "Name of the sample column.")]
        sample_name: String,
        #[structopt(long, help = "Print debug information.")]
        verbose: bool,
    },
}

impl Sv2Vcf {
    pub fn verbose(&self) -> bool {
        match self {
            Sv2Vcf::Convert { verbose, .. } | Sv2Vcf::Header { verbose, .. } => *verbose,
        }
    }
}

/// An SV call together with its scores, as read from the JSON input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvCall {
    #[serde(flatten)]
    pub sv: StructuralVariant,
    #[serde(default)]
    pub filter: Option<String>,
    pub event_lh: f64,
    pub ref_lh: f64,
}

impl SvCall {
    pub fn likelihoods(&self) -> Likelihoods {
        Likelihoods::new(self.event_lh, self.ref_lh)
    }

    /// Encode this call into VCF text.
    pub fn encode<S: SequenceProvider + ?Sized>(&self, reference: &S) -> Result<String> {
        encoding::encode(&self.sv, reference, self.filter.as_deref(), &self.likelihoods())
    }
}

/// Encode all calls from `input` and write them to `out`. Returns the number of
/// encoded calls.
pub fn convert<R: BufRead, W: Write, S: SequenceProvider + ?Sized>(
    input: R,
    out: &mut W,
    reference: &S,
    skip_invalid: bool,
) -> Result<usize> {
    let mut written = 0;
    for (i, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let encoded = serde_json::from_str::<SvCall>(&line)
            .with_context(|| format!("invalid SV call in line {}", i + 1))
            .and_then(|call| {
                call.encode(reference)
                    .with_context(|| format!("unable to encode event {}", call.sv.event_id()))
            });
        match encoded {
            Ok(text) => {
                out.write_all(text.as_bytes())?;
                written += 1;
            }
            Err(e) if skip_invalid => warn!("skipping line {}: {:#}", i + 1, e),
            Err(e) => return Err(e),
        }
    }
    Ok(written)
}

fn header(buffer: &reference::Buffer, sample_name: &str) -> Result<String> {
    Header::builder()
        .source_version(env!("CARGO_PKG_VERSION"))
        .reference_path(buffer.reference_path())
        .sample_name(sample_name)
        .build()
        .render(buffer)
}

fn open_reference(path: &Path) -> Result<reference::Buffer> {
    reference::Buffer::from_path(path, REFERENCE_BUFFER_CAPACITY)
        .with_context(|| format!("unable to open reference {}", path.display()))
}

pub fn run(opt: Sv2Vcf) -> Result<()> {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    match opt {
        Sv2Vcf::Convert {
            ref reference,
            ref input,
            ref sample_name,
            skip_invalid,
            ..
        } => {
            let buffer = open_reference(reference)?;
            out.write_all(header(&buffer, sample_name)?.as_bytes())?;

            let written = if let Some(path) = input {
                let reader = BufReader::new(
                    File::open(path).with_context(|| format!("unable to open {}", path.display()))?,
                );
                convert(reader, &mut out, &buffer, skip_invalid)?
            } else {
                let stdin = io::stdin();
                convert(stdin.lock(), &mut out, &buffer, skip_invalid)?
            };
            info!("{} SV calls written.", written);
        }
        Sv2Vcf::Header {
            ref reference,
            ref sample_name,
            ..
        } => {
            let buffer = open_reference(reference)?;
            out.write_all(header(&buffer, sample_name)?.as_bytes())?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::tests::reference;
    use crate::errors::{Error, ErrorKind};

    const DEL: &str = r#"{"type": "DEL", "ref_chrom": "chr1", "bp1": [100, 104], "bp2": [200, 202], "genotype": "0/1", "event_id": "del1", "split_support": 3, "pe_support": 5, "event_type": "simple", "filter": "PASS", "event_lh": -10.0, "ref_lh": -15.0}"#;
    const BND: &str = r#"{"type": "BND", "ref_chrom": "chr1", "bp1": [10, 10], "bp2": [50, 50], "bnd_orientation": ["-", "+"], "genotype": "0/1", "event_id": "bnd1", "event_type": "complex", "event_lh": 1.0, "ref_lh": 0.0}"#;
    const CNV: &str = r#"{"type": "CNV", "ref_chrom": "chr1", "bp1": [10, 10], "bp2": [50, 50], "genotype": "0/1", "event_id": "cnv1", "event_type": "simple", "event_lh": 1.0, "ref_lh": 0.0}"#;

    #[test]
    fn test_convert() {
        let input = format!("{}\n\n{}\n", DEL, BND);
        let mut out = Vec::new();
        let written = convert(input.as_bytes(), &mut out, &reference(), false).unwrap();
        assert_eq!(written, 2);
        let text = String::from_utf8(out).unwrap();
        let ids: Vec<_> = text.lines().map(|line| line.split('\t').nth(2).unwrap()).collect();
        assert_eq!(ids, vec!["del1", "bnd1_1", "bnd1_2"]);
        assert!(text.lines().next().unwrap().contains("\tPASS\t"));
        assert!(text.lines().nth(1).unwrap().contains("\t.\t.\t"));
    }

    #[test]
    fn test_convert_aborts_on_invalid() {
        let input = format!("{}\n{}\n", CNV, DEL);
        let mut out = Vec::new();
        let err = convert(input.as_bytes(), &mut out, &reference(), false).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>().map(Error::kind),
            Some(ErrorKind::UnsupportedType)
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_convert_skip_invalid() {
        let input = format!("{}\nnot json\n{}\n", CNV, DEL);
        let mut out = Vec::new();
        let written = convert(input.as_bytes(), &mut out, &reference(), true).unwrap();
        assert_eq!(written, 1);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_parse_args() {
        let opt = Sv2Vcf::from_iter(&["sv2vcf", "convert", "ref.fa", "--input", "calls.jsonl", "--skip-invalid"]);
        match opt {
            Sv2Vcf::Convert {
                reference,
                input,
                sample_name,
                skip_invalid,
                verbose,
            } => {
                assert_eq!(reference, PathBuf::from("ref.fa"));
                assert_eq!(input, Some(PathBuf::from("calls.jsonl")));
                assert_eq!(sample_name, "sample1");
                assert!(skip_invalid);
                assert!(!verbose);
            }
            _ => panic!("expected convert subcommand"),
        }
    }
}
