use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use sv2vcf::{Breakpoint, StructuralVariant, StructuralVariantBuilder};

/// Write a single-line-per-contig FASTA file together with its .fai index.
pub(crate) fn write_reference(dir: &Path, contigs: &[(&str, Vec<u8>)]) -> PathBuf {
    let path = dir.join("genome.fa");
    let mut fasta = File::create(&path).unwrap();
    let mut fai = File::create(dir.join("genome.fa.fai")).unwrap();
    let mut offset = 0;
    for (name, seq) in contigs {
        let header = format!(">{}\n", name);
        fasta.write_all(header.as_bytes()).unwrap();
        fasta.write_all(seq).unwrap();
        fasta.write_all(b"\n").unwrap();
        offset += header.len();
        writeln!(
            fai,
            "{}\t{}\t{}\t{}\t{}",
            name,
            seq.len(),
            offset,
            seq.len(),
            seq.len() + 1
        )
        .unwrap();
        offset += seq.len() + 1;
    }
    path
}

pub(crate) fn sv(
    svtype: &str,
    bp1: (i64, i64),
    bp2: (i64, i64),
    configure: impl FnOnce(&mut StructuralVariantBuilder),
) -> StructuralVariant {
    let mut builder = StructuralVariantBuilder::default();
    builder
        .sv_type(svtype)
        .ref_chrom("chr1")
        .bp1(Breakpoint::new(bp1.0, bp1.1))
        .bp2(Breakpoint::new(bp2.0, bp2.1))
        .genotype("0/1")
        .event_id(format!("{}_ev", svtype.to_lowercase().replace(':', "_")))
        .split_support(3)
        .pe_support(5)
        .event_type("simple");
    configure(&mut builder);
    builder.build().unwrap()
}

pub(crate) fn info_field<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.split('\t')
        .nth(7)?
        .split(';')
        .find_map(|entry| {
            let mut kv = entry.splitn(2, '=');
            match (kv.next(), kv.next()) {
                (Some(k), Some(v)) if k == key => Some(v),
                _ => None,
            }
        })
}
