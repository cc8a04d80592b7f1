// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::{Mutex, RwLock};

use anyhow::{anyhow, Result};
use bio::io::fasta;
use lru_time_cache::LruCache;

use crate::errors::{self, Error};

/// A reference contig as listed in the FASTA index.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Contig {
    pub name: String,
    pub len: u64,
}

/// Access to reference sequence by 0-based, half-open coordinates.
pub trait SequenceProvider {
    fn fetch_seq(&self, contig: &str, start: u64, end: u64) -> Result<Vec<u8>>;
}

/// Ordered listing of the reference contigs.
pub trait ContigIndex {
    fn contigs(&self) -> Result<Vec<Contig>>;
}

impl<T: SequenceProvider + ?Sized> SequenceProvider for &T {
    fn fetch_seq(&self, contig: &str, start: u64, end: u64) -> Result<Vec<u8>> {
        (**self).fetch_seq(contig, start, end)
    }
}

impl<T: ContigIndex + ?Sized> ContigIndex for &T {
    fn contigs(&self) -> Result<Vec<Contig>> {
        (**self).contigs()
    }
}

/// Fetch the single base at the given 1-based position.
pub fn ref_base<S: SequenceProvider + ?Sized>(
    provider: &S,
    contig: &str,
    pos: i64,
) -> Result<String> {
    if pos < 1 {
        return Err(errors::reference_lookup(contig, pos - 1, pos, "position before contig start").into());
    }
    let seq = provider.fetch_seq(contig, (pos - 1) as u64, pos as u64)?;
    if seq.len() != 1 {
        return Err(errors::reference_lookup(
            contig,
            pos - 1,
            pos,
            &format!("expected a single base, got {} bases", seq.len()),
        )
        .into());
    }
    Ok(String::from_utf8_lossy(&seq).to_ascii_uppercase())
}

/// A lazy buffer for reference sequences.
pub struct Buffer {
    reader: RwLock<fasta::IndexedReader<fs::File>>,
    sequences: Mutex<LruCache<String, Arc<Vec<u8>>>>,
    reference_path: PathBuf,
}

impl Buffer {
    /// Open an indexed FASTA file. The index (`.fai`) has to exist next to it.
    pub fn from_path<P: AsRef<Path> + std::fmt::Debug>(path: P, capacity: usize) -> Result<Self> {
        let fasta = fasta::IndexedReader::from_file(&path).map_err(|e| {
            Error::ContigIndexUnreadable {
                path: path.as_ref().display().to_string(),
                msg: e.to_string(),
            }
        })?;
        Ok(Buffer {
            reader: RwLock::new(fasta),
            sequences: Mutex::new(LruCache::with_capacity(capacity)),
            reference_path: path.as_ref().to_path_buf(),
        })
    }

    pub fn reference_path(&self) -> &Path {
        &self.reference_path
    }

    /// Load given chromosome and return it. This is O(1) if chromosome was loaded before.
    pub fn seq(&self, chrom: &str) -> Result<Arc<Vec<u8>>> {
        let mut sequences = self
            .sequences
            .lock()
            .map_err(|_| anyhow!("reference cache lock poisoned"))?;

        if let Some(sequence) = sequences.get(chrom) {
            return Ok(Arc::clone(sequence));
        }

        let mut sequence = Vec::new();
        {
            let mut reader = self
                .reader
                .write()
                .map_err(|_| anyhow!("reference reader lock poisoned"))?;
            reader.fetch_all(chrom).map_err(|_| Error::UnknownContig {
                contig: chrom.to_owned(),
            })?;
            reader.read(&mut sequence)?;
        }
        debug!("loaded contig {} ({} bases)", chrom, sequence.len());

        let sequence = Arc::new(sequence);
        sequences.insert(chrom.to_owned(), Arc::clone(&sequence));
        Ok(sequence)
    }
}

impl SequenceProvider for Buffer {
    fn fetch_seq(&self, contig: &str, start: u64, end: u64) -> Result<Vec<u8>> {
        let seq = self.seq(contig)?;
        if start > end || end > seq.len() as u64 {
            return Err(errors::reference_lookup(
                contig,
                start as i64,
                end as i64,
                &format!("outside of contig of length {}", seq.len()),
            )
            .into());
        }
        Ok(seq[start as usize..end as usize].to_vec())
    }
}

impl ContigIndex for Buffer {
    fn contigs(&self) -> Result<Vec<Contig>> {
        let reader = self
            .reader
            .read()
            .map_err(|_| anyhow!("reference reader lock poisoned"))?;
        Ok(reader
            .index
            .sequences()
            .into_iter()
            .map(|seq| Contig::new(seq.name, seq.len))
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::io::Write;

    /// In-memory reference for unit tests.
    #[derive(Default)]
    pub(crate) struct StaticReference {
        pub(crate) contigs: Vec<(String, Vec<u8>)>,
    }

    impl StaticReference {
        pub(crate) fn with_contig(mut self, name: &str, seq: &[u8]) -> Self {
            self.contigs.push((name.to_owned(), seq.to_vec()));
            self
        }
    }

    impl SequenceProvider for StaticReference {
        fn fetch_seq(&self, contig: &str, start: u64, end: u64) -> Result<Vec<u8>> {
            let seqs: HashMap<_, _> = self.contigs.iter().map(|(n, s)| (n.as_str(), s)).collect();
            let seq = seqs.get(contig).ok_or_else(|| Error::UnknownContig {
                contig: contig.to_owned(),
            })?;
            if end as usize > seq.len() {
                return Err(errors::reference_lookup(contig, start as i64, end as i64, "out of range").into());
            }
            Ok(seq[start as usize..end as usize].to_vec())
        }
    }

    impl ContigIndex for StaticReference {
        fn contigs(&self) -> Result<Vec<Contig>> {
            Ok(self
                .contigs
                .iter()
                .map(|(name, seq)| Contig::new(name.clone(), seq.len() as u64))
                .collect())
        }
    }

    pub(crate) fn write_fasta(dir: &Path, contigs: &[(&str, &[u8])]) -> PathBuf {
        let path = dir.join("ref.fa");
        let mut fasta = fs::File::create(&path).unwrap();
        let mut fai = fs::File::create(dir.join("ref.fa.fai")).unwrap();
        let mut offset = 0;
        for (name, seq) in contigs {
            let header = format!(">{}\n", name);
            fasta.write_all(header.as_bytes()).unwrap();
            fasta.write_all(seq).unwrap();
            fasta.write_all(b"\n").unwrap();
            offset += header.len();
            writeln!(fai, "{}\t{}\t{}\t{}\t{}", name, seq.len(), offset, seq.len(), seq.len() + 1).unwrap();
            offset += seq.len() + 1;
        }
        path
    }

    #[test]
    fn test_buffer_fetch() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_fasta(tmp.path(), &[("chr1", b"ACGTACGTAC"), ("chr2", b"GGGCCC")]);
        let buffer = Buffer::from_path(&path, 2).unwrap();
        assert_eq!(buffer.fetch_seq("chr1", 2, 4).unwrap(), b"GT".to_vec());
        assert_eq!(buffer.fetch_seq("chr2", 3, 4).unwrap(), b"C".to_vec());
        assert_eq!(ref_base(&buffer, "chr1", 1).unwrap(), "A");
    }

    #[test]
    fn test_buffer_contigs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_fasta(tmp.path(), &[("chr1", b"ACGTACGTAC"), ("chr2", b"GGGCCC")]);
        let buffer = Buffer::from_path(&path, 2).unwrap();
        assert_eq!(
            buffer.contigs().unwrap(),
            vec![Contig::new("chr1".to_owned(), 10), Contig::new("chr2".to_owned(), 6)]
        );
    }

    #[test]
    fn test_buffer_lookup_failures() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_fasta(tmp.path(), &[("chr1", b"ACGT")]);
        let buffer = Buffer::from_path(&path, 2).unwrap();
        let err = buffer.fetch_seq("chrX", 0, 1).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::UnknownContig {
                contig: "chrX".to_owned()
            })
        );
        assert!(ref_base(&buffer, "chr1", 5).is_err());
        assert!(ref_base(&buffer, "chr1", 0).is_err());
    }

    #[test]
    fn test_missing_index() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing.fa");
        fs::write(&path, b">chr1\nACGT\n").unwrap();
        let err = Buffer::from_path(&path, 2).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::ContigIndexUnreadable { .. })
        ));
    }
}
