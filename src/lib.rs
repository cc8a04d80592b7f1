// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Encoding of structural variant calls as VCF.
//!
//! Deletions, insertions, duplications and inversions become a single record
//! with a symbolic ALT allele, breakend events become two mate records in
//! bracket notation. Reference bases and contig lengths are obtained through
//! the [`reference::SequenceProvider`] and [`reference::ContigIndex`] traits.

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate derive_new;
#[macro_use]
extern crate getset;
#[macro_use]
extern crate derive_builder;
#[macro_use]
extern crate lazy_static;

pub mod cli;
pub mod encoding;
pub mod errors;
pub mod header;
pub mod reference;
pub mod variants;

pub use crate::encoding::{encode, Likelihoods};
pub use crate::errors::{Error, ErrorKind};
pub use crate::header::Header;
pub use crate::variants::{Breakpoint, Orientation, StructuralVariant, StructuralVariantBuilder};
