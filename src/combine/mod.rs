pub mod allele_lut;
pub mod alleles;
pub mod destination;
pub mod genotyper;
pub mod processor;
pub mod reference;
pub mod remap;
