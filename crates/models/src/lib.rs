pub mod filter;
pub mod input;
pub mod keterangan;
pub mod pagination;
pub mod tahap;
