//! Ingestion of exported streaming-history files
//!
//! Discovery turns CLI paths into files, the parser validates records into
//! `ListeningEvent`s and the upload session joins a batch of files into one
//! event list.

mod discover;
mod parser;
mod session;

pub(crate) use discover::discover_files;
pub(crate) use session::{Snapshot, UploadSession, load_batch};
