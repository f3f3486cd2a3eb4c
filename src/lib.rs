//! Order book and trade ledger reconstruction from NASDAQ ITCH 5.0 captures.
//!
//! One linear pass over a recorded capture rebuilds per-security resting
//! orders and realized trades; a post-pass derives a cumulative VWAP series
//! sampled at hour buckets. Offline batch use only.

pub mod book;
pub mod directory;
pub mod engine;
pub mod error;
pub mod export;
pub mod itch;
pub mod ledger;
pub mod pipeline;
pub mod vwap;

pub use engine::{ApplyStatus, ReconEngine, ReconStats, SideFilter};
pub use error::{Error, Result};
pub use itch::{Body, Decoder, Message, MessageKind, Side};
pub use pipeline::{run, PipelineConfig, RunSummary};
