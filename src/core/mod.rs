//! Core module - listening history types and aggregation

mod aggregator;
mod types;

pub(crate) use aggregator::{AggregateOptions, aggregate};
pub(crate) use types::{
    Behavior, DateFilter, HourlyHours, ListeningEvent, PlatformClass, PlatformCount, Ranked,
    Summary, TopLimits,
};
