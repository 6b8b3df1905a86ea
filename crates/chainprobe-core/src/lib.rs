//! chainprobe-core — the job engine behind the ChainProbe exporter.
//!
//! # Overview
//!
//! ChainProbe polls a node's JSON-RPC surface for on-chain state (native
//! balances, token balances, vault conversions, price feeds, pool reserves)
//! and republishes each reading as a labeled Prometheus gauge. This crate
//! defines:
//!
//! - [`codec`] — the fixed ABI call encodings and hex result decoders
//! - [`LabelSchema`] — the stable label layout shared by a job's instruments
//! - [`ContractProbe`] — one kind of on-chain value, expressed as a call plan
//! - [`probes`] — the eight built-in probe variants
//! - [`Job`] / [`Scheduler`] — the per-job poll loop
//! - [`ExecutionClient`] — the two RPC primitives the engine needs
//! - [`config`] — the YAML configuration model

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod exporter;
pub mod job;
pub mod labels;
pub mod metrics;
pub mod probe;
pub mod probes;
pub mod scheduler;
pub mod targets;

pub use client::{CallRequest, ExecutionClient, BLOCK_LATEST};
pub use codec::U256;
pub use error::{ConfigError, DecodeError, ProbeError, SetupError, TransportError};
pub use exporter::build_jobs;
pub use job::{Job, JobSettings, Runnable};
pub use labels::{LabelSchema, LabelSource};
pub use metrics::{Instruments, MetricDescriptor};
pub use probe::{Call, CallArg, CallPlan, ContractProbe, Reading};
pub use scheduler::{JobState, Scheduler};
pub use targets::{AccountTarget, ContractTarget, PairTarget, TokenTarget};
