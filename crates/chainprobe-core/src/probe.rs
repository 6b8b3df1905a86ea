//! The `ContractProbe` trait — one kind of on-chain value, expressed as data.
//!
//! A probe describes *what* to ask the node for a target (its [`CallPlan`])
//! and *how* to turn the raw answers into a [`Reading`]. Running the plan,
//! labelling and recording are handled once, by [`Job`](crate::Job).

use tokio_util::sync::CancellationToken;

use crate::client::{CallRequest, ExecutionClient, BLOCK_LATEST};
use crate::codec::{self, Token, U256};
use crate::error::ProbeError;
use crate::labels::LabelSource;
use crate::metrics::MetricDescriptor;

/// One argument of a contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Address(String),
    Uint(U256),
    /// The raw result of an earlier step in the same plan, re-padded to one word.
    Result(usize),
}

/// One RPC call of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `eth_getBalance(address, "latest")`.
    Balance { address: String },
    /// `eth_call` of `selector(args...)` against `to`.
    Contract {
        method: &'static str,
        to: String,
        selector: &'static str,
        args: Vec<CallArg>,
    },
}

impl Call {
    pub fn contract(
        method: &'static str,
        to: impl Into<String>,
        selector: &'static str,
        args: Vec<CallArg>,
    ) -> Self {
        Self::Contract {
            method,
            to: to.into(),
            selector,
            args,
        }
    }

    /// Name used in logs and errors.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Balance { .. } => "eth_getBalance",
            Self::Contract { method, .. } => method,
        }
    }
}

/// The ordered calls issued for one target on one tick.
pub type CallPlan = Vec<Call>;

/// The outcome of a successful plan: the gauge value plus any label values
/// only known after the calls ran (e.g. the token `symbol`).
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub value: f64,
    pub labels: Vec<(&'static str, String)>,
}

impl Reading {
    pub fn value(value: f64) -> Self {
        Self {
            value,
            labels: Vec::new(),
        }
    }

    pub fn with_label(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.labels.push((name, value.into()));
        self
    }
}

/// A supported kind of on-chain value to monitor.
pub trait ContractProbe: Send + Sync + 'static {
    /// The configured target shape this probe reads.
    type Target: LabelSource + Send + Sync + 'static;

    /// Constant identifier, used for metric namespacing and logging.
    fn name(&self) -> &'static str;

    /// Base labels, in their fixed index order.
    fn base_labels(&self) -> &'static [&'static str];

    /// The gauge this probe writes and the help text of both instruments.
    fn metric(&self) -> MetricDescriptor;

    /// Calls to issue for `target`, in order.
    fn plan(&self, target: &Self::Target) -> CallPlan;

    /// Turn the raw results (one per call, in plan order) into a reading.
    fn interpret(&self, target: &Self::Target, results: &[String])
        -> Result<Reading, ProbeError>;
}

/// Run `plan` sequentially, stopping at the first failure.
///
/// Every call races against `cancel`, so shutdown does not wait for a
/// hanging node.
pub async fn execute_plan(
    client: &dyn ExecutionClient,
    plan: &[Call],
    cancel: &CancellationToken,
) -> Result<Vec<String>, ProbeError> {
    let mut results: Vec<String> = Vec::with_capacity(plan.len());

    for (step, call) in plan.iter().enumerate() {
        let method = call.method();
        let request;
        let pending = match call {
            Call::Balance { address } => client.eth_get_balance(address, BLOCK_LATEST),
            Call::Contract {
                to, selector, args, ..
            } => {
                request = CallRequest::new(to.clone(), encode_args(step, selector, args, &results)?);
                client.eth_call(&request, BLOCK_LATEST)
            }
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ProbeError::Cancelled),
            result = pending => result.map_err(|source| ProbeError::Transport {
                call: method,
                source,
            })?,
        };
        tracing::trace!(call = method, step, result = %result, "call returned");
        results.push(result);
    }

    Ok(results)
}

fn encode_args(
    step: usize,
    selector: &str,
    args: &[CallArg],
    results: &[String],
) -> Result<String, ProbeError> {
    let mut tokens = Vec::with_capacity(args.len());
    for arg in args {
        let token = match arg {
            CallArg::Address(address) => Token::Address(address),
            CallArg::Uint(value) => Token::Uint(*value),
            CallArg::Result(reference) => {
                let word = results
                    .get(*reference)
                    .ok_or(ProbeError::UnresolvedArgument {
                        step,
                        reference: *reference,
                    })?;
                Token::Word(word)
            }
        };
        tokens.push(token);
    }
    Ok(codec::encode_call(selector, &tokens))
}
