//! Client-side feature flag evaluation for Lightswitch.
//!
//! # Overview
//!
//! Flags are pushed by the Lightswitch management service: first as a full bootstrap snapshot,
//! then as a stream of [`FlagEvent`]s. Both are applied to a [`FlagStore`], which can be read
//! concurrently by any number of evaluating threads while updates are being applied.
//!
//! Evaluating a [`Flag`] for a [`UserContext`] never leaves the process. The result is computed
//! from the flag's keyword rules (first fully matching rule wins), or else from a deterministic
//! percentage rollout over the flag's variations, and is returned as the type the flag declares.
//!
//! The [`Client`] bundles a store with typed getters and an optional [`EvaluationLogger`].
//!
//! # Error Handling
//!
//! Errors are represented by the [`Error`] enum. Asking for a value with a type other than the
//! flag's declared type fails with [`Error::TypeMismatch`]; a stored value that can not be parsed
//! as the declared type fails with [`Error::CoercionFailure`]. Both usually point at an integration
//! bug and deserve a developer's attention. An unknown flag is not an error: lookups return `None`.
//!
//! # Logging
//!
//! The package uses the [`log`](https://docs.rs/log/latest/log/) crate for logging messages under
//! the `lightswitch` target. Consider integrating a `log`-compatible logger implementation for
//! better visibility into store updates and evaluations.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

mod client;
mod config;
mod error;
mod eval;
mod evaluation_logger;
mod event;
mod flag;
mod flag_store;
mod rules;
mod sharder;
mod user;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use eval::{EvaluationDetails, EvaluationReason, FromFlagValue};
pub use evaluation_logger::{EvaluationEvent, EvaluationLogger};
pub use event::{FlagActivation, FlagEvent, FlagTitle, Snapshot};
pub use flag::{Flag, FlagType, FlagValue, Keyword, Property, Variation};
pub use flag_store::FlagStore;
pub use rules::matches;
pub use sharder::{bucket, bucket_of, Md5Sharder, Sharder, TOTAL_BUCKETS};
pub use user::{UserContext, UserContextBuilder};
