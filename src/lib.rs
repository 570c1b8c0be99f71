//! Docgate - PII boundary filter and protocol gate
//!
//! Docgate sits between a trusted document-processing domain and an
//! external translation vendor. Everything crossing the boundary goes
//! through two layers:
//!
//! 1. **Security filter** — pattern-based PII detection, per-category
//!    masking, and post-mask leak verification, selected per document
//!    type by a policy engine.
//! 2. **Protocol gate** — strict envelope validation and bidirectional
//!    transformation between the boundary envelope and the vendor's
//!    parameter/result shapes.
//!
//! ```text
//! caller ──▶ validate ──▶ policy mask ──▶ transform ──▶ [vendor]
//!                                                          │
//! caller ◀── envelope ◀── verify ◀────── transform ◀───────┘
//! ```
//!
//! All core operations are synchronous, side-effect-free computations
//! over immutable inputs; the rule and policy tables are built once at
//! startup and never mutated. The only suspension point is the vendor
//! call behind [`vendor::VendorClient`].

pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod pii;
pub mod policy;
pub mod protocol;
pub mod vendor;

pub use config::GateConfig;
pub use error::{Error, Result, ValidationError};
pub use filter::{FilterMode, FilterReport, FilterStatus, SecurityFilter};
pub use gateway::BoundaryGateway;
pub use pii::{DetectionResult, Detector, Masker, PiiCategory, PiiRule, RuleSet, Verifier};
pub use policy::{DocumentPolicy, PolicyEngine, PolicyTable};
pub use protocol::{BoundaryRequest, BoundaryResponse, ExternalInputs, TranslationResult};
