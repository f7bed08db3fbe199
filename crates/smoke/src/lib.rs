//! End-to-end element-capture smoke harness.
//!
//! Drives one fixed scenario against a BiDi endpoint: open a tab, navigate,
//! resolve an element by evaluating script in the page, capture an
//! element-scoped screenshot, and check its PNG signature. Diagnostics are
//! collected on every path and the session is torn down no matter how the
//! run ends.
//!
//! The scenario is generic over the [`session`] seam so the whole flow runs
//! against the scripted doubles in [`testing`] as well as the live
//! `bidi-runtime` types.

pub mod capture;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod locator;
pub mod logging;
pub mod scenario;
pub mod session;
pub mod testing;
