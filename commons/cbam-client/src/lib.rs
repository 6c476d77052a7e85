//! Client for the Nokia CBAM orchestrator REST API.
//!
//! [`CbamClient`] bundles an authenticated [`Connection`] with the catalog
//! version chosen for the session and exposes the VNF lifecycle, package
//! catalog and polling operations.

pub mod catalog;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod json_input;
pub mod lifecycle;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod models;
pub mod poll;
pub mod token;
pub mod transport;

pub use catalog::{CatalogVersion, VnfPackage};
pub use client::CbamClient;
pub use config::{CbamEnv, Credentials, TransportOptions};
pub use connection::Connection;
pub use error::{CbamError, Result};
pub use json_input::{JsonInput, normalize_json_input};
pub use models::{
    CreateVnfRequest, InstantiationState, TerminateVnfRequest, VnfInstance,
};
pub use poll::{DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT, PollSettings};
pub use token::{TokenPair, TokenStore};
pub use transport::{
    HttpRequest, HttpResponse, HttpTransport, RequestBody, ReqwestTransport,
};

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockTransport;
