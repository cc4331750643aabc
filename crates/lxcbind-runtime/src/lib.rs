//! Container handle over liblxc for the lxcbind workspace.
//!
//! [`ContainerHandle`](container::ContainerHandle) owns one native container
//! object and forwards lifecycle and configuration requests to it. The
//! native side is reached through the [`backend`] traits, implemented by the
//! real liblxc and by an in-process simulation.

#![allow(unsafe_code)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod backend;
pub mod container;
pub mod marshal;

pub use container::ContainerHandle;
