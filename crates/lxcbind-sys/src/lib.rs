//! # lxcbind-sys
//!
//! Low-level access to liblxc for the lxcbind runtime.
//!
//! This crate provides:
//! - **ABI**: the `#[repr(C)]` prefix of `struct lxc_container` whose
//!   function-pointer table every container operation goes through.
//! - **Loader**: [`Liblxc`](library::Liblxc), which opens the shared
//!   library at runtime with `dlopen(3)` and resolves its exported
//!   entry points, so nothing links against liblxc at build time.
//!
//! Everything here is `unsafe` to use directly; the runtime crate wraps it
//! in an owning handle.

#![allow(unsafe_code, non_camel_case_types)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod container;
pub mod library;
pub mod strings;
