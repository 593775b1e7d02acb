//! Runtime — process bootstrap and the harvest loop behind the binary.

pub mod boot;
pub mod run;
