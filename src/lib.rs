//! Library exports for usb-hid-client.
//!
//! Exposes the key translation engine, report encoding, dispatch sinks and
//! device provisioning so that other front-ends (e.g. an on-device GUI) can
//! drive the gadget the same way the command-line binary does.

pub mod config;
pub mod dispatch;
pub mod input;
pub mod provision;
pub mod report;
pub mod shell;

pub use config::Config;
