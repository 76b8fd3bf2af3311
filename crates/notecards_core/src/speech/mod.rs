//! Speech-to-text capability seam.
//!
//! The recognizer itself is supplied by the host environment. Core only
//! defines the contract, the transcript event shape, and two providers:
//! one that reports the capability as missing and one that replays a
//! prepared transcript.

pub mod capability;
pub mod scripted;
