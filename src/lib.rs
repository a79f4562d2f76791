//! Gatehouse - Request Admission Control Service
//!
//! This crate implements the rate-limiting service used by the MCMeet
//! scheduling platform. It tracks per-key request counts within fixed
//! time windows and decides admit/reject for each incoming request,
//! independently for the chat, booking, and auth policies. Decisions
//! are served over a small HTTP API that the platform front end calls
//! per request.

pub mod config;
pub mod error;
pub mod http;
pub mod ratelimit;
