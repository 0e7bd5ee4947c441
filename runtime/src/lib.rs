// Copyright 2026 Slant Contributors
// SPDX-License-Identifier: MIT

//! Slant runtime library — scores article text as factual or opinionated.
//!
//! Text arrives directly or is scraped from a page with headless Chromium,
//! then goes to a hosted zero-shot classifier. This library crate exposes
//! the modules for integration testing.

pub mod analyze;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod errors;
pub mod renderer;
pub mod rest;
pub mod scrape;
pub mod truncate;
pub mod types;
