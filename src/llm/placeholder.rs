//! Stand-ins used when no generation provider is configured.

use async_trait::async_trait;
use tracing::warn;

use super::{CodeGenerator, TextGenerator};
use crate::error::{Error, Result};

/// Fixed document returned when no model is available.
pub const PLACEHOLDER_DOCUMENT: &str = "\
# Project Overview

## 1. Introduction
This document was produced without a configured generation provider.
It marks where generated documentation for the task will appear.

## 2. Architecture
(Component descriptions will be generated once a provider is configured.)
";

/// Text generator that always returns [`PLACEHOLDER_DOCUMENT`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderWriter;

#[async_trait]
impl TextGenerator for PlaceholderWriter {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        warn!("no text generation provider configured, using placeholder document");
        Ok(PLACEHOLDER_DOCUMENT.to_string())
    }
}

/// Code generator for deployments without a provider. Every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredCoder;

#[async_trait]
impl CodeGenerator for UnconfiguredCoder {
    async fn generate(&self, _description: &str, _target_path: &str) -> Result<String> {
        Err(Error::GenerationFailed(
            "no code generation provider configured".to_string(),
        ))
    }
}
