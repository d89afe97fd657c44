//! Cross-module tests for the answer pipeline.

mod pipeline_flow;
