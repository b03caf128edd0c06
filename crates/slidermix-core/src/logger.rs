// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Custom tracing formatter for slidermix logs.
//!
//! # Format
//!
//! ```text
//! SLIDERMIX | LEVEL | [span_name{span_fields}:] message {event_fields}
//! ```
//!
//! # Examples
//!
//! ```text
//! SLIDERMIX | INFO | Run loop starting
//! SLIDERMIX | WARN | Interrupted
//! SLIDERMIX | DEBUG | Stop signal observed, terminating reason=Some(Interrupt)
//! ```

use std::fmt;
use tracing_core::{Event, Subscriber};
use tracing_subscriber::fmt::{
    format::{self, FormatEvent, FormatFields},
    FmtContext, FormattedFields,
};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

use crate::error::SettingsError;

/// Log formatter that prefixes every line with `SLIDERMIX`.
#[derive(Debug, Clone, Copy)]
pub struct Formatter;

impl<S, N> FormatEvent<S, N> for Formatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        write!(&mut writer, "SLIDERMIX | {} | ", metadata.level())?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}", span.name())?;

                let ext = span.extensions();
                if let Some(fields) = ext.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{{{fields}}}")?;
                    }
                }
                write!(writer, ": ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Builds the filter for the given level.
pub fn env_filter(log_level: &str) -> Result<EnvFilter, SettingsError> {
    EnvFilter::try_new(log_level)
        .map_err(|e| SettingsError::Invalid(format!("could not parse log level: {e}")))
}
