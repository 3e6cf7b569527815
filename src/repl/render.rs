//! Printing search outcomes.

use std::io::{self, Write};

use serde::Serialize;

use crate::api::PageInfo;
use crate::search::{SearchOutcome, SearchOutput};

/// Write a search outcome for the operator.
pub fn write_outcome<W: Write>(out: &mut W, outcome: &SearchOutcome) -> io::Result<()> {
    match outcome {
        SearchOutcome::Completed(SearchOutput::Count(total)) => writeln!(out, "{}", total),
        SearchOutcome::Completed(SearchOutput::Raw { page, envelope }) => {
            write_page(out, page)?;
            write_json(out, envelope)
        }
        SearchOutcome::Completed(SearchOutput::Records { page, records }) => {
            write_page(out, page)?;
            write_json(out, records)
        }
        SearchOutcome::Rejected(messages) => {
            for message in messages {
                writeln!(out, "{}", message)?;
            }
            Ok(())
        }
        SearchOutcome::Unexpected {
            status,
            content_type,
            body,
        } => {
            writeln!(
                out,
                "Unexpected response: HTTP {} ({})",
                status,
                content_type.as_deref().unwrap_or("no content type")
            )?;
            writeln!(out, "{}", body)
        }
    }
}

fn write_page<W: Write>(out: &mut W, page: &PageInfo) -> io::Result<()> {
    writeln!(
        out,
        "startAt: {}, maxResults: {}, total: {}",
        page.start_at, page.max_results, page.total
    )
}

/// Write `value` as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(out, "{}", text)
}
