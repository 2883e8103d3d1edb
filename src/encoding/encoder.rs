//! Signature encoding: one raw trace in, one interleaving signature out.

use std::collections::HashMap;

use tracing::debug;

use crate::error::EncodingError;
use crate::trace::RawTrace;

use super::symbols::{LocationKey, SymbolTable};
use super::EncodingConfig;

/// Encodes one trace into an interleaving signature.
///
/// Each event becomes one token appended in original order: the thread
/// symbol followed by the location symbol, or the location symbol alone
/// when thread ids are disabled. Signature length in chars is therefore
/// exactly `2 * trace.len()` or `trace.len()`.
///
/// The shared location-symbol table grows monotonically as new location
/// keys are discovered; the trace itself is not modified.
pub fn encode(
    trace: &RawTrace,
    table: &mut SymbolTable,
    config: &EncodingConfig,
) -> Result<String, EncodingError> {
    let thread_symbols = table.thread_symbols(trace, config.unordered_thread_mapping)?;

    // Per-thread visit counters, reset for every trace.
    let mut visits: HashMap<(i64, &str), u32> = HashMap::new();

    let width = if config.disable_thread_ids { 1 } else { 2 };
    let mut signature = String::with_capacity(trace.len() * width * 2);

    for event in &trace.events {
        let key = if config.unique_trace_locations {
            let count = visits
                .entry((event.thread_id, event.location_id.as_str()))
                .or_insert(0);
            *count += 1;
            LocationKey::visit(event.location_id.clone(), *count)
        } else {
            LocationKey::plain(event.location_id.clone())
        };

        let location_symbol = table.location_symbol(key)?;

        if !config.disable_thread_ids {
            // Present by construction: the mapping covers every thread id
            // in the trace.
            signature.push(thread_symbols[&event.thread_id]);
        }
        signature.push(location_symbol);
    }

    Ok(signature)
}

/// Encodes a whole batch of traces in run order.
///
/// Two passes: the first computes the batch-wide maximum distinct thread
/// count, which becomes the thread-symbol reserve of a fresh
/// [`SymbolTable`]; the second encodes every trace against that table.
/// Reserving the maximum up front guarantees that location symbols start
/// after every thread symbol any trace in the batch will use.
///
/// Encoding is deterministic: the same traces with the same configuration
/// produce byte-identical signatures.
///
/// # Returns
///
/// The signatures (one per trace, in input order) and the populated
/// symbol table.
pub fn encode_batch(
    traces: &[RawTrace],
    config: &EncodingConfig,
) -> Result<(Vec<String>, SymbolTable), EncodingError> {
    let thread_reserve = traces
        .iter()
        .map(RawTrace::distinct_thread_count)
        .max()
        .unwrap_or(0);

    let mut table = SymbolTable::new(thread_reserve);
    let mut signatures = Vec::with_capacity(traces.len());
    for trace in traces {
        signatures.push(encode(trace, &mut table, config)?);
    }

    debug!(
        traces = traces.len(),
        thread_reserve,
        locations = table.location_count(),
        "encoded trace batch"
    );

    Ok((signatures, table))
}
