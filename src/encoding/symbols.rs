//! Collision-free symbol allocation for thread ids and location keys.
//!
//! Every thread id and location key is mapped to a single Unicode scalar
//! value drawn from a shared numbering space: thread symbols occupy the
//! dense indices `[0, reserve)` and location symbols continue from
//! `reserve` upward, so the two kinds of symbol can never collide. The
//! index-to-character mapping is bijective; exhausting the codespace is
//! reported as [`EncodingError::CapacityExceeded`], never wrapped.

use std::collections::HashMap;

use crate::error::EncodingError;
use crate::trace::RawTrace;

/// First code point used for symbols. Starting past the ASCII control
/// block keeps small batches printable for debugging.
const SYMBOL_BASE: u32 = 0x21;

/// First code point of the UTF-16 surrogate block, which is not a valid
/// `char` and must be skipped.
const SURROGATE_START: u32 = 0xD800;

/// Width of the surrogate block.
const SURROGATE_LEN: u32 = 0x800;

/// Total number of distinct symbols the codespace can hold.
pub const SYMBOL_CAPACITY: u64 = (0x10FFFF - SURROGATE_LEN - SYMBOL_BASE + 1) as u64;

/// Maps a dense symbol index onto a Unicode scalar value.
///
/// The mapping is strictly monotonic (and therefore injective): index 0
/// maps to `SYMBOL_BASE` and indices that would land in the surrogate
/// block are shifted past it.
pub fn symbol_for(index: u64) -> Result<char, EncodingError> {
    if index >= SYMBOL_CAPACITY {
        return Err(EncodingError::CapacityExceeded {
            index,
            capacity: SYMBOL_CAPACITY,
        });
    }

    let mut code = u64::from(SYMBOL_BASE) + index;
    if code >= u64::from(SURROGATE_START) {
        code += u64::from(SURROGATE_LEN);
    }

    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .ok_or(EncodingError::CapacityExceeded {
            index,
            capacity: SYMBOL_CAPACITY,
        })
}

/// Key identifying one location symbol.
///
/// Either the raw location id, or the location id plus the per-thread
/// visit count within the trace when unique trace locations are enabled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey {
    pub location_id: String,
    /// 1-based visit count of this location by the observing thread
    /// within one trace, or `None` when repeated visits are not
    /// distinguished.
    pub occurrence: Option<u32>,
}

impl LocationKey {
    /// Key for a plain location id.
    pub fn plain(location_id: impl Into<String>) -> Self {
        Self {
            location_id: location_id.into(),
            occurrence: None,
        }
    }

    /// Key for the `occurrence`-th visit to a location.
    pub fn visit(location_id: impl Into<String>, occurrence: u32) -> Self {
        Self {
            location_id: location_id.into(),
            occurrence: Some(occurrence),
        }
    }
}

/// Batch-scoped symbol table.
///
/// Owned by the caller orchestrating one analysis batch and threaded
/// explicitly through encoding (no process-wide state). Thread symbols
/// are re-derived per trace via [`SymbolTable::thread_symbols`]; location
/// symbols are allocated on first appearance across the whole batch and
/// persist for the life of the table, monotonically and never reused.
#[derive(Debug)]
pub struct SymbolTable {
    /// Number of symbol indices reserved for thread symbols. Location
    /// numbering starts here.
    thread_reserve: usize,
    locations: HashMap<LocationKey, char>,
}

impl SymbolTable {
    /// Creates a table reserving symbol indices `[0, thread_reserve)` for
    /// thread symbols.
    ///
    /// `thread_reserve` must be at least the distinct thread count of the
    /// widest trace in the batch; [`crate::encoding::encode_batch`]
    /// computes it from the batch itself.
    pub fn new(thread_reserve: usize) -> Self {
        Self {
            thread_reserve,
            locations: HashMap::new(),
        }
    }

    /// Number of symbol indices reserved for threads.
    pub fn thread_reserve(&self) -> usize {
        self.thread_reserve
    }

    /// Number of distinct location keys seen so far.
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Returns the symbol for a location key, allocating the next unused
    /// symbol if the key is new.
    pub fn location_symbol(&mut self, key: LocationKey) -> Result<char, EncodingError> {
        if let Some(&symbol) = self.locations.get(&key) {
            return Ok(symbol);
        }

        let index = (self.thread_reserve + self.locations.len()) as u64;
        let symbol = symbol_for(index)?;
        self.locations.insert(key, symbol);
        Ok(symbol)
    }

    /// Derives the per-trace thread-symbol mapping.
    ///
    /// Symbols are assigned from index 0 in first-appearance order, or in
    /// sorted numeric id order when `unordered` is set. Fails with
    /// [`EncodingError::ThreadReserveExceeded`] if the trace has more
    /// threads than the reserve, since those symbols would spill into the
    /// location numbering space.
    pub fn thread_symbols(
        &self,
        trace: &RawTrace,
        unordered: bool,
    ) -> Result<HashMap<i64, char>, EncodingError> {
        let mut ids = trace.thread_ids_in_order();
        if unordered {
            ids.sort_unstable();
        }

        if ids.len() > self.thread_reserve {
            return Err(EncodingError::ThreadReserveExceeded {
                threads: ids.len(),
                reserved: self.thread_reserve,
            });
        }

        ids.into_iter()
            .enumerate()
            .map(|(index, id)| symbol_for(index as u64).map(|symbol| (id, symbol)))
            .collect()
    }
}
