//! Error definitions.
//!
//! The hardware model has no runtime error taxonomy: every miss completes and
//! every predictor lookup returns a value. Its only failure class is an illegal
//! parameter combination ([`ConfigError`]), rejected when a component is
//! constructed. Each variant names the offending parameter so the message
//! points at the field to fix.
//!
//! The trace harness adds [`TraceError`] for malformed trace input and
//! [`SimError`] for replay failures.

use thiserror::Error;

/// Illegal parameterization detected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `memory.address_bits` is outside the supported range.
    #[error("memory.address_bits = {value} is outside 8..=32")]
    AddressWidth {
        /// Offending value.
        value: u32,
    },

    /// `memory.max_burst` is outside the range a line transfer may use.
    #[error("memory.max_burst = {value} words is outside {min}..={max}")]
    BurstCapability {
        /// Offending value.
        value: usize,
        /// Smallest accepted burst.
        min: usize,
        /// Largest accepted burst.
        max: usize,
    },

    /// The address bits left over for the tag are zero or negative.
    #[error(
        "{cache}: tag width is {width} bits (memory.address_bits = {address_bits}, \
         index_bits = {index_bits}, offset_bits = {offset_bits}); it must be positive"
    )]
    NonPositiveTagWidth {
        /// Cache being configured (`icache` or `dcache`).
        cache: &'static str,
        /// Resulting tag width.
        width: i64,
        /// Configured address width.
        address_bits: u32,
        /// Configured index width.
        index_bits: u32,
        /// Configured block-offset width.
        offset_bits: u32,
    },

    /// The line size is not a burst the memory can carry.
    #[error(
        "{cache}.offset_bits = {offset_bits} gives {line_words}-word lines; \
         bursts carry {min}..={max_burst} words"
    )]
    LineSize {
        /// Cache being configured.
        cache: &'static str,
        /// Configured block-offset width.
        offset_bits: u32,
        /// Resulting line size in words.
        line_words: usize,
        /// Smallest line size.
        min: usize,
        /// Burst capability of the memory.
        max_burst: usize,
    },

    /// A secondary structure capacity is out of range.
    #[error("{cache}.{parameter} = {value} is outside {min}..={max}")]
    SecondaryCapacity {
        /// Cache being configured.
        cache: &'static str,
        /// `victim_entries` or `stream_entries`.
        parameter: &'static str,
        /// Offending value.
        value: usize,
        /// Smallest accepted capacity.
        min: usize,
        /// Largest accepted capacity.
        max: usize,
    },

    /// A predictor table or history width is out of range.
    #[error("predictor.{parameter} = {value} is outside {min}..={max}")]
    PredictorWidth {
        /// Name of the offending field.
        parameter: &'static str,
        /// Offending value.
        value: u32,
        /// Smallest accepted width.
        min: u32,
        /// Largest accepted width.
        max: u32,
    },

    /// The global history does not fit the global index under the chosen scheme.
    #[error(
        "predictor.global_history_bits = {history} does not fit \
         predictor.global_table_bits = {table} under {scheme} indexing"
    )]
    HistoryWiderThanIndex {
        /// Configured history width.
        history: u32,
        /// Configured table index width.
        table: u32,
        /// `gselect` or `gshare`.
        scheme: &'static str,
    },
}

/// Malformed access trace input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    /// The operation letter is not one of `F`, `L`, `S`, `B`.
    #[error("line {line}: unknown operation `{op}`")]
    UnknownOp {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        op: String,
    },

    /// An operand is missing.
    #[error("line {line}: missing {field}")]
    MissingField {
        /// 1-based line number.
        line: usize,
        /// Name of the missing operand.
        field: &'static str,
    },

    /// An operand is not a number (or not a direction for `taken`).
    #[error("line {line}: cannot parse {field} from `{text}`")]
    BadOperand {
        /// 1-based line number.
        line: usize,
        /// Name of the operand.
        field: &'static str,
        /// Offending token.
        text: String,
    },

    /// Extra tokens follow the operands.
    #[error("line {line}: unexpected `{text}` after operands")]
    TrailingInput {
        /// 1-based line number.
        line: usize,
        /// First extra token.
        text: String,
    },
}

/// Failure while driving the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// An access did not complete within the cycle limit.
    #[error("{cache}: access to {addr:#010x} did not complete within {cycles} cycles")]
    AccessTimeout {
        /// Cache the access went to.
        cache: &'static str,
        /// Byte address of the access.
        addr: u32,
        /// Cycles spent before giving up.
        cycles: u64,
    },

    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The trace could not be parsed.
    #[error(transparent)]
    Trace(#[from] TraceError),
}
