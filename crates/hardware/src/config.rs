//! Configuration system for the cache and branch prediction model.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the model. It provides:
//! 1. **Defaults:** Baseline geometry (cache depth, line size, secondary capacities,
//!    predictor table sizes).
//! 2. **Structures:** Hierarchical config for the two caches, the memory channels and
//!    the branch predictor.
//! 3. **Validation:** Construction-time checks that reject illegal parameter
//!    combinations with a [`ConfigError`] naming the offending field.
//!
//! Configuration is supplied as JSON (see the `uarch` CLI) or built with `Config::default()`.

use serde::{Deserialize, Serialize};

use crate::common::addr::LineGeometry;
use crate::common::constants::{MAX_LINE_WORDS, MAX_SECONDARY_ENTRIES, MIN_LINE_WORDS, WORD_SHIFT};
use crate::common::error::ConfigError;

/// Default configuration constants for the model.
mod defaults {
    /// Width of a byte address.
    pub const ADDRESS_BITS: u32 = 32;

    /// Longest burst the memory accepts, in words.
    pub const MAX_BURST: usize = 8;

    /// Cycles between an accepted read request and its first data beat.
    pub const READ_LATENCY: u32 = 2;

    /// Cycles between the last write beat and the completion acknowledgment.
    pub const WRITE_LATENCY: u32 = 1;

    /// CAS (Column Access Strobe) latency in cycles.
    pub const T_CAS: u32 = 14;

    /// RAS (Row Access Strobe) latency in cycles.
    pub const T_RAS: u32 = 14;

    /// Precharge latency in cycles.
    pub const T_PRE: u32 = 14;

    /// Primary cache index width (256 slots).
    pub const INDEX_BITS: u32 = 8;

    /// Primary cache block-offset width (4-word lines).
    pub const OFFSET_BITS: u32 = 2;

    /// Instruction-side victim cache capacity.
    pub const ICACHE_VICTIM_ENTRIES: usize = 64;

    /// Data-side victim cache capacity.
    pub const DCACHE_VICTIM_ENTRIES: usize = 32;

    /// Instruction-side stream buffer capacity.
    pub const STREAM_ENTRIES: usize = 8;

    /// Per-address history width; the local counter table has 2^11 = 2048 entries.
    pub const LOCAL_HISTORY_BITS: u32 = 11;

    /// Number of per-address history registers (log2, 256 registers).
    pub const LOCAL_TABLE_BITS: u32 = 8;

    /// Global counter table size (log2, 512 entries).
    pub const GLOBAL_TABLE_BITS: u32 = 9;

    /// Global outcome history width.
    pub const GLOBAL_HISTORY_BITS: u32 = 5;
}

/// Which primary cache a [`CacheConfig`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheKind {
    /// Read-only instruction cache with a stream buffer.
    Instruction,
    /// Read/write data cache with write-back.
    Data,
}

impl CacheKind {
    /// Short name used in log events and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Instruction => "icache",
            Self::Data => "dcache",
        }
    }

    /// Victim cache capacity when the configuration leaves it unset.
    pub const fn default_victim_entries(self) -> usize {
        match self {
            Self::Instruction => defaults::ICACHE_VICTIM_ENTRIES,
            Self::Data => defaults::DCACHE_VICTIM_ENTRIES,
        }
    }

    /// Stream buffer capacity when the configuration leaves it unset.
    pub const fn default_stream_entries(self) -> usize {
        match self {
            Self::Instruction => defaults::STREAM_ENTRIES,
            Self::Data => 0,
        }
    }

    /// Whether this cache carries a stream buffer.
    pub const fn has_stream_buffer(self) -> bool {
        matches!(self, Self::Instruction)
    }
}

impl std::fmt::Display for CacheKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Memory controller implementation types.
///
/// Selects how the burst memory computes the latency of each read burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum MemoryControllerKind {
    /// Every read burst waits `read_latency` cycles.
    #[default]
    Simple,
    /// Row-buffer model using `t_cas`, `t_ras` and `t_pre`.
    #[serde(alias = "DRAM")]
    Dram,
}

/// Top-level branch predictor strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PredictorKind {
    /// Local and global predictors combined by a meta-selector.
    #[default]
    Tournament,
    /// Per-address history predictor alone.
    Local,
    /// Global predictor with concatenated history and address bits.
    #[serde(alias = "GSELECT")]
    GSelect,
    /// Global predictor with XOR-folded history and address bits.
    #[serde(alias = "GSHARE")]
    GShare,
}

/// How the global predictor forms its table index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum GlobalIndex {
    /// `index = (ghr << p) | pc[p+1:2]` with `p = table_bits - history_bits`.
    #[default]
    #[serde(alias = "GSELECT")]
    GSelect,
    /// `index = pc[table_bits+1:2] ^ ghr`.
    #[serde(alias = "GSHARE")]
    GShare,
}

impl GlobalIndex {
    /// Name used in log events and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::GSelect => "gselect",
            Self::GShare => "gshare",
        }
    }
}

/// Root configuration structure containing all model settings.
///
/// # Examples
///
/// ```
/// use uarch_core::config::{Config, GlobalIndex, PredictorKind};
///
/// let json = r#"{
///     "icache": { "index_bits": 6, "offset_bits": 3, "victim_entries": 16 },
///     "dcache": { "index_bits": 6 },
///     "memory": { "read_latency": 4 },
///     "predictor": { "kind": "Tournament", "global_index": "GShare", "global_history_bits": 9 }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// config.validate().unwrap();
/// assert_eq!(config.icache.offset_bits, 3);
/// assert_eq!(config.memory.max_burst, 8);
/// assert_eq!(config.predictor.kind, PredictorKind::Tournament);
/// assert_eq!(config.predictor.global_index, GlobalIndex::GShare);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Instruction cache geometry
    #[serde(default)]
    pub icache: CacheConfig,
    /// Data cache geometry
    #[serde(default)]
    pub dcache: CacheConfig,
    /// Memory channel parameters
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Branch predictor tables
    #[serde(default)]
    pub predictor: PredictorConfig,
}

impl Config {
    /// Runs every construction-time check without building anything.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checking memory, then the
    /// instruction cache, the data cache and finally the predictor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.memory.validate()?;
        let _ = self.icache.validate(CacheKind::Instruction, &self.memory)?;
        let _ = self.dcache.validate(CacheKind::Data, &self.memory)?;
        self.predictor.validate()
    }
}

/// Memory channel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Width of a byte address
    #[serde(default = "MemoryConfig::default_address_bits")]
    pub address_bits: u32,

    /// Longest burst accepted on either channel, in words
    #[serde(default = "MemoryConfig::default_max_burst")]
    pub max_burst: usize,

    /// Cycles from an accepted read request to its first beat
    #[serde(default = "MemoryConfig::default_read_latency")]
    pub read_latency: u32,

    /// Cycles from the last write beat to the completion acknowledgment
    #[serde(default = "MemoryConfig::default_write_latency")]
    pub write_latency: u32,

    /// Read latency model
    #[serde(default)]
    pub controller: MemoryControllerKind,

    /// CAS latency in cycles (DRAM controller only)
    #[serde(default = "MemoryConfig::default_t_cas")]
    pub t_cas: u32,

    /// RAS latency in cycles (DRAM controller only)
    #[serde(default = "MemoryConfig::default_t_ras")]
    pub t_ras: u32,

    /// Precharge latency in cycles (DRAM controller only)
    #[serde(default = "MemoryConfig::default_t_pre")]
    pub t_pre: u32,
}

impl MemoryConfig {
    fn default_address_bits() -> u32 {
        defaults::ADDRESS_BITS
    }

    fn default_max_burst() -> usize {
        defaults::MAX_BURST
    }

    fn default_read_latency() -> u32 {
        defaults::READ_LATENCY
    }

    fn default_write_latency() -> u32 {
        defaults::WRITE_LATENCY
    }

    fn default_t_cas() -> u32 {
        defaults::T_CAS
    }

    fn default_t_ras() -> u32 {
        defaults::T_RAS
    }

    fn default_t_pre() -> u32 {
        defaults::T_PRE
    }

    /// Checks the address width and burst capability.
    ///
    /// # Errors
    ///
    /// [`ConfigError::AddressWidth`] or [`ConfigError::BurstCapability`].
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.address_bits < 8 || self.address_bits > u32::BITS {
            return Err(ConfigError::AddressWidth {
                value: self.address_bits,
            });
        }
        if self.max_burst < MIN_LINE_WORDS || self.max_burst > MAX_LINE_WORDS {
            return Err(ConfigError::BurstCapability {
                value: self.max_burst,
                min: MIN_LINE_WORDS,
                max: MAX_LINE_WORDS,
            });
        }
        Ok(())
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            address_bits: defaults::ADDRESS_BITS,
            max_burst: defaults::MAX_BURST,
            read_latency: defaults::READ_LATENCY,
            write_latency: defaults::WRITE_LATENCY,
            controller: MemoryControllerKind::default(),
            t_cas: defaults::T_CAS,
            t_ras: defaults::T_RAS,
            t_pre: defaults::T_PRE,
        }
    }
}

/// Geometry of one direct-mapped primary cache and its secondary structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Index width; the cache holds 2^index_bits lines
    #[serde(default = "CacheConfig::default_index_bits")]
    pub index_bits: u32,

    /// Block-offset width; a line holds 2^offset_bits words
    #[serde(default = "CacheConfig::default_offset_bits")]
    pub offset_bits: u32,

    /// Victim cache capacity. Defaults to 64 (instruction) or 32 (data) when unset.
    #[serde(default)]
    pub victim_entries: Option<usize>,

    /// Stream buffer capacity. Defaults to 8 on the instruction cache; the data cache has none.
    #[serde(default)]
    pub stream_entries: Option<usize>,
}

impl CacheConfig {
    fn default_index_bits() -> u32 {
        defaults::INDEX_BITS
    }

    fn default_offset_bits() -> u32 {
        defaults::OFFSET_BITS
    }

    /// Victim cache capacity for a cache of the given kind.
    pub fn victim_entries(&self, kind: CacheKind) -> usize {
        self.victim_entries
            .unwrap_or_else(|| kind.default_victim_entries())
    }

    /// Stream buffer capacity for a cache of the given kind.
    pub fn stream_entries(&self, kind: CacheKind) -> usize {
        self.stream_entries
            .unwrap_or_else(|| kind.default_stream_entries())
    }

    /// Checks this geometry against the memory channel and returns the address layout.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NonPositiveTagWidth`] when index and offset leave no tag bits.
    /// - [`ConfigError::LineSize`] when a line is shorter than two words or longer
    ///   than the memory's burst capability.
    /// - [`ConfigError::SecondaryCapacity`] when a victim cache is empty, an
    ///   instruction cache has no stream buffer, or a data cache asks for one.
    pub fn validate(
        &self,
        kind: CacheKind,
        memory: &MemoryConfig,
    ) -> Result<LineGeometry, ConfigError> {
        let cache = kind.name();
        let width = i64::from(memory.address_bits)
            - i64::from(self.index_bits)
            - i64::from(self.offset_bits)
            - i64::from(WORD_SHIFT);
        if width <= 0 {
            return Err(ConfigError::NonPositiveTagWidth {
                cache,
                width,
                address_bits: memory.address_bits,
                index_bits: self.index_bits,
                offset_bits: self.offset_bits,
            });
        }

        let line_words = 1usize.checked_shl(self.offset_bits).unwrap_or(usize::MAX);
        if line_words < MIN_LINE_WORDS || line_words > memory.max_burst {
            return Err(ConfigError::LineSize {
                cache,
                offset_bits: self.offset_bits,
                line_words,
                min: MIN_LINE_WORDS,
                max_burst: memory.max_burst,
            });
        }

        let victim = self.victim_entries(kind);
        if victim == 0 || victim > MAX_SECONDARY_ENTRIES {
            return Err(ConfigError::SecondaryCapacity {
                cache,
                parameter: "victim_entries",
                value: victim,
                min: 1,
                max: MAX_SECONDARY_ENTRIES,
            });
        }

        let stream = self.stream_entries(kind);
        let (min, max) = if kind.has_stream_buffer() {
            (1, MAX_SECONDARY_ENTRIES)
        } else {
            (0, 0)
        };
        if stream < min || stream > max {
            return Err(ConfigError::SecondaryCapacity {
                cache,
                parameter: "stream_entries",
                value: stream,
                min,
                max,
            });
        }

        Ok(LineGeometry::new(
            memory.address_bits,
            self.index_bits,
            self.offset_bits,
        ))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            index_bits: defaults::INDEX_BITS,
            offset_bits: defaults::OFFSET_BITS,
            victim_entries: None,
            stream_entries: None,
        }
    }
}

/// Branch predictor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Top-level strategy
    #[serde(default)]
    pub kind: PredictorKind,

    /// Width of each per-address history register (log2 of the local counter table)
    #[serde(default = "PredictorConfig::default_local_history_bits")]
    pub local_history_bits: u32,

    /// Number of per-address history registers (log2)
    #[serde(default = "PredictorConfig::default_local_table_bits")]
    pub local_table_bits: u32,

    /// Global counter table size (log2)
    #[serde(default = "PredictorConfig::default_global_table_bits")]
    pub global_table_bits: u32,

    /// Global outcome history width
    #[serde(default = "PredictorConfig::default_global_history_bits")]
    pub global_history_bits: u32,

    /// Global index formation
    #[serde(default)]
    pub global_index: GlobalIndex,
}

impl PredictorConfig {
    fn default_local_history_bits() -> u32 {
        defaults::LOCAL_HISTORY_BITS
    }

    fn default_local_table_bits() -> u32 {
        defaults::LOCAL_TABLE_BITS
    }

    fn default_global_table_bits() -> u32 {
        defaults::GLOBAL_TABLE_BITS
    }

    fn default_global_history_bits() -> u32 {
        defaults::GLOBAL_HISTORY_BITS
    }

    /// Index scheme the global component uses.
    ///
    /// A standalone `GSelect`/`GShare` kind fixes the scheme; otherwise `global_index` applies.
    pub const fn index_scheme(&self) -> GlobalIndex {
        match self.kind {
            PredictorKind::GSelect => GlobalIndex::GSelect,
            PredictorKind::GShare => GlobalIndex::GShare,
            PredictorKind::Tournament | PredictorKind::Local => self.global_index,
        }
    }

    /// Checks table and history widths.
    ///
    /// # Errors
    ///
    /// [`ConfigError::PredictorWidth`] for a width outside 1..=20, or
    /// [`ConfigError::HistoryWiderThanIndex`] when the global history does not
    /// fit the global index (gselect needs at least one address bit).
    pub const fn validate(&self) -> Result<(), ConfigError> {
        const MAX_WIDTH: u32 = 20;
        let widths = [
            ("local_history_bits", self.local_history_bits),
            ("local_table_bits", self.local_table_bits),
            ("global_table_bits", self.global_table_bits),
            ("global_history_bits", self.global_history_bits),
        ];
        let mut i = 0;
        while i < widths.len() {
            let (parameter, value) = widths[i];
            if value == 0 || value > MAX_WIDTH {
                return Err(ConfigError::PredictorWidth {
                    parameter,
                    value,
                    min: 1,
                    max: MAX_WIDTH,
                });
            }
            i += 1;
        }

        let scheme = self.index_scheme();
        let fits = match scheme {
            GlobalIndex::GSelect => self.global_history_bits < self.global_table_bits,
            GlobalIndex::GShare => self.global_history_bits <= self.global_table_bits,
        };
        if !fits {
            return Err(ConfigError::HistoryWiderThanIndex {
                history: self.global_history_bits,
                table: self.global_table_bits,
                scheme: scheme.name(),
            });
        }
        Ok(())
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            kind: PredictorKind::default(),
            local_history_bits: defaults::LOCAL_HISTORY_BITS,
            local_table_bits: defaults::LOCAL_TABLE_BITS,
            global_table_bits: defaults::GLOBAL_TABLE_BITS,
            global_history_bits: defaults::GLOBAL_HISTORY_BITS,
            global_index: GlobalIndex::default(),
        }
    }
}
