
/// Instruction cache: refill, victim restore and stream restore.
pub mod icache;
