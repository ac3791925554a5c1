// ABOUTME: Sealed trait pattern for runtime traits.
// ABOUTME: Only the engine adapters in this crate implement the capability traits.

/// Sealed trait to prevent external implementations.
///
/// Fakes plug in below the adapters through `CommandRunner` instead.
pub trait Sealed {}
