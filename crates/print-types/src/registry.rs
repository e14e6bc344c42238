//! Registry trait for self-registering implementations.
//!
//! Pluggable backends (such as order submission) implement this trait to
//! declare the name they are configured under and the factory that builds
//! them.

/// Base trait for implementation registries.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation,
	/// e.g. "memory" for `submission.implementations.memory`.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
