/// Registration failures.
///
/// These are configuration bugs: callers that use [`crate::Registry::register`]
/// get a panic carrying this message instead of a `Result`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// The key is already claimed in this registry.
	#[error("duplicate attribute key: {key}")]
	DuplicateKey { key: String },
}
