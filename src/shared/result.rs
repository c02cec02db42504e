/// Type alias for Result with anyhow::Error as the error type.
///
/// Application wiring and adapters return this alias so errors from any
/// layer can be propagated with `?` and rendered with their source chain.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
