use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for the simulation core.
///
/// Constructors validate their inputs and return one of these variants
/// instead of letting NaN propagate through the physics. Each variant
/// carries enough context to be actionable.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Polygon validation failure (too few vertices, degenerate edge,
    /// self-intersection, wrong winding).
    #[error("invalid geometry: {0}")]
    Geometry(String),

    /// Numerical issue in a geometric operation (e.g., intersecting
    /// parallel face lines).
    #[error("numerical error: {0}")]
    Math(String),

    /// Worker pool construction failure.
    #[error(transparent)]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::InvalidParam("worker count must be > 0".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("invalid parameter"));
        assert!(msg.contains("worker count"));
    }

    #[test]
    fn geometry_display_is_informative() {
        let e = Error::Geometry("polygon needs at least 3 vertices".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("invalid geometry"));
        assert!(msg.contains("3 vertices"));
    }

    #[test]
    fn result_type_alias_compiles() -> Result<()> {
        // Simple smoke test for the alias
        Ok(())
    }
}
