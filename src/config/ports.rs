//! Port spec expansion.
//!
//! Service ports are configured as strings so a single list can mix single
//! ports ("443") with inclusive ranges ("11000-12000"). Expansion happens
//! once at startup; the scheduler and reconciler only ever see `u16` ports.

use thiserror::Error;

/// Error produced by a malformed port spec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PortSpecError {
    #[error("port spec '{0}' is not a valid port number")]
    NotANumber(String),

    #[error("port range '{0}' has start greater than end")]
    ReversedRange(String),
}

/// Expand a single spec into its port list.
pub fn expand_spec(spec: &str) -> Result<Vec<u16>, PortSpecError> {
    let spec = spec.trim();
    if let Some((start, end)) = spec.split_once('-') {
        let start: u16 = start
            .trim()
            .parse()
            .map_err(|_| PortSpecError::NotANumber(spec.to_string()))?;
        let end: u16 = end
            .trim()
            .parse()
            .map_err(|_| PortSpecError::NotANumber(spec.to_string()))?;
        if start > end {
            return Err(PortSpecError::ReversedRange(spec.to_string()));
        }
        Ok((start..=end).collect())
    } else {
        let port: u16 = spec
            .parse()
            .map_err(|_| PortSpecError::NotANumber(spec.to_string()))?;
        Ok(vec![port])
    }
}

/// Expand a list of specs, preserving configured order.
pub fn expand_specs(specs: &[String]) -> Result<Vec<u16>, PortSpecError> {
    let mut expanded = Vec::new();
    for spec in specs {
        expanded.extend(expand_spec(spec)?);
    }
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_port() {
        assert_eq!(expand_spec("80"), Ok(vec![80]));
        assert_eq!(expand_spec(" 443 "), Ok(vec![443]));
    }

    #[test]
    fn inclusive_range() {
        assert_eq!(expand_spec("8000-8003"), Ok(vec![8000, 8001, 8002, 8003]));
        // A single-element range is allowed.
        assert_eq!(expand_spec("80-80"), Ok(vec![80]));
    }

    #[test]
    fn reversed_range_is_rejected() {
        assert_eq!(
            expand_spec("12000-11000"),
            Err(PortSpecError::ReversedRange("12000-11000".to_string()))
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(expand_spec("http"), Err(PortSpecError::NotANumber(_))));
        assert!(matches!(expand_spec("80-x"), Err(PortSpecError::NotANumber(_))));
        assert!(matches!(expand_spec("99999"), Err(PortSpecError::NotANumber(_))));
        assert!(matches!(expand_spec(""), Err(PortSpecError::NotANumber(_))));
    }

    #[test]
    fn list_expansion_preserves_order() {
        let specs = vec!["443".to_string(), "80-82".to_string(), "22".to_string()];
        assert_eq!(expand_specs(&specs), Ok(vec![443, 80, 81, 82, 22]));
    }

    #[test]
    fn list_expansion_fails_on_first_bad_spec() {
        let specs = vec!["80".to_string(), "nope".to_string()];
        assert!(expand_specs(&specs).is_err());
    }
}
