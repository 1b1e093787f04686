//! Bin specs: one comparison operator followed by one numeric threshold,
//! e.g. `"=1"`, `"< 0"`, `">=2.5"`.

use std::fmt;
use std::str::FromStr;

use crate::error::ColorMappingError;

/// Comparison operator of a bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinOp {
    fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// A parsed `(operator, threshold)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub op: BinOp,
    pub threshold: f64,
}

impl Bin {
    pub fn new(op: BinOp, threshold: f64) -> Self {
        Self { op, threshold }
    }

    /// Whether `value` satisfies this bin's predicate.
    pub fn matches(&self, value: f64) -> bool {
        match self.op {
            BinOp::Eq => {
                (value - self.threshold).abs() <= f64::EPSILON * self.threshold.abs().max(1.0)
            }
            BinOp::Lt => value < self.threshold,
            BinOp::Le => value <= self.threshold,
            BinOp::Gt => value > self.threshold,
            BinOp::Ge => value >= self.threshold,
        }
    }
}

impl FromStr for Bin {
    type Err = ColorMappingError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let trimmed = spec.trim();
        // Two-character operators first so "<=" is not read as "<" + "=5".
        let (op, rest) = [
            ("<=", BinOp::Le),
            (">=", BinOp::Ge),
            ("<", BinOp::Lt),
            (">", BinOp::Gt),
            ("=", BinOp::Eq),
        ]
        .into_iter()
        .find_map(|(sym, op)| trimmed.strip_prefix(sym).map(|rest| (op, rest)))
        .ok_or_else(|| ColorMappingError::InvalidBin(spec.to_string()))?;

        let threshold: f64 = rest
            .trim()
            .parse()
            .map_err(|_| ColorMappingError::InvalidBin(spec.to_string()))?;
        if !threshold.is_finite() {
            return Err(ColorMappingError::InvalidBin(spec.to_string()));
        }
        Ok(Self { op, threshold })
    }
}

impl fmt::Display for Bin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op.symbol(), self.threshold)
    }
}

/// Parse every spec, failing on the first malformed one.
pub fn parse_bins<S: AsRef<str>>(specs: &[S]) -> Result<Vec<Bin>, ColorMappingError> {
    specs.iter().map(|s| s.as_ref().parse()).collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("=1", BinOp::Eq, 1.0 ; "equals")]
    #[test_case("<0", BinOp::Lt, 0.0 ; "less than")]
    #[test_case("<= 5", BinOp::Le, 5.0 ; "less or equal with space")]
    #[test_case(">-2.5", BinOp::Gt, -2.5 ; "greater than negative")]
    #[test_case(" >=10 ", BinOp::Ge, 10.0 ; "greater or equal padded")]
    fn parses_operator_and_threshold(spec: &str, op: BinOp, threshold: f64) {
        let bin: Bin = spec.parse().unwrap();
        assert_eq!(bin.op, op);
        assert_eq!(bin.threshold, threshold);
    }

    #[test_case("" ; "empty")]
    #[test_case("5" ; "no operator")]
    #[test_case("<" ; "no threshold")]
    #[test_case("<=abc" ; "non numeric")]
    #[test_case("=<5" ; "two operators")]
    #[test_case("<NaN" ; "not finite")]
    fn rejects_malformed_specs(spec: &str) {
        assert_eq!(
            spec.parse::<Bin>(),
            Err(ColorMappingError::InvalidBin(spec.to_string()))
        );
    }

    #[test]
    fn predicates_match_boundaries() {
        assert!(Bin::new(BinOp::Le, 5.0).matches(5.0));
        assert!(!Bin::new(BinOp::Lt, 5.0).matches(5.0));
        assert!(Bin::new(BinOp::Ge, 5.0).matches(5.0));
        assert!(!Bin::new(BinOp::Gt, 5.0).matches(5.0));
        assert!(Bin::new(BinOp::Eq, 0.3).matches(0.1 + 0.2));
        assert!(!Bin::new(BinOp::Eq, 1.0).matches(1.001));
    }

    #[test]
    fn parse_bins_stops_at_first_error() {
        let err = parse_bins(&["=1", "bogus", "=3"]).unwrap_err();
        assert_eq!(err, ColorMappingError::InvalidBin("bogus".to_string()));
        assert_eq!(parse_bins(&["=1", ">1"]).unwrap().len(), 2);
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(Bin::new(BinOp::Le, 2.5).to_string(), "<= 2.5");
    }
}
