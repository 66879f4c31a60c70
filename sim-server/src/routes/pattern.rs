//! Path patterns
//!
//! Two shapes cover the whole simulated API: exact suffix matches for
//! literal endpoints and a trailing-integer-id match for `/{collection}/{id}`
//! endpoints. The id pattern requires the segment before the id to end with
//! the given prefix, so `/api/workflows/employee/5` never matches the
//! `/api/workflows/{id}` pattern.

/// Compiled path matcher
#[derive(Debug, Clone, Copy)]
pub enum PathPattern {
    /// Matches when the path ends with the literal suffix
    Suffix(&'static str),
    /// Matches `…{prefix}/{integer}`; captures the trailing id
    IdSuffix(&'static str),
}

impl PathPattern {
    /// Test a path against this pattern
    ///
    /// Returns `None` on no match, `Some(None)` on a literal match and
    /// `Some(Some(id))` when a trailing id was captured.
    pub fn matches(&self, path: &str) -> Option<Option<i64>> {
        match self {
            PathPattern::Suffix(suffix) => path.ends_with(suffix).then_some(None),
            PathPattern::IdSuffix(prefix) => {
                let (head, tail) = path.rsplit_once('/')?;
                if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                if !head.ends_with(prefix) {
                    return None;
                }
                // 超出 i64 的数字串按不匹配处理
                tail.parse::<i64>().ok().map(Some)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_match() {
        let pattern = PathPattern::Suffix("/accounts");
        assert_eq!(pattern.matches("/accounts"), Some(None));
        assert_eq!(pattern.matches("http://localhost/api/accounts"), Some(None));
        assert_eq!(pattern.matches("/accounts/1"), None);
    }

    #[test]
    fn test_id_suffix_match() {
        let pattern = PathPattern::IdSuffix("/accounts");
        assert_eq!(pattern.matches("/accounts/1"), Some(Some(1)));
        assert_eq!(pattern.matches("/api/accounts/42"), Some(Some(42)));
        assert_eq!(pattern.matches("/accounts"), None);
        assert_eq!(pattern.matches("/accounts/abc"), None);
        assert_eq!(pattern.matches("/accounts/1x"), None);
    }

    #[test]
    fn test_nested_id_routes_do_not_collide() {
        // `/api/workflows/employee/{id}` 不能被 `/api/workflows/{id}` 吃掉
        let by_id = PathPattern::IdSuffix("/api/workflows");
        let by_employee = PathPattern::IdSuffix("/api/workflows/employee");

        assert_eq!(by_id.matches("/api/workflows/employee/5"), None);
        assert_eq!(by_employee.matches("/api/workflows/employee/5"), Some(Some(5)));
        assert_eq!(by_id.matches("/api/workflows/5"), Some(Some(5)));
        assert_eq!(by_employee.matches("/api/workflows/5"), None);
    }

    #[test]
    fn test_oversized_id_does_not_match() {
        let pattern = PathPattern::IdSuffix("/accounts");
        assert_eq!(pattern.matches("/accounts/99999999999999999999999999"), None);
    }
}
