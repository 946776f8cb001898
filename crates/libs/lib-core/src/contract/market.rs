//! Market listing queries and path-segment identifiers.

use lib_utils::path_segment_hazard;
use shared::dto::market::MarketQuery;

use super::{Boundary, ContractViolation, Preflight};

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Longest slug or resource id embedded in a path.
pub const MAX_SEGMENT_LEN: usize = 128;

pub fn check_market_query(query: &MarketQuery) -> Preflight {
    if let Some(limit) = query.limit {
        if limit == 0 || limit > MAX_PAGE_LIMIT {
            return Err(ContractViolation::input(
                "limit",
                format!("Limit must be between 1 and {MAX_PAGE_LIMIT}"),
            ));
        }
    }
    Ok(())
}

/// Check an identifier that will become a single path segment.
pub fn check_path_segment(field: &str, segment: &str) -> Preflight {
    if segment.trim().is_empty() {
        return Err(ContractViolation::input(field, format!("{field} cannot be empty")));
    }
    if segment.chars().count() > MAX_SEGMENT_LEN {
        return Err(ContractViolation::input(
            field,
            format!("{field} must be at most {MAX_SEGMENT_LEN} characters"),
        ));
    }
    if let Some(hazard) = path_segment_hazard(segment) {
        return Err(ContractViolation::new(
            Boundary::Sanitization,
            field,
            format!("{field} contains a {hazard}"),
        ));
    }
    Ok(())
}
