/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Date format accepted in query strings and request bodies
pub const DATE_FORMAT: &str = "%Y-%m-%d";
