/// Field positions in a raw record, fixed by contract with the upstream
/// producer. A record missing any of these positions is malformed.
pub const FIELD_TIMESTAMP: usize = 1;
pub const FIELD_PROJECT_ID: usize = 3;
pub const FIELD_PROPS: usize = 14;
pub const FIELD_NUMS: usize = 15;

/// Timestamp format of the raw record source (millisecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Date format used in record keys and rate lookups.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
