//! Tapegraph-specific error codes
//!
//! Error codes follow the pattern: TAPE-{CATEGORY}-{3-digit number}
//!
//! Categories (1-3 uppercase letters):
//! - EP: Episode-related errors (missing episode, invalid range)
//! - CFG: Configuration errors (unreadable or invalid config file)
//! - IO: I/O-related errors (text store access, export writing)
//!
//! Each error code is stable and should not be reused.

/// Requested episode is absent from the text store
pub const TAPE_EP_001_MISSING_EPISODE: &str = "TAPE-EP-001";

/// Episode range is empty or exceeds the configured maximum
pub const TAPE_EP_002_INVALID_RANGE: &str = "TAPE-EP-002";

/// Episode file could not be mapped to an episode number
pub const TAPE_EP_003_UNNUMBERED_FILE: &str = "TAPE-EP-003";

/// Configuration file could not be parsed or failed validation
pub const TAPE_CFG_001_INVALID_CONFIG: &str = "TAPE-CFG-001";

/// File or directory could not be read or written
pub const TAPE_IO_001_ACCESS_FAILED: &str = "TAPE-IO-001";

/// JSON input or output was malformed
pub const TAPE_IO_002_MALFORMED_JSON: &str = "TAPE-IO-002";

/// Error code documentation
///
/// # Episode Errors (TAPE-EP-*)
///
/// | Code | Description | Remediation |
/// |------|-------------|-------------|
/// | TAPE-EP-001 | Missing episode | Re-run the scraper for that episode or narrow `--start`/`--end` |
/// | TAPE-EP-002 | Invalid range | Ensure `start <= end <= max_episode` |
/// | TAPE-EP-003 | Unnumbered file | Name files `<N>.txt` or start the text with `MAGnnn -` |
///
/// # Configuration Errors (TAPE-CFG-*)
///
/// | Code | Description | Remediation |
/// |------|-------------|-------------|
/// | TAPE-CFG-001 | Invalid config | Check YAML syntax and value ranges |
///
/// # I/O Errors (TAPE-IO-*)
///
/// | Code | Description | Remediation |
/// |------|-------------|-------------|
/// | TAPE-IO-001 | Access failed | Check path and permissions |
/// | TAPE-IO-002 | Malformed JSON | Regenerate the text cache |
pub const ERROR_CODE_DOCUMENTATION: &str = "Error code documentation available in source";
