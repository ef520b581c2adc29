//! The `_metadata` group, introduced by the v3 format.

use crate::core::container::{load_integer_scalar, load_string_scalar, GroupNode};
use crate::core::error::{ErrorKind, Result, ResultExt};
use crate::core::version::FormatVersion;

const STAGE: &str = "_metadata";

/// The stored `format_version` must agree with the caller-supplied version.
pub fn validate(state: &GroupNode, version: FormatVersion) -> Result<()> {
    let group = super::open_stage(state, STAGE)?;
    (|| {
        let found = load_integer_scalar(group, "format_version")?;
        if found != version.encoded() {
            return Err(ErrorKind::VersionMismatch {
                expected: version.encoded(),
                found,
            }
            .into());
        }
        load_string_scalar(group, "application_name")?;
        load_string_scalar(group, "application_version")?;
        Ok(())
    })()
    .with_context(|| format!("failed to validate '{}'", STAGE))
}
