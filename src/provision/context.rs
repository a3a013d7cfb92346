//! Security context discovery.

use super::types::ProvisionError;

/// The MLS level of the application's security context, e.g.
/// `:s0:c512,c768`.
///
/// App processes are confined to their categories, so the device node has to
/// carry the same level to be usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityContext {
    level: String,
}

impl SecurityContext {
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Label for a device node of `device_type` at this level.
    pub fn device_label(&self, device_type: &str) -> String {
        format!("u:object_r:{}{}", device_type, self.level)
    }
}

/// Extracts the security level from `stat -c %C` output.
///
/// The level starts at the first `:s0` and runs to the end of the context
/// (`u:object_r:app_data_file:s0:c512,c768` yields `:s0:c512,c768`). Output
/// without a level, or output that is nothing but the level, is rejected.
pub fn parse_context(output: &str) -> Result<SecurityContext, ProvisionError> {
    let parse_failed = || ProvisionError::ContextParseFailed {
        output: output.to_string(),
    };

    let start = output.find(":s0").ok_or_else(parse_failed)?;
    let level = output[start..]
        .split_whitespace()
        .next()
        .ok_or_else(parse_failed)?;

    if level == output {
        return Err(parse_failed());
    }

    Ok(SecurityContext {
        level: level.to_string(),
    })
}
