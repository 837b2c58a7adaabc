//! User identity module for the binary shell.
//!
//! Authentication happens outside the tracker; the authenticated user's opaque id is
//! handed to the process through `RESALE_USER_ID` (usually from `.env`).

use crate::errors::Result;

/// Environment variable holding the authenticated user id
pub const USER_ID_VAR: &str = "RESALE_USER_ID";

/// Gets the current user id from the environment.
///
/// # Errors
/// Returns `EnvVar` when the variable is unset or not valid unicode.
pub fn get_current_user_id() -> Result<String> {
    let user_id = std::env::var(USER_ID_VAR)?;
    Ok(user_id.trim().to_string())
}
