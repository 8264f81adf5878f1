//! Workspace invite codes.

use rand::Rng;

use crate::error::CoreError;

/// Length of a workspace invite code.
pub const INVITE_CODE_LENGTH: usize = 8;

/// Generate a random alphanumeric invite code.
pub fn generate_invite_code() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(INVITE_CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Compare a submitted invite code with the workspace's current one.
pub fn check_invite_code(expected: &str, submitted: &str) -> Result<(), CoreError> {
    if expected != submitted.trim() {
        return Err(CoreError::Application("Invalid invite code".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invite_code_shape() {
        let code = generate_invite_code();
        assert_eq!(code.len(), INVITE_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn invite_code_check() {
        assert!(check_invite_code("Ab12Cd34", "Ab12Cd34").is_ok());
        assert!(check_invite_code("Ab12Cd34", "ab12cd34").is_err());
        assert_eq!(
            check_invite_code("Ab12Cd34", "nope").unwrap_err().to_string(),
            "Invalid invite code"
        );
    }
}
