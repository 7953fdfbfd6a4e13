//! User lookup for privilege drop.

use nix::unistd::User;
use tracing::debug;

use crate::error::{ExecError, ExecResult};

/// Numeric identity a child is launched under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub uid: u32,
    pub gid: u32,
}

/// Resolve `name` through the system user database.
pub fn resolve_user(name: &str) -> ExecResult<Identity> {
    let user = User::from_name(name)
        .map_err(|e| ExecError::UnknownUser {
            user: name.to_string(),
            source: Some(e),
        })?
        .ok_or_else(|| ExecError::UnknownUser {
            user: name.to_string(),
            source: None,
        })?;

    let identity = Identity {
        uid: user.uid.as_raw(),
        gid: user.gid.as_raw(),
    };
    debug!(user = name, uid = identity.uid, gid = identity.gid, "resolved run-as user");
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_root() {
        let identity = resolve_user("root").unwrap();
        assert_eq!(identity, Identity { uid: 0, gid: 0 });
    }

    #[test]
    fn test_resolve_unknown_user() {
        let err = resolve_user("runcmd-no-such-user").unwrap_err();
        assert!(matches!(err, ExecError::UnknownUser { ref user, .. } if user == "runcmd-no-such-user"));
        assert_eq!(err.exit_code(), None);
    }
}
