//! Identity snapshot fixtures.

use rapidsetup_core::IdentitySnapshot;

/// An active human identity.
pub fn employee(name: &str) -> IdentitySnapshot {
    IdentitySnapshot::new(format!("id-{}", name.to_lowercase()), name)
        .with("type", "employee")
        .with("inactive", false)
}

/// A service account, excluded from lifecycle processing.
pub fn service_account(name: &str) -> IdentitySnapshot {
    IdentitySnapshot::new(format!("id-{}", name.to_lowercase()), name).with("type", "service")
}
