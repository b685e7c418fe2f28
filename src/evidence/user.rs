use serde::{Deserialize, Serialize};

/// Numeric role assigned to an account, 1 (public viewer) through 8 (administrator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(pub u8);

impl Role {
    pub fn name(&self) -> &'static str {
        match self.0 {
            1 => "Public Viewer",
            2 => "Investigator",
            3 => "Forensic Analyst",
            4 => "Legal Professional",
            5 => "Court Official",
            6 => "Evidence Manager",
            7 => "Auditor",
            8 => "Administrator",
            _ => "Unknown",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self.0 {
            2 => "investigator",
            3 => "forensic",
            4 => "legal",
            5 => "court",
            6 => "manager",
            7 => "auditor",
            8 => "admin",
            _ => "public",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub account: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserProfile {
    /// Account identifier shortened for display, e.g. `0x12ab34...`
    pub fn short_account(&self) -> String {
        let prefix: String = self.account.chars().take(8).collect();
        format!("{}...", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names() {
        assert_eq!(Role(2).name(), "Investigator");
        assert_eq!(Role(8).badge_class(), "admin");
        assert_eq!(Role(42).name(), "Unknown");
        assert_eq!(Role(42).badge_class(), "public");
    }

    #[test]
    fn test_short_account() {
        let user = UserProfile {
            account: "0x1234567890abcdef".to_string(),
            role: Role(1),
            name: None,
        };
        assert_eq!(user.short_account(), "0x123456...");
    }
}
