use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Avatar pool for new members, assigned round-robin.
pub const AVATARS: [&str; 5] = [
    "https://picsum.photos/seed/user1/100/100",
    "https://picsum.photos/seed/user2/100/100",
    "https://picsum.photos/seed/user3/100/100",
    "https://picsum.photos/seed/user4/100/100",
    "https://picsum.photos/seed/user5/100/100",
];

/// A household participant who can be assigned tasks and optionally
/// notified via messaging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
    /// International phone number without punctuation (e.g. `5511999998888`).
    /// Empty means the member cannot be notified.
    pub phone: String,
    pub avatar: String,
}

impl Member {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            avatar: avatar.into(),
        }
    }

    pub fn has_phone(&self) -> bool {
        !self.phone.trim().is_empty()
    }
}

/// The two members written to an empty store on first load. Ids are fixed so
/// stores seeded by earlier versions of the app read back identically.
pub fn seed_members() -> Vec<Member> {
    vec![
        Member {
            id: "1".into(),
            name: "Alex Thompson".into(),
            email: "alex@gmail.com".into(),
            phone: "5511999998888".into(),
            avatar: "https://picsum.photos/seed/alex/100/100".into(),
        },
        Member {
            id: "2".into(),
            name: "Sarah Miller".into(),
            email: "sarah@gmail.com".into(),
            phone: "5511988887777".into(),
            avatar: "https://picsum.photos/seed/sarah/100/100".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_members_are_fixed() {
        let seeds = seed_members();
        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[0].name, "Alex Thompson");
        assert_eq!(seeds[1].name, "Sarah Miller");
        assert_eq!(seeds[0].id, "1");
        assert_eq!(seeds[1].id, "2");
    }

    #[test]
    fn has_phone_ignores_whitespace() {
        let mut member = Member::new("Kim", "kim@example.com", "  ", AVATARS[0]);
        assert!(!member.has_phone());
        member.phone = "5511999998888".into();
        assert!(member.has_phone());
    }
}
