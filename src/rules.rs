use crate::{Keyword, Property, UserContext};

/// Return `true` if `user` satisfies every property of `keyword`.
///
/// A keyword with no properties matches every user.
pub fn matches(keyword: &Keyword, user: &UserContext) -> bool {
    keyword.matches(user)
}

impl Keyword {
    /// Return `true` if all properties match `user`.
    pub fn matches(&self, user: &UserContext) -> bool {
        self.properties
            .iter()
            .all(|property| property.matches(user))
    }
}

impl Property {
    /// Return `true` if `user` has this key with exactly this value. Comparison is case-sensitive.
    pub fn matches(&self, user: &UserContext) -> bool {
        user.property(&self.key) == Some(self.value.as_str())
    }
}
