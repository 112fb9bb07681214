use crate::domain::post::Author;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub did: String,
    pub handle: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub followers_count: u32,
    pub follows_count: u32,
    pub posts_count: u32,
    /// URI of the viewer's follow record, if the viewer follows this actor
    pub viewer_following: Option<String>,
    pub labels: Vec<String>,
}

impl Profile {
    pub fn as_author(&self) -> Author {
        Author {
            did: self.did.clone(),
            handle: self.handle.clone(),
            display_name: self.display_name.clone(),
        }
    }

    pub fn is_followed(&self) -> bool {
        self.viewer_following.is_some()
    }
}
