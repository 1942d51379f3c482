//! Pure derivation of the visible feed from the search box and tag filter.

use crate::models::Post;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    search_term: String,
    /// `search_term` lowercased once per edit
    needle: String,
    selected_tag: Option<String>,
}

impl FilterCriteria {
    pub fn new(search_term: impl Into<String>, selected_tag: Option<&str>) -> Self {
        let mut criteria = Self::default();
        criteria.set_search(search_term);
        criteria.select_tag(selected_tag);
        criteria
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn selected_tag(&self) -> Option<&str> {
        self.selected_tag.as_deref()
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.needle = self.search_term.to_lowercase();
    }

    /// `None` and `Some("")` both mean "All Tags".
    pub fn select_tag(&mut self, tag: Option<&str>) {
        self.selected_tag = tag.filter(|t| !t.is_empty()).map(str::to_string);
    }

    pub fn matches(&self, post: &Post) -> bool {
        self.matches_search(post) && self.matches_tag(post)
    }

    fn matches_search(&self, post: &Post) -> bool {
        self.needle.is_empty()
            || post.title.to_lowercase().contains(&self.needle)
            || post.content.to_lowercase().contains(&self.needle)
    }

    fn matches_tag(&self, post: &Post) -> bool {
        match &self.selected_tag {
            Some(tag) => post.has_tag(tag),
            None => true,
        }
    }
}

/// Matching posts in the order given.
pub fn select<'a, I>(posts: I, criteria: &FilterCriteria) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    posts
        .into_iter()
        .filter(|post| criteria.matches(post))
        .collect()
}

/// Matching posts, most recently fetched first.
pub fn filter<'a, I>(posts: I, criteria: &FilterCriteria) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    let mut visible = select(posts, criteria);
    visible.reverse();
    visible
}
