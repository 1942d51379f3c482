//! Plain-text rendering of the page.

use askama::Template;

use crate::feed::{FeedView, ForumPage, PostCard, TagOption};

#[derive(Template)]
#[template(path = "feed.txt")]
struct FeedTemplate {
    loading: bool,
    cards: Vec<PostCard>,
}

#[derive(Template)]
#[template(path = "tags.txt")]
struct TagsTemplate {
    options: Vec<TagOption>,
}

pub fn render_feed(page: &ForumPage) -> askama::Result<String> {
    let template = match page.view() {
        FeedView::Loading => FeedTemplate {
            loading: true,
            cards: Vec::new(),
        },
        FeedView::Ready(cards) => FeedTemplate {
            loading: false,
            cards,
        },
    };
    template.render()
}

pub fn render_tags(page: &ForumPage) -> askama::Result<String> {
    TagsTemplate {
        options: page.tag_options(),
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Identity;
    use crate::feed::PageEvent;
    use crate::models::{Author, Post};

    fn page_with_posts() -> ForumPage {
        let mut page = ForumPage::new(Identity::new("u1"));
        page.apply(PageEvent::TagsLoaded(vec!["math".into(), "linear_algebra".into()]));
        page.apply(PageEvent::PostsLoaded(vec![
            Post {
                id: "1".into(),
                title: "Calc help".into(),
                content: "Limits?".into(),
                time_ago: "2h ago".into(),
                tags: Some(vec!["math".into(), "linear_algebra".into()]),
                author: Some(Author {
                    id: "u1".into(),
                    name: "Ana".into(),
                }),
                replies_count: 3,
            },
            Post {
                id: "2".into(),
                title: "Anyone?".into(),
                content: String::new(),
                time_ago: "1h ago".into(),
                tags: None,
                author: None,
                replies_count: 0,
            },
        ]));
        page
    }

    #[test]
    fn loading_page_renders_placeholder() {
        let text = render_feed(&ForumPage::default()).unwrap();
        assert_eq!(text.trim(), "Loading posts...");
    }

    #[test]
    fn empty_feed_says_so() {
        let mut page = ForumPage::default();
        page.apply(PageEvent::PostsLoaded(Vec::new()));
        assert_eq!(render_feed(&page).unwrap().trim(), "No posts match.");
    }

    #[test]
    fn cards_render_newest_first() {
        let text = render_feed(&page_with_posts()).unwrap();

        let newest = text.find("[2] Anyone?").unwrap();
        let oldest = text.find("[1] Calc help  [delete]").unwrap();
        assert!(newest < oldest);
        assert!(text.contains("Anonymous - 1h ago - 0 replies"));
        assert!(text.contains("Ana - 2h ago - 3 replies"));
        assert!(text.contains("tags: math, linear algebra"));
        assert!(text.contains("Limits?"));
        assert!(!text.contains("[2] Anyone?  [delete]"));
    }

    #[test]
    fn tag_options_mark_selection() {
        let mut page = page_with_posts();
        page.select_tag(Some("linear_algebra"));
        let text = render_tags(&page).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  All Tags");
        assert_eq!(lines[1], "  math (math)");
        assert_eq!(lines[2], "* linear algebra (linear_algebra)");
    }
}
