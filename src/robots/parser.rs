//! Robots.txt parser implementation
//!
//! This module wraps the robotstxt crate's matcher behind a small type that
//! also represents "no rules" (missing or unreadable robots.txt).

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    /// Whether to allow all (true = allow all, false = parse content)
    allow_all: bool,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// This is used when robots.txt is missing or cannot be fetched.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// Returns true if this instance allows every URL
    pub fn is_allow_all(&self) -> bool {
        self.allow_all || self.content.trim().is_empty()
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The crawler's product token (e.g. "RuBot")
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.is_allow_all() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all() {
        let robots = ParsedRobots::allow_all();
        assert!(robots.is_allowed("http://example.com/any/path", "RuBot"));
        assert!(robots.is_allowed("http://example.com/admin", "RuBot"));
    }

    #[test]
    fn test_parse_disallow_all() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /");
        assert!(!robots.is_allowed("http://example.com/", "RuBot"));
        assert!(!robots.is_allowed("http://example.com/page/", "RuBot"));
    }

    #[test]
    fn test_parse_disallow_specific() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /admin");
        assert!(robots.is_allowed("http://example.com/", "RuBot"));
        assert!(robots.is_allowed("http://example.com/page/", "RuBot"));
        assert!(!robots.is_allowed("http://example.com/admin/", "RuBot"));
        assert!(!robots.is_allowed("http://example.com/admin/users/", "RuBot"));
    }

    #[test]
    fn test_parse_allow_and_disallow() {
        let content = "User-agent: *\nDisallow: /private\nAllow: /private/public";
        let robots = ParsedRobots::from_content(content);
        assert!(robots.is_allowed("http://example.com/", "RuBot"));
        assert!(!robots.is_allowed("http://example.com/private/", "RuBot"));
        assert!(robots.is_allowed("http://example.com/private/public/", "RuBot"));
    }

    #[test]
    fn test_parse_specific_user_agent() {
        let content = "User-agent: RuBot\nDisallow: /\n\nUser-agent: *\nAllow: /";
        let robots = ParsedRobots::from_content(content);
        assert!(robots.is_allowed("http://example.com/page/", "GoodBot"));
        assert!(!robots.is_allowed("http://example.com/page/", "RuBot"));
    }

    #[test]
    fn test_invalid_robots_txt() {
        let robots = ParsedRobots::from_content("This is not valid robots.txt {{{");
        assert!(robots.is_allowed("http://example.com/any/path", "RuBot"));
    }

    #[test]
    fn test_empty_robots_txt() {
        let robots = ParsedRobots::from_content("");
        assert!(robots.is_allow_all());
        assert!(robots.is_allowed("http://example.com/any/path", "RuBot"));
    }
}
