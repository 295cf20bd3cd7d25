//! Keyword-rule responder for the chat surface.
//!
//! Matching is intentionally simple: a rule fires when every one of its
//! keywords appears as a case-insensitive substring of the input. Rules are
//! scanned in declaration order and the first full match wins. Containment
//! is substring-based, not word-boundary-based, so a keyword also matches
//! inside longer words.

use crate::config::ChatConfig;

pub struct Responder {
    chat: ChatConfig,
}

impl Responder {
    pub fn new(chat: ChatConfig) -> Self {
        Self { chat }
    }

    pub fn chat(&self) -> &ChatConfig {
        &self.chat
    }

    /// Select the response for a user prompt. Callers reject blank input
    /// before getting here; a blank prompt would simply hit the default.
    pub fn classify(&self, input: &str) -> &str {
        let lowered = input.to_lowercase();
        self.chat
            .rules
            .iter()
            .find(|rule| {
                rule.keywords
                    .iter()
                    .all(|kw| lowered.contains(&kw.to_lowercase()))
            })
            .map_or(self.chat.default_response.as_str(), |rule| {
                rule.response.as_str()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResponseRule;

    fn responder() -> Responder {
        Responder::new(ChatConfig {
            rules: vec![
                ResponseRule {
                    keywords: vec!["介绍".to_string(), "崔晗老师".to_string()],
                    response: "intro-response".to_string(),
                },
                ResponseRule {
                    keywords: vec!["研究".to_string(), "方向".to_string()],
                    response: "research-response".to_string(),
                },
                ResponseRule {
                    keywords: vec!["研究".to_string()],
                    response: "later-overlapping-rule".to_string(),
                },
                ResponseRule {
                    keywords: vec!["HELP".to_string()],
                    response: "help-response".to_string(),
                },
            ],
            default_response: "default-response".to_string(),
            suggestions: vec!["看总结".to_string()],
            summary_markers: vec!["总结".to_string()],
        })
    }

    #[test]
    fn all_keywords_must_match() {
        let r = responder();
        assert_eq!(r.classify("请介绍一下崔晗老师"), "intro-response");
        // Only one of the two keywords present.
        assert_eq!(r.classify("请介绍一下你自己"), "default-response");
    }

    #[test]
    fn first_matching_rule_wins() {
        let r = responder();
        // Matches both the ["研究","方向"] rule and the ["研究"] rule;
        // declaration order decides.
        assert_eq!(r.classify("课题组的研究方向有哪些"), "research-response");
        // Matches only the ["研究"] rule.
        assert_eq!(r.classify("研究什么"), "later-overlapping-rule");
    }

    #[test]
    fn no_match_falls_back_to_default() {
        let r = responder();
        assert_eq!(r.classify("今天天气怎么样"), "default-response");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let r = responder();
        assert_eq!(r.classify("i need help please"), "help-response");
        assert_eq!(r.classify("I NEED HELP PLEASE"), "help-response");
    }

    #[test]
    fn containment_is_substring_not_word_boundary() {
        let r = responder();
        // "研究生" contains "研究" as a substring.
        assert_eq!(r.classify("研究生的生活"), "later-overlapping-rule");
    }
}
