//! Content assistance for the admin editor and the public chat widget.
//!
//! When a remote model is configured the prompts go to it; otherwise, and
//! whenever the remote call fails for the editor helpers, the deterministic
//! fallbacks below produce usable drafts so the CMS keeps working without an
//! API key.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::debug;

use crate::clients::GeminiClient;

const DEFAULT_TAGS: &[&str] = &[
    "technology",
    "software",
    "development",
    "business",
    "innovation",
];

const CHAT_SYSTEM_PROMPT: &str = "You are the virtual assistant for a software \
development agency's website. Help visitors understand the services, products \
and open roles, and point them at the right page. Available pages: / (home), \
/about, /services, /products, /careers, /blog, /contact. Be concise and use \
bullet points for lists. When the visitor should be taken to a page, end your \
reply with a line of the form NAVIGATE: <path>.";

#[derive(Debug, Clone, Serialize)]
pub struct SeoAnalysis {
    pub score: u32,
    pub suggestions: Vec<String>,
    pub keywords: Vec<String>,
    pub readability: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDraft {
    pub description: String,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigate_to: Option<String>,
}

fn leading_sentence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^([A-Z][^\n]*)$").unwrap())
}

#[derive(Clone)]
pub struct ContentAssistService {
    client: Option<GeminiClient>,
}

impl ContentAssistService {
    #[must_use]
    pub const fn new(client: Option<GeminiClient>) -> Self {
        Self { client }
    }

    async fn remote(&self, system: Option<&str>, prompt: &str) -> Option<String> {
        let client = self.client.as_ref()?;
        match client.generate(system, prompt).await {
            Ok(text) => Some(text),
            Err(err) => {
                debug!("Remote generation failed, using fallback: {err:#}");
                None
            }
        }
    }

    pub async fn generate_blog_content(&self, topic: &str, prompt: &str, tone: &str) -> String {
        let request = format!(
            "Write a {tone} blog post in markdown about \"{topic}\". {prompt} \
             Use ## headings and keep it around 800 words."
        );
        if let Some(text) = self.remote(None, &request).await {
            return text;
        }

        blog_scaffold(topic, prompt)
    }

    pub async fn meta_description(&self, title: &str, content: &str) -> String {
        let request = format!(
            "Write an SEO meta description of 120-160 characters for an \
             article titled \"{title}\". Article start: {}",
            truncate(content, 500)
        );
        if let Some(text) = self.remote(None, &request).await {
            return text.trim().to_string();
        }

        let excerpt: String = truncate(content, 300)
            .chars()
            .map(|c| if matches!(c, '#' | '*' | '`' | '\n') { ' ' } else { c })
            .collect();
        format!("Learn about {title}. {}...", truncate(excerpt.trim(), 120))
    }

    pub async fn suggest_tags(&self, title: &str, content: &str, count: usize) -> Vec<String> {
        extract_keywords(title, content, count)
    }

    pub async fn analyze_seo(
        &self,
        title: &str,
        content: &str,
        meta_description: Option<&str>,
    ) -> SeoAnalysis {
        let mut score: u32 = 50;
        let mut suggestions = Vec::new();

        let title_len = title.chars().count();
        if (40..=60).contains(&title_len) {
            score += 15;
        } else if title_len < 40 {
            suggestions.push("Title is too short (aim for 40-60 characters)".to_string());
        } else {
            suggestions.push("Title is too long (aim for 40-60 characters)".to_string());
        }

        if content.chars().count() >= 1500 {
            score += 15;
        } else {
            suggestions
                .push("Content should be at least 1500 characters for better SEO".to_string());
        }

        let meta_len = meta_description.map_or(0, |m| m.chars().count());
        if (120..=160).contains(&meta_len) {
            score += 10;
        } else {
            suggestions.push("Add a meta description between 120-160 characters".to_string());
        }

        if content.contains('#') {
            score += 10;
        } else {
            suggestions.push("Add headings to improve content structure".to_string());
        }

        if suggestions.is_empty() {
            suggestions
                .push("Your content looks good! Consider adding more detailed sections.".to_string());
        }

        SeoAnalysis {
            score: score.min(100),
            suggestions,
            keywords: extract_keywords(title, content, 8),
            readability: 75,
        }
    }

    pub async fn improve_content(&self, content: &str, focus: &str) -> String {
        let request = format!(
            "Improve the following markdown content with a focus on {focus}. \
             Return only the improved markdown.\n\n{content}"
        );
        if let Some(text) = self.remote(None, &request).await {
            return text;
        }

        leading_sentence_regex()
            .replace_all(content, "**$1**")
            .trim()
            .to_string()
    }

    pub async fn product_description(
        &self,
        name: &str,
        features: &[String],
        category: &str,
    ) -> String {
        let request = format!(
            "Write a marketing product description in markdown for \"{name}\", \
             a {category} product with these features: {}",
            features.join(", ")
        );
        if let Some(text) = self.remote(None, &request).await {
            return text;
        }

        let feature_list = features
            .iter()
            .map(|f| format!("- {f}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "**{name}** is a cutting-edge {category} solution designed to \
             revolutionize your workflow.\n\n**Key Features:**\n{feature_list}\n\n\
             **Why Choose {name}?**\n\nOur {category} platform combines \
             innovative technology with user-friendly design to deliver \
             exceptional results. Whether you're a small business or \
             enterprise, {name} scales to meet your needs.\n\n**Perfect For:**\n\
             - Businesses seeking {category} solutions\n\
             - Teams looking to improve efficiency\n\
             - Organizations wanting to stay competitive\n\n\
             Get started with {name} today and experience the difference!"
        )
    }

    pub async fn job_description(&self, title: &str, department: &str, level: &str) -> JobDraft {
        let years = match level {
            "senior" | "lead" => "5+",
            "mid" => "3+",
            _ => "1+",
        };

        JobDraft {
            description: format!(
                "We are seeking a talented {title} to join our {department} \
                 team. This {level}-level position offers an exciting \
                 opportunity to work on innovative projects and grow your \
                 career with a dynamic organization."
            ),
            responsibilities: vec![
                format!("Lead {department} initiatives and projects"),
                "Collaborate with cross-functional teams".to_string(),
                "Drive innovation and best practices".to_string(),
                "Mentor junior team members".to_string(),
                "Contribute to strategic planning".to_string(),
                "Deliver high-quality results on time".to_string(),
            ],
            requirements: vec![
                format!("{years} years of experience in {department}"),
                "Strong technical and problem-solving skills".to_string(),
                "Excellent communication and teamwork abilities".to_string(),
                "Bachelor's degree in related field or equivalent experience".to_string(),
                "Proven track record of successful project delivery".to_string(),
                "Passion for learning and professional development".to_string(),
            ],
        }
    }

    /// Website chat widget. The remote model can request a page change by
    /// ending its reply with `NAVIGATE: /path`; that line is stripped into
    /// the structured hint the frontend dispatches.
    pub async fn chat(&self, message: &str) -> ChatReply {
        if let Some(text) = self.remote(Some(CHAT_SYSTEM_PROMPT), message).await {
            return split_navigation_hint(&text);
        }

        ChatReply {
            navigate_to: local_navigation_hint(message),
            reply: format!(
                "Based on your question about \"{}\", here are some pointers:\n\n\
                 - Our services cover custom software, mobile apps and cloud work\n\
                 - The products page describes what we build and ship\n\
                 - Open roles are listed on the careers page\n\n\
                 Would you like to know more about anything specific?",
                truncate(message, 80)
            ),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn extract_keywords(title: &str, content: &str, count: usize) -> Vec<String> {
    let haystack = format!("{title} {}", truncate(content, 500)).to_lowercase();
    let cleaned: String = haystack
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c == ' ' { c } else { ' ' })
        .collect();

    let mut seen = Vec::new();
    for word in cleaned.split_whitespace() {
        if word.len() > 4 && !seen.iter().any(|s: &String| s == word) {
            seen.push(word.to_string());
            if seen.len() == count {
                break;
            }
        }
    }

    if seen.is_empty() {
        DEFAULT_TAGS.iter().map(|s| (*s).to_string()).collect()
    } else {
        seen
    }
}

fn split_navigation_hint(text: &str) -> ChatReply {
    let mut navigate_to = None;
    let mut lines = Vec::new();

    for line in text.lines() {
        if let Some(path) = line.trim().strip_prefix("NAVIGATE:") {
            navigate_to = Some(path.trim().to_string());
        } else {
            lines.push(line);
        }
    }

    ChatReply {
        reply: lines.join("\n").trim().to_string(),
        navigate_to,
    }
}

fn local_navigation_hint(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    let mappings = [
        ("contact", "/contact"),
        ("career", "/careers"),
        ("job", "/careers"),
        ("blog", "/blog"),
        ("product", "/products"),
        ("service", "/services"),
        ("about", "/about"),
    ];

    mappings
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, path)| (*path).to_string())
}

fn blog_scaffold(topic: &str, prompt: &str) -> String {
    let intro = if prompt.is_empty() {
        format!("This post takes a practical look at {topic}")
    } else {
        prompt.to_string()
    };

    format!(
        "# {topic}\n\n## Introduction\n{intro}.\n\n## Key Points\n\n\
         - Professional insights into {topic}\n\
         - Best practices and recommendations\n\
         - Industry trends and analysis\n\
         - Practical implementation strategies\n\n\
         ## Main Content\n\nThe field of {topic} has evolved significantly in \
         recent years. Understanding these developments is crucial for staying \
         competitive in today's market.\n\n\
         ### Understanding {topic}\n\nOur analysis shows that {topic} plays a \
         vital role in modern business operations.\n\n\
         ### Implementation Strategies\n\nWhen implementing solutions related \
         to {topic}, consider the following:\n\n\
         1. Thorough planning and research\n\
         2. Stakeholder engagement\n\
         3. Phased rollout approach\n\
         4. Continuous monitoring and optimization\n\n\
         ### Future Outlook\n\nLooking ahead, {topic} will continue to shape \
         the industry landscape. Organizations that adapt quickly will \
         maintain their competitive advantage.\n\n\
         ## Conclusion\n\nIn summary, {topic} represents a significant \
         opportunity for growth and innovation."
    )
}
