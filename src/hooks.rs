use serde::{Deserialize, Serialize};

pub const UNKNOWN_HOOK: &str = "unknown";

const SEPARATORS: &[char] = &['-', '_', '/', '|'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookCategory {
    ProblemSolution,
    Testimonial,
    BeforeAfter,
    Ugc,
    Static,
    DirectCta,
}

impl HookCategory {
    /// Matching priority; the first category with a keyword hit wins.
    pub const ALL: [HookCategory; 6] = [
        HookCategory::ProblemSolution,
        HookCategory::Testimonial,
        HookCategory::BeforeAfter,
        HookCategory::Ugc,
        HookCategory::Static,
        HookCategory::DirectCta,
    ];

    pub fn label(self) -> &'static str {
        match self {
            HookCategory::ProblemSolution => "Problem/Solution",
            HookCategory::Testimonial => "Testimonial",
            HookCategory::BeforeAfter => "Before/After",
            HookCategory::Ugc => "UGC",
            HookCategory::Static => "Static",
            HookCategory::DirectCta => "Direct CTA",
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            HookCategory::ProblemSolution => &["problem", "solution"],
            HookCategory::Testimonial => &["testimonial", "review"],
            HookCategory::BeforeAfter => &["before", "after"],
            HookCategory::Ugc => &["ugc"],
            HookCategory::Static => &["static", "image"],
            HookCategory::DirectCta => &["direct", "cta"],
        }
    }

    pub fn detect(label: &str, name: &str) -> Option<Self> {
        let haystack = format!("{} {}", label, name).to_lowercase();
        Self::ALL.into_iter().find(|category| {
            category
                .keywords()
                .iter()
                .any(|keyword| haystack.contains(keyword))
        })
    }
}

/// Classifies a creative's hook label (falling back to its name) into the
/// fixed taxonomy, or the first token of the label when nothing matches.
pub fn label_hook(label: &str, name: &str) -> String {
    if label.trim().is_empty() && name.trim().is_empty() {
        return UNKNOWN_HOOK.to_string();
    }

    if let Some(category) = HookCategory::detect(label, name) {
        return category.label().to_string();
    }

    let source = if label.trim().is_empty() { name } else { label };
    first_token(source).unwrap_or_else(|| UNKNOWN_HOOK.to_string())
}

fn first_token(value: &str) -> Option<String> {
    value
        .split(|ch: char| ch.is_whitespace() || SEPARATORS.contains(&ch))
        .map(str::trim)
        .find(|token| !token.is_empty())
        .map(str::to_string)
}
