//! Static icon catalog for the AI tools directory and the substring
//! matcher that picks an entry for a tool row.

mod updater;

pub use updater::{IconRunReport, IconUpdater, RowAction, RowOutcome};

use once_cell::sync::Lazy;

/// All tool logos come from the same pinned CDN path.
pub const ICON_CDN_BASE: &str = "https://cdn.jsdelivr.net/npm/simple-icons@v10/icons";

#[derive(Debug)]
pub struct IconEntry {
    /// Catalog key, also the name shown in run reports.
    pub name: &'static str,
    /// Substrings that select this entry.
    pub keywords: &'static [&'static str],
    /// simple-icons slug under the CDN base path.
    pub slug: &'static str,
}

impl IconEntry {
    pub fn url(&self) -> String {
        format!("{ICON_CDN_BASE}/{}.svg", self.slug)
    }
}

/// Fallback when nothing in the catalog matches a tool.
pub static DEFAULT_ICON: Lazy<IconEntry> = Lazy::new(|| IconEntry {
    name: "ai-brain",
    keywords: &[],
    slug: "probot",
});

///// Curated keyword catalog. Order matters: earlier entries win when
/// several keywords would match the same field.
pub static ICON_CATALOG: Lazy<Vec<IconEntry>> = Lazy::new(|| {
    vec![
        IconEntry { name: "chatgpt", keywords: &["chatgpt", "gpt-4", "gpt4", "openai"], slug: "openai" },
        IconEntry { name: "claude", keywords: &["claude", "anthropic"], slug: "anthropic" },
        IconEntry { name: "gemini", keywords: &["gemini", "bard", "google ai"], slug: "googlegemini" },
        IconEntry { name: "midjourney", keywords: &["midjourney"], slug: "midjourney" },
        IconEntry { name: "huggingface", keywords: &["hugging face", "huggingface"], slug: "huggingface" },
        IconEntry { name: "copilot", keywords: &["copilot", "github"], slug: "githubcopilot" },
        IconEntry { name: "perplexity", keywords: &["perplexity"], slug: "perplexity" },
        IconEntry { name: "notion", keywords: &["notion"], slug: "notion" },
        IconEntry { name: "canva", keywords: &["canva"], slug: "canva" },
        IconEntry { name: "figma", keywords: &["figma"], slug: "figma" },
        IconEntry { name: "grammarly", keywords: &["grammarly", "grammar"], slug: "grammarly" },
        IconEntry { name: "jasper", keywords: &["jasper"], slug: "jasper" },
        IconEntry { name: "zapier", keywords: &["zapier", "automation"], slug: "zapier" },
        IconEntry { name: "slack", keywords: &["slack"], slug: "slack" },
        IconEntry { name: "discord", keywords: &["discord"], slug: "discord" },
        IconEntry { name: "replit", keywords: &["replit"], slug: "replit" },
        IconEntry { name: "vercel", keywords: &["vercel", "v0"], slug: "vercel" },
        IconEntry { name: "wordpress", keywords: &["wordpress"], slug: "wordpress" },
        IconEntry { name: "shopify", keywords: &["shopify"], slug: "shopify" },
        IconEntry { name: "mailchimp", keywords: &["mailchimp", "email marketing"], slug: "mailchimp" },
        IconEntry { name: "airtable", keywords: &["airtable"], slug: "airtable" },
        IconEntry { name: "trello", keywords: &["trello"], slug: "trello" },
        IconEntry { name: "stability", keywords: &["stable diffusion", "stability"], slug: "stabilityai" },
        IconEntry { name: "runway", keywords: &["runway"], slug: "runwayml" },
        IconEntry { name: "elevenlabs", keywords: &["elevenlabs", "voice"], slug: "elevenlabs" },
        IconEntry { name: "kaggle", keywords: &["kaggle"], slug: "kaggle" },
        IconEntry { name: "tensorflow", keywords: &["tensorflow"], slug: "tensorflow" },
        IconEntry { name: "pytorch", keywords: &["pytorch"], slug: "pytorch" },
    ]
});

fn match_in(field: &str) -> Option<&'static IconEntry> {
    let haystack = field.to_lowercase();
    ICON_CATALOG
        .iter()
        .find(|entry| entry.keywords.iter().any(|kw| haystack.contains(kw)))
}

/// Pick the best icon for a tool row by substring matching the name first,
/// then slug, category and description. Always returns an entry; the
/// "ai-brain" default covers tools nothing matches.
pub fn find_best_icon(
    name: &str,
    slug: &str,
    category: &str,
    description: Option<&str>,
) -> &'static IconEntry {
    match_in(name)
        .or_else(|| match_in(slug))
        .or_else(|| match_in(category))
        .or_else(|| description.and_then(match_in))
        .unwrap_or(&*DEFAULT_ICON)
}
