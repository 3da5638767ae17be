/// Content generator
///
/// Turns a topic into publishable copy, hashtags and a visual prompt.
/// [`TemplateGenerator`] is a deterministic template; other generators can be
/// injected into the scheduler through [`ContentGenerator`].
use crate::models::{GenerateRequest, GeneratedContent};

pub const MIN_LENGTH: usize = 80;
pub const MAX_LENGTH: usize = 400;
pub const DEFAULT_LENGTH: usize = 150;
pub const MAX_HASHTAGS: usize = 8;

const NEUTRAL_STYLE: &str = "tono neutro y coherente";

pub trait ContentGenerator: Send + Sync {
    fn generate(&self, request: &GenerateRequest) -> GeneratedContent;
}

/// Per-account tone and hashtag tables
#[derive(Debug, Clone, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn new() -> Self {
        Self
    }

    fn account_style(account: &str) -> Option<&'static str> {
        match account {
            "wavwearevision" => Some("tono institucional, reflexivo y estratégico"),
            "vibecodinglatam" => Some("tono innovador, optimista y tecnológico"),
            "consdelrosario" => Some("tono empático, emocional y humano"),
            "felguetaedwards" => Some("tono inspirador, introspectivo y honesto"),
            _ => None,
        }
    }

    fn account_hashtags(account: &str) -> &'static [&'static str] {
        match account {
            "vibecodinglatam" => &["#IA", "#Innovacion", "#Comunidad"],
            "wavwearevision" => &["#Liderazgo", "#Cultura", "#Proposito"],
            "consdelrosario" => &["#Psicologia", "#Autenticidad", "#Bienestar"],
            "felguetaedwards" => &["#MasculinidadConsciente", "#Reflexion", "#Propósito"],
            _ => &[],
        }
    }
}

/// Length bounds for generated copy
pub fn clamp_length(length: Option<usize>) -> usize {
    length.unwrap_or(DEFAULT_LENGTH).clamp(MIN_LENGTH, MAX_LENGTH)
}

/// "#" + keyword without spaces, first letter upper-cased and the rest lower
fn hashtag(keyword: &str) -> Option<String> {
    let compact: String = keyword.chars().filter(|c| !c.is_whitespace()).collect();
    let mut chars = compact.chars();
    let first = chars.next()?;
    Some(format!(
        "#{}{}",
        first.to_uppercase(),
        chars.as_str().to_lowercase()
    ))
}

/// Fit `base` + `detail` into `length` characters, ellipsizing on overflow
fn fit_copy(base: &str, detail: &str, length: usize) -> String {
    let full = format!("{}{}", base, detail);
    if full.chars().count() <= length {
        return full;
    }
    let mut truncated: String = full.chars().take(length.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

impl ContentGenerator for TemplateGenerator {
    fn generate(&self, request: &GenerateRequest) -> GeneratedContent {
        let topic = request.topic.trim();
        let voice = request.brand_voice.as_deref().unwrap_or("").trim();
        let account = request
            .account
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_lowercase();
        let keywords: Vec<&str> = request
            .keywords
            .iter()
            .flatten()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();
        let length = clamp_length(request.length);

        let style = match Self::account_style(&account) {
            Some(style) => style.to_string(),
            None if !voice.is_empty() => format!("tono {}", voice),
            None => NEUTRAL_STYLE.to_string(),
        };

        let base = format!("{} ({}).", topic, style);
        let detail = if keywords.is_empty() {
            String::new()
        } else {
            format!(" {}", keywords.join(", "))
        };
        let text = fit_copy(&base, &detail, length).trim().to_string();

        let mut hashtags: Vec<String> = keywords.iter().filter_map(|k| hashtag(k)).collect();
        hashtags.extend(
            Self::account_hashtags(&account)
                .iter()
                .map(|tag| tag.to_string()),
        );
        hashtags.truncate(MAX_HASHTAGS);

        let brand = if account.is_empty() {
            "la marca"
        } else {
            account.as_str()
        };
        let visual_prompt = format!(
            "Arte conceptual del tema '{}', estilo coherente con {}, {}, composición limpia, color balanceado, formato cuadrado 1:1.",
            topic, brand, style
        );

        GeneratedContent {
            text,
            hashtags,
            visual_prompt,
        }
    }
}
