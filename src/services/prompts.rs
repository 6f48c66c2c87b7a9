/// The two chat prompts built for one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    pub summary: String,
    pub article: String,
}

const PERSIAN: &str = "fa";

/// Persian keywords get native-language templates; every other language gets
/// the English template with an instruction to answer in `language`.
#[must_use]
pub fn build_prompts(language: &str, extract: &str) -> Prompts {
    if language == PERSIAN {
        return Prompts {
            summary: format!("متن زیر را به زبان ساده توضیح بده:\n\n{extract}"),
            article: format!("یک مقاله کامل و خوانا درباره متن زیر بنویس:\n\n{extract}"),
        };
    }

    Prompts {
        summary: format!(
            "Explain the following text. Reply in the language with ISO 639-1 code \"{language}\".\n\n{extract}"
        ),
        article: format!(
            "Write an article about the following text. Reply in the language with ISO 639-1 code \"{language}\".\n\n{extract}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persian_uses_native_templates() {
        let prompts = build_prompts("fa", "تهران پایتخت ایران است.");
        assert!(prompts.summary.starts_with("متن زیر"));
        assert!(prompts.article.starts_with("یک مقاله"));
        assert!(prompts.summary.ends_with("تهران پایتخت ایران است."));
        assert!(!prompts.summary.contains("ISO 639-1"));
    }

    #[test]
    fn other_languages_use_generic_template() {
        let prompts = build_prompts("de", "Berlin ist die Hauptstadt.");
        assert!(prompts.summary.starts_with("Explain the following text."));
        assert!(prompts.article.starts_with("Write an article"));
        assert!(prompts.summary.contains("\"de\""));
        assert!(prompts.article.ends_with("Berlin ist die Hauptstadt."));
    }
}
