//! Prompt template catalogs.
//!
//! Catalogs can come from a TOML file (one table per domain, one array per
//! category) or from the built-in defaults. Built-ins cover the three corpus
//! domains plus a generic fallback.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A single prompt template with `{placeholder}` slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Template text with `{name}` placeholders
    pub text: String,
    /// Rotation category (perspective, tone, hook, api, ...)
    pub category: String,
    /// Domain the template belongs to
    pub domain: String,
}

impl PromptTemplate {
    #[must_use]
    pub fn new(text: impl Into<String>, category: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            domain: domain.into(),
        }
    }

    /// Substitute `{key}` placeholders with the provided values.
    /// Unknown placeholders are left in place.
    #[must_use]
    pub fn render(&self, values: &[(&str, &str)]) -> String {
        let mut out = self.text.clone();
        for (key, value) in values {
            out = out.replace(&format!("{{{key}}}"), value);
        }
        out
    }
}

/// Load a domain's catalog from TOML text.
///
/// Expected shape: `[domain]` tables whose entries are arrays of template
/// strings keyed by category. Non-array entries are skipped. A missing
/// domain table falls back to the built-in catalog.
pub fn catalog_from_toml_str(domain: &str, toml_text: &str) -> Result<Vec<PromptTemplate>> {
    let value: toml::Value = toml::from_str(toml_text)?;

    let Some(table) = value.get(domain).and_then(toml::Value::as_table) else {
        log::debug!("Domain {domain} not in catalog, using built-ins");
        return Ok(builtin_catalog(domain));
    };

    let mut templates = Vec::new();
    for (category, entry) in table {
        let Some(items) = entry.as_array() else {
            continue;
        };
        for item in items {
            if let Some(text) = item.as_str() {
                templates.push(PromptTemplate::new(text, category.as_str(), domain));
            }
        }
    }

    Ok(templates)
}

/// Built-in catalog for a domain; unknown domains get the generic set
#[must_use]
pub fn builtin_catalog(domain: &str) -> Vec<PromptTemplate> {
    let entries: &[(&str, &str)] = match domain {
        "asm" => &[
            ("Write assembly code to {action}", "perspective"),
            ("Implement {feature} in 65816 assembly", "perspective"),
            ("Show how to {action} using SNES hardware", "perspective"),
            ("Optimize this routine to {goal}", "tone"),
            ("Refactor {routine} for better {quality}", "tone"),
            ("Debug this code that {issue}", "tone"),
            ("Explain step-by-step how to {task}", "complexity"),
            ("Write production-quality code for {feature}", "complexity"),
            ("Provide concise reference code for {feature}", "complexity"),
            (
                "Implement {feature} for dungeon context using {registers}",
                "context",
            ),
            ("Write {routine} that interacts with PPU/DMA", "context"),
            ("Create NMI-safe code for {feature}", "context"),
            ("Implement {feature} using only {n} bytes of RAM", "constraint"),
            ("Write {routine} that fits in bank ${bank}", "constraint"),
            ("Optimize {routine} for minimal CPU cycles", "constraint"),
            ("Compare different approaches for {problem}", "comparison"),
            (
                "Show vanilla ALTTP code vs optimized version for {feature}",
                "comparison",
            ),
            (
                "Explain trade-offs between {approach1} and {approach2}",
                "comparison",
            ),
        ],
        "oracle" => &[
            ("Explain how Oracle hooks {vanilla_routine}", "hook"),
            ("Show the JSL hook for {feature} in Oracle", "hook"),
            (
                "Compare vanilla vs Oracle implementation of {system}",
                "hook",
            ),
            ("How to add {feature} to your ROM hack", "technique"),
            ("Explain the ROM hacking technique for {feature}", "technique"),
            ("Show bank allocation strategy for {feature}", "technique"),
            ("Why does Oracle use bank ${bank} for {feature}?", "integration"),
            ("How does {system} integrate with {other_system}?", "integration"),
            ("Explain the call graph for {feature}", "integration"),
            ("How to test {modification} in-game", "testing"),
            ("What edge cases should be tested for {feature}?", "testing"),
            (
                "Verify {feature} works correctly with vanilla mechanics",
                "testing",
            ),
            ("What other ways could {feature} be implemented?", "alternatives"),
            (
                "Compare pushpc/pullpc vs org for {modification}",
                "alternatives",
            ),
            ("Discuss trade-offs of {approach} for {feature}", "alternatives"),
        ],
        "cpp" => &[
            ("Use YAZE API to {action}", "api"),
            ("Implement {feature} using {yaze_class}", "api"),
            ("Show YAZE workflow for {task}", "api"),
            ("Write production-quality C++ for {feature}", "quality"),
            (
                "Refactor this code with proper const correctness for {feature}",
                "quality",
            ),
            ("Add error handling to {feature}", "quality"),
            ("Explain the algorithm for {operation} in YAZE", "algorithm"),
            ("Optimize {routine} for time complexity", "algorithm"),
            ("Show efficient implementation of {data_structure}", "algorithm"),
            ("How does {class} integrate with ROM editor?", "integration"),
            ("Connect {feature} to graphics pipeline", "integration"),
            (
                "Implement {feature} that works with existing {system}",
                "integration",
            ),
        ],
        _ => &[
            ("Explain how to {action}", "generic"),
            ("Implement {feature}", "generic"),
            ("Show code for {task}", "generic"),
            ("Optimize {feature} for {goal}", "generic"),
        ],
    };

    entries
        .iter()
        .map(|(text, category)| PromptTemplate::new(*text, *category, domain))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_catalog_sizes() {
        assert_eq!(builtin_catalog("asm").len(), 18);
        assert_eq!(builtin_catalog("oracle").len(), 15);
        assert_eq!(builtin_catalog("cpp").len(), 12);
        assert_eq!(builtin_catalog("text").len(), 4);
    }

    #[test]
    fn render_substitutes_placeholders() {
        let template = PromptTemplate::new(
            "Write {routine} that fits in bank ${bank}",
            "constraint",
            "asm",
        );
        let rendered = template.render(&[("routine", "a checksum loop"), ("bank", "2F")]);
        assert_eq!(rendered, "Write a checksum loop that fits in bank $2F");
    }

    #[test]
    fn render_leaves_unknown_placeholders() {
        let template = PromptTemplate::new("Implement {feature}", "generic", "text");
        assert_eq!(template.render(&[]), "Implement {feature}");
    }

    #[test]
    fn toml_catalog_parses_arrays_per_category() {
        let toml_text = r#"
[asm]
perspective = ["Write assembly to {action}", "Implement {feature}"]
tone = ["Debug this code that {issue}"]
notes = "not a list, skipped"
"#;
        let templates = catalog_from_toml_str("asm", toml_text).expect("parse");
        assert_eq!(templates.len(), 3);
        assert!(templates
            .iter()
            .all(|t| t.domain == "asm" && !t.text.is_empty()));
        assert_eq!(
            templates
                .iter()
                .filter(|t| t.category == "perspective")
                .count(),
            2
        );
    }

    #[test]
    fn missing_domain_falls_back_to_builtins() {
        let templates = catalog_from_toml_str("oracle", "[asm]\ntone = [\"x\"]\n").expect("parse");
        assert_eq!(templates.len(), 15);
    }

    #[test]
    fn templates_deserialize_from_json() {
        let json = r#"{"text": "Implement {feature}", "category": "generic", "domain": "text"}"#;
        let template: PromptTemplate = serde_json::from_str(json).expect("deserialize");
        assert_eq!(template, PromptTemplate::new("Implement {feature}", "generic", "text"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(catalog_from_toml_str("asm", "[asm\nbroken").is_err());
    }
}
