//! Language definitions for prompt building and comment handling
//!
//! Each recognized language carries its display name (used when addressing
//! the model) and the comment prefix the formatter strips or re-applies.
//! Unrecognized language tags resolve to a plaintext fallback.

use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct LanguageSpec {
    /// LSP `languageId` tag as reported by the editor
    pub id: &'static str,
    /// Human-readable name used in prompts
    pub name: &'static str,
    /// Line-comment marker for this language
    pub comment_prefix: &'static str,
    pub extensions: &'static [&'static str],
}

/// All recognized languages. Python is the only one with `#` comments;
/// everything else uses `//`, and unknown tags fall back to [`PLAINTEXT`].
pub static LANGUAGES: Lazy<Vec<LanguageSpec>> = Lazy::new(|| {
    vec![
        LanguageSpec {
            id: "javascript",
            name: "JavaScript",
            comment_prefix: "//",
            extensions: &["js", "mjs", "cjs"],
        },
        LanguageSpec {
            id: "typescript",
            name: "TypeScript",
            comment_prefix: "//",
            extensions: &["ts", "tsx"],
        },
        LanguageSpec {
            id: "python",
            name: "Python",
            comment_prefix: "#",
            extensions: &["py", "pyw"],
        },
        LanguageSpec {
            id: "java",
            name: "Java",
            comment_prefix: "//",
            extensions: &["java"],
        },
        LanguageSpec {
            id: "c",
            name: "C",
            comment_prefix: "//",
            extensions: &["c", "h"],
        },
        LanguageSpec {
            id: "cpp",
            name: "C++",
            comment_prefix: "//",
            extensions: &["cpp", "hpp", "cc", "cxx"],
        },
        LanguageSpec {
            id: "csharp",
            name: "C#",
            comment_prefix: "//",
            extensions: &["cs"],
        },
        LanguageSpec {
            id: "go",
            name: "Go",
            comment_prefix: "//",
            extensions: &["go"],
        },
        LanguageSpec {
            id: "rust",
            name: "Rust",
            comment_prefix: "//",
            extensions: &["rs"],
        },
        LanguageSpec {
            id: "php",
            name: "PHP",
            comment_prefix: "//",
            extensions: &["php"],
        },
        LanguageSpec {
            id: "ruby",
            name: "Ruby",
            comment_prefix: "//",
            extensions: &["rb"],
        },
        LanguageSpec {
            id: "swift",
            name: "Swift",
            comment_prefix: "//",
            extensions: &["swift"],
        },
        LanguageSpec {
            id: "kotlin",
            name: "Kotlin",
            comment_prefix: "//",
            extensions: &["kt", "kts"],
        },
    ]
});

/// Fallback for language tags the table does not know
pub static PLAINTEXT: LanguageSpec = LanguageSpec {
    id: "plaintext",
    name: "plaintext",
    comment_prefix: "//",
    extensions: &["txt"],
};

static ID_MAP: Lazy<HashMap<&'static str, &'static LanguageSpec>> =
    Lazy::new(|| LANGUAGES.iter().map(|lang| (lang.id, lang)).collect());

static EXT_MAP: Lazy<HashMap<&'static str, &'static LanguageSpec>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for lang in LANGUAGES.iter() {
        for ext in lang.extensions {
            map.insert(*ext, lang);
        }
    }
    map
});

/// Resolve a language tag to its spec, falling back to plaintext
pub fn lookup(tag: &str) -> &'static LanguageSpec {
    ID_MAP.get(tag).copied().unwrap_or(&PLAINTEXT)
}

/// Resolve a file path by extension, for documents opened without a tag
pub fn from_path(path: &str) -> &'static LanguageSpec {
    if let Some(ext) = path.rsplit('.').next() {
        if let Some(&lang) = EXT_MAP.get(ext) {
            return lang;
        }
    }
    &PLAINTEXT
}
