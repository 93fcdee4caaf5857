//! Identifier and literal helpers.

/// Java reserved words, including the literals `true`, `false` and `null`.
const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "_",
    // Literals
    "true", "false", "null",
];

/// Check if a name is a Java reserved word.
pub fn is_java_keyword(name: &str) -> bool {
    JAVA_KEYWORDS.contains(&name)
}

/// Whether `c` may start a Java identifier.
pub fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Whether `c` may appear inside a Java identifier.
pub fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Validate that a name is a usable Java identifier.
/// Returns None if valid, Some(reason) if invalid.
pub fn validate_identifier(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Some("name cannot be empty"),
        Some(c) if !is_identifier_start(c) => {
            return Some("name must start with a letter, underscore or dollar sign");
        }
        Some(_) => {}
    }

    if !chars.all(is_identifier_part) {
        return Some("name must contain only letters, digits, underscores and dollar signs");
    }

    if is_java_keyword(name) {
        return Some("name is a Java reserved word");
    }

    None
}

const ESCAPED: &str = "\u{8}\t\n\u{c}\r\"'\\";
const ESCAPE_MACROS: &str = "btnfr\"'\\";

/// Quote `s` as a Java literal delimited by `quote`.
///
/// Characters outside printable ASCII become `\uXXXX` escapes (UTF-16 code
/// units). The quote character that is not the delimiter is left alone.
pub fn quotify(quote: char, s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        if let Some(idx) = ESCAPED.chars().position(|e| e == c) {
            if (quote == '"' && c == '\'') || (quote == '\'' && c == '"') {
                out.push(c);
            } else {
                out.push('\\');
                out.extend(ESCAPE_MACROS.chars().nth(idx));
            }
        } else if c < '\u{20}' || c > '\u{7e}' {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        } else {
            out.push(c);
        }
    }
    out.push(quote);
    out
}
