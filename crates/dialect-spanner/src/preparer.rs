//! Identifier quoting. Spanner uses backtick as both the open and close
//! delimiter; a name is quoted only when leaving it bare would change its
//! meaning or its case.

use bridgeql_core::Ident;

use crate::reserved_words;

/// The default collation name appears as a bare argument in DDL and must
/// never be quoted even though it is not lowercase-safe by the usual rules.
const COLLATION_EXEMPT: &str = "unicode";

pub fn quote(name: &str) -> String {
    if requires_quoting(name) {
        format!("`{name}`")
    } else {
        name.to_string()
    }
}

/// Strips one layer of backticks, the inverse of [`quote`] for any valid
/// identifier.
pub fn unquote(name: &str) -> &str {
    name.strip_prefix('`')
        .and_then(|inner| inner.strip_suffix('`'))
        .unwrap_or(name)
}

pub fn requires_quoting(name: &str) -> bool {
    if name == COLLATION_EXEMPT {
        return false;
    }
    if reserved_words::is_reserved(&name.to_lowercase()) {
        return true;
    }

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return true;
    }
    if name
        .chars()
        .any(|ch| !ch.is_ascii_alphanumeric() && ch != '_')
    {
        return true;
    }

    // Mixed case is quoted to preserve it against case folding.
    name.chars().any(|ch| ch.is_ascii_uppercase())
}

/// Renders an identifier from the IR: explicitly-quoted idents always get
/// delimiters, everything else goes through the quoting rules.
pub(crate) fn render_ident(ident: &Ident) -> String {
    if ident.quoted {
        format!("`{}`", ident.value)
    } else {
        quote(&ident.value)
    }
}
