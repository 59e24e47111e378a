//! Qualified-name conversion between Clark notation and prefixed QNames.
//!
//! SOAP 1.2 fault codes are qualified names. In memory they are carried in
//! Clark notation (`{namespace-uri}local`), which needs no prefix table; on
//! the wire they must be printed as `prefix:local` against the namespace
//! bindings of the enclosing document. This module converts in both
//! directions and invents synthetic prefixes (`s0`, `s1`, ...) when the
//! enclosing context has no binding for a needed namespace.

use std::collections::BTreeMap;

use tracing::{debug, warn};
use xmltree::Namespace;

/// Split a Clark-notation qualified name into `(namespace, local)`.
///
/// Returns `None` for anything that is not `{ns}local`, in which case the
/// input is a plain token (or already a prefixed QName) and passes through
/// serialization unchanged.
pub fn split_clark(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix('{')?;
    let end = rest.find('}')?;
    Some((&rest[..end], &rest[end + 1..]))
}

/// Prefix bindings for one serialize call.
///
/// Holds a borrowed view of the parent element's in-scope bindings plus the
/// prefixes this call has allocated itself. The scope lives for exactly one
/// serialize call, so every code and subcode written during that call shares
/// one allocation table and synthetic prefixes cannot collide. Allocated
/// declarations are read back at the end and written as `xmlns:` attributes
/// on the emitted fault element.
#[derive(Debug)]
pub struct PrefixScope<'a> {
    parent: Option<&'a Namespace>,
    local: BTreeMap<String, String>,
}

impl<'a> PrefixScope<'a> {
    /// Create a scope over the parent element's namespace bindings.
    pub fn new(parent: Option<&'a Namespace>) -> Self {
        Self {
            parent,
            local: BTreeMap::new(),
        }
    }

    /// Rewrite a Clark-notation name as a prefixed QName.
    ///
    /// Non-Clark input is returned unchanged. Otherwise an existing binding
    /// is reused, checking parent bindings before prefixes allocated earlier
    /// in this scope. Failing both, the smallest free synthetic prefix
    /// `s<i>` is allocated and recorded.
    pub fn to_prefixed(&mut self, text: &str) -> String {
        let Some((namespace, local)) = split_clark(text) else {
            return text.to_string();
        };
        let prefix = self.prefix_for(namespace);
        format!("{prefix}:{local}")
    }

    /// Look up or allocate a prefix for `namespace`.
    pub fn prefix_for(&mut self, namespace: &str) -> String {
        if let Some(prefix) = self.lookup(namespace) {
            return prefix.to_string();
        }
        self.allocate(namespace)
    }

    /// Prefixes allocated by this scope, mapped to their namespaces.
    pub fn declarations(&self) -> &BTreeMap<String, String> {
        &self.local
    }

    /// Consume the scope, yielding the allocated declarations.
    pub fn into_declarations(self) -> BTreeMap<String, String> {
        self.local
    }

    fn lookup(&self, namespace: &str) -> Option<&str> {
        // The default (empty) prefix cannot qualify a QName, so it is never
        // reused even when bound to the right namespace.
        let in_parent = self.parent.and_then(|parent| {
            parent
                .0
                .iter()
                .find(|(prefix, uri)| !prefix.is_empty() && uri.as_str() == namespace)
                .map(|(prefix, _)| prefix.as_str())
        });
        in_parent.or_else(|| {
            self.local
                .iter()
                .find(|(_, uri)| uri.as_str() == namespace)
                .map(|(prefix, _)| prefix.as_str())
        })
    }

    fn allocate(&mut self, namespace: &str) -> String {
        let mut i: usize = 0;
        loop {
            let candidate = format!("s{i}");
            let in_parent = self
                .parent
                .map_or(false, |parent| parent.0.contains_key(&candidate));
            if !in_parent && !self.local.contains_key(&candidate) {
                debug!(prefix = %candidate, namespace, "allocated synthetic namespace prefix");
                self.local.insert(candidate.clone(), namespace.to_string());
                return candidate;
            }
            i += 1;
        }
    }
}

/// Resolve a prefixed QName back to Clark notation.
///
/// Input without a `:` is returned unchanged. A prefix that does not resolve
/// in `bindings` also passes through verbatim, preserving the raw token for
/// the caller to inspect rather than dropping or rejecting it.
pub fn to_qualified(text: &str, bindings: Option<&Namespace>) -> String {
    let Some((prefix, local)) = text.split_once(':') else {
        return text.to_string();
    };
    if prefix.is_empty() {
        return text.to_string();
    }
    match bindings.and_then(|ns| ns.get(prefix)) {
        Some(uri) if !uri.is_empty() => format!("{{{uri}}}{local}"),
        _ => {
            warn!(prefix, "unresolvable namespace prefix, passing QName through verbatim");
            text.to_string()
        }
    }
}
