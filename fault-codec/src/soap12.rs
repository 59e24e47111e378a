//! SOAP 1.2 fault codec
//!
//! SOAP 1.2 faults are hierarchical: the fault code is a qualified name
//! carried in `Code/Value`, refined by a right-leaning chain of nested
//! `Subcode` elements, each one level deeper than the previous. Reason text
//! is language-tagged, and the fault names the emitting node and role.
//!
//! Schema emission is a known gap of this codec and fails explicitly.

use xmltree::{Element, Namespace, XMLNode};

use crate::codec::{FaultCodec, FAULT_TYPE_NAME};
use crate::error::{FaultError, FaultResult};
use crate::qname::{to_qualified, PrefixScope};
use crate::schema::SchemaRegistry;
use crate::value::FaultValue;

/// SOAP 1.2 envelope namespace.
pub const NS_SOAP12_ENV: &str = "http://www.w3.org/2003/05/soap-envelope";

/// Well-known URI identifying this endpoint as the ultimate receiver node.
pub const NODE_ULTIMATE_RECEIVER: &str =
    "http://www.w3.org/2003/05/soap-envelope/node/ultimateReceiver";

/// Well-known URI for the ultimate receiver role.
pub const ROLE_ULTIMATE_RECEIVER: &str =
    "http://www.w3.org/2003/05/soap-envelope/role/ultimateReceiver";

const DEFAULT_REASON_LANG: &str = "en";

/// Codec for the hierarchical SOAP 1.2 fault shape.
///
/// Reason text carries a single language tag, `en` unless overridden with
/// [`Soap12FaultCodec::with_reason_lang`]. Multi-language reasons and
/// structured detail content are not supported.
#[derive(Debug, Clone)]
pub struct Soap12FaultCodec {
    reason_lang: String,
}

impl Default for Soap12FaultCodec {
    fn default() -> Self {
        Self {
            reason_lang: DEFAULT_REASON_LANG.to_string(),
        }
    }
}

impl Soap12FaultCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the `xml:lang` tag written on `Reason/Text`.
    pub fn with_reason_lang(mut self, lang: impl Into<String>) -> Self {
        self.reason_lang = lang.into();
        self
    }
}

impl FaultCodec for Soap12FaultCodec {
    fn serialize(
        &self,
        value: &FaultValue,
        target_namespace: &str,
        parent: &mut Element,
        name: Option<&str>,
    ) -> FaultResult<()> {
        // One scope per call: every code and subcode shares the allocation
        // table, so synthetic prefixes stay distinct across the whole fault.
        let mut scope = PrefixScope::new(parent.namespaces.as_ref());
        let primary = scope.to_prefixed(&value.primary_code);
        let prefixed_subcodes: Vec<String> = value
            .subcodes
            .iter()
            .map(|code| scope.to_prefixed(code))
            .collect();
        let env = scope.prefix_for(NS_SOAP12_ENV);

        // Build the Subcode chain innermost-first so each level owns the next.
        let mut tail: Option<Element> = None;
        for text in prefixed_subcodes.into_iter().rev() {
            let mut subcode = envelope_element("Subcode", &env);
            subcode
                .children
                .push(XMLNode::Element(value_element(&env, &text)));
            if let Some(inner) = tail.take() {
                subcode.children.push(XMLNode::Element(inner));
            }
            tail = Some(subcode);
        }

        let mut code = envelope_element("Code", &env);
        code.children
            .push(XMLNode::Element(value_element(&env, &primary)));
        if let Some(chain) = tail {
            code.children.push(XMLNode::Element(chain));
        }

        let mut fault = Element::new(name.unwrap_or(FAULT_TYPE_NAME));
        fault.namespace = Some(target_namespace.to_string());
        let mut decls = Namespace::empty();
        match parent_prefix_for(parent, target_namespace) {
            Some(prefix) => fault.prefix = Some(prefix),
            None => {
                decls.put("", target_namespace);
            }
        }
        // Prefixes invented during this call are scoped to the fault element.
        for (prefix, uri) in scope.into_declarations() {
            decls.put(prefix, uri);
        }
        if !decls.0.is_empty() {
            fault.namespaces = Some(decls);
        }

        fault.children.push(XMLNode::Element(code));

        let mut reason_text = envelope_element("Text", &env);
        reason_text
            .attributes
            .insert("xml:lang".to_string(), self.reason_lang.clone());
        if !value.reason.is_empty() {
            reason_text
                .children
                .push(XMLNode::Text(value.reason.clone()));
        }
        let mut reason = envelope_element("Reason", &env);
        reason.children.push(XMLNode::Element(reason_text));
        fault.children.push(XMLNode::Element(reason));

        fault.children.push(XMLNode::Element(text_element(
            "Node",
            &env,
            NODE_ULTIMATE_RECEIVER,
        )));
        fault.children.push(XMLNode::Element(text_element(
            "Role",
            &env,
            ROLE_ULTIMATE_RECEIVER,
        )));

        // Detail carries plain text only; typed detail content is not
        // supported by this codec.
        let mut detail = envelope_element("Detail", &env);
        detail
            .children
            .push(XMLNode::Element(text_element("Text", &env, &value.detail)));
        fault.children.push(XMLNode::Element(detail));

        parent.children.push(XMLNode::Element(fault));
        Ok(())
    }

    fn deserialize(&self, element: &Element) -> FaultResult<FaultValue> {
        let bindings = element.namespaces.as_ref();

        // Walk Code, then each nested Subcode, one level at a time.
        let mut codes = Vec::new();
        let mut cursor = envelope_child(element, "Code");
        while let Some(level) = cursor {
            if let Some(value_el) = envelope_child(level, "Value") {
                let text = value_el
                    .get_text()
                    .map(|t| t.into_owned())
                    .unwrap_or_default();
                codes.push(to_qualified(&text, bindings));
            }
            cursor = envelope_child(level, "Subcode");
        }
        let mut codes = codes.into_iter();
        let primary_code = codes.next().unwrap_or_default();

        let reason = envelope_child(element, "Reason")
            .and_then(|reason| envelope_child(reason, "Text"))
            .and_then(|text| text.get_text())
            .map(|t| t.into_owned())
            .unwrap_or_default();

        let detail = envelope_child(element, "Detail")
            .and_then(|detail| envelope_child(detail, "Text"))
            .and_then(|text| text.get_text())
            .map(|t| t.into_owned())
            .unwrap_or_default();

        Ok(FaultValue {
            primary_code,
            subcodes: codes.collect(),
            reason,
            detail,
        })
    }

    fn emit_schema(&self, _registry: &mut dyn SchemaRegistry) -> FaultResult<()> {
        Err(FaultError::SchemaUnsupported("SOAP 1.2 faults"))
    }
}

/// Non-empty prefix already bound to `namespace` in the parent's scope.
fn parent_prefix_for(parent: &Element, namespace: &str) -> Option<String> {
    parent.namespaces.as_ref().and_then(|ns| {
        ns.0.iter()
            .find(|(prefix, uri)| !prefix.is_empty() && uri.as_str() == namespace)
            .map(|(prefix, _)| prefix.clone())
    })
}

fn envelope_element(name: &str, prefix: &str) -> Element {
    let mut el = Element::new(name);
    el.prefix = Some(prefix.to_string());
    el.namespace = Some(NS_SOAP12_ENV.to_string());
    el
}

fn text_element(name: &str, prefix: &str, text: &str) -> Element {
    let mut el = envelope_element(name, prefix);
    if !text.is_empty() {
        el.children.push(XMLNode::Text(text.to_string()));
    }
    el
}

/// A `Value` element carrying one prefixed code of the fault code chain.
fn value_element(prefix: &str, text: &str) -> Element {
    text_element("Value", prefix, text)
}

/// Child element lookup restricted to the SOAP 1.2 envelope namespace.
fn envelope_child<'e>(parent: &'e Element, name: &str) -> Option<&'e Element> {
    parent
        .children
        .iter()
        .filter_map(XMLNode::as_element)
        .find(|el| el.name == name && el.namespace.as_deref() == Some(NS_SOAP12_ENV))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaTable;

    fn serialize_into_fresh_parent(value: &FaultValue) -> Element {
        let codec = Soap12FaultCodec::new();
        let mut parent = Element::new("Body");
        codec
            .serialize(value, "urn:x", &mut parent, None)
            .unwrap();
        match parent.children.into_iter().next() {
            Some(XMLNode::Element(fault)) => fault,
            other => panic!("expected fault element, got {other:?}"),
        }
    }

    #[test]
    fn test_serialize_builds_right_leaning_subcode_chain() {
        let value = FaultValue::new("{urn:a}Primary", "boom", "").with_subcodes(vec![
            "{urn:b}First".to_string(),
            "{urn:c}Second".to_string(),
        ]);
        let fault = serialize_into_fresh_parent(&value);

        let code = envelope_child(&fault, "Code").unwrap();
        let code_value = envelope_child(code, "Value").unwrap();
        assert_eq!(code_value.get_text().as_deref(), Some("s0:Primary"));

        let first = envelope_child(code, "Subcode").unwrap();
        let first_value = envelope_child(first, "Value").unwrap();
        assert_eq!(first_value.get_text().as_deref(), Some("s1:First"));

        let second = envelope_child(first, "Subcode").unwrap();
        let second_value = envelope_child(second, "Value").unwrap();
        assert_eq!(second_value.get_text().as_deref(), Some("s2:Second"));
        assert!(envelope_child(second, "Subcode").is_none());
    }

    #[test]
    fn test_synthetic_prefixes_are_distinct_and_declared_once() {
        let value = FaultValue::new("{urn:a}A", "", "").with_subcodes(vec![
            "{urn:b}B".to_string(),
            "{urn:c}C".to_string(),
        ]);
        let fault = serialize_into_fresh_parent(&value);

        let decls = fault.namespaces.expect("declarations on the fault element");
        assert_eq!(decls.get("s0"), Some("urn:a"));
        assert_eq!(decls.get("s1"), Some("urn:b"));
        assert_eq!(decls.get("s2"), Some("urn:c"));
    }

    #[test]
    fn test_parent_prefix_is_reused_instead_of_synthetic() {
        let codec = Soap12FaultCodec::new();
        let mut parent = Element::new("Body");
        let mut ns = Namespace::empty();
        ns.put("e", "http://x");
        parent.namespaces = Some(ns);

        let value = FaultValue::new("{http://x}Sender", "", "");
        codec
            .serialize(&value, "urn:x", &mut parent, None)
            .unwrap();
        let fault = parent.children[0].as_element().unwrap();

        let code = envelope_child(fault, "Code").unwrap();
        let code_value = envelope_child(code, "Value").unwrap();
        assert_eq!(code_value.get_text().as_deref(), Some("e:Sender"));

        // No synthetic binding for http://x may appear on the fault.
        if let Some(decls) = &fault.namespaces {
            assert!(decls.0.values().all(|uri| uri != "http://x"));
        }
    }

    #[test]
    fn test_serialize_writes_reason_node_role_and_detail() {
        let value = FaultValue::new("Sender", "boom", "diagnostic");
        let fault = serialize_into_fresh_parent(&value);

        let reason_text = envelope_child(&fault, "Reason")
            .and_then(|r| envelope_child(r, "Text"))
            .unwrap();
        assert_eq!(reason_text.get_text().as_deref(), Some("boom"));
        assert_eq!(
            reason_text.attributes.get("xml:lang").map(String::as_str),
            Some("en")
        );

        let node = envelope_child(&fault, "Node").unwrap();
        assert_eq!(node.get_text().as_deref(), Some(NODE_ULTIMATE_RECEIVER));
        let role = envelope_child(&fault, "Role").unwrap();
        assert_eq!(role.get_text().as_deref(), Some(ROLE_ULTIMATE_RECEIVER));

        let detail_text = envelope_child(&fault, "Detail")
            .and_then(|d| envelope_child(d, "Text"))
            .unwrap();
        assert_eq!(detail_text.get_text().as_deref(), Some("diagnostic"));
    }

    #[test]
    fn test_reason_lang_is_configurable() {
        let codec = Soap12FaultCodec::new().with_reason_lang("fr");
        let mut parent = Element::new("Body");
        codec
            .serialize(&FaultValue::new("Sender", "zut", ""), "urn:x", &mut parent, None)
            .unwrap();
        let fault = parent.children[0].as_element().unwrap();
        let reason_text = envelope_child(fault, "Reason")
            .and_then(|r| envelope_child(r, "Text"))
            .unwrap();
        assert_eq!(
            reason_text.attributes.get("xml:lang").map(String::as_str),
            Some("fr")
        );
    }

    #[test]
    fn test_deserialize_resolves_prefixed_code_against_bindings() {
        let xml = concat!(
            r#"<env:Fault xmlns:env="http://www.w3.org/2003/05/soap-envelope" xmlns:t="urn:x">"#,
            r#"<env:Code><env:Value>env:Sender</env:Value></env:Code>"#,
            r#"<env:Reason><env:Text xml:lang="en">boom</env:Text></env:Reason>"#,
            r#"</env:Fault>"#
        );
        let element = Element::parse(xml.as_bytes()).unwrap();
        let codec = Soap12FaultCodec::new();
        let value = codec.deserialize(&element).unwrap();

        assert_eq!(
            value.primary_code,
            "{http://www.w3.org/2003/05/soap-envelope}Sender"
        );
        assert!(value.subcodes.is_empty());
        assert_eq!(value.reason, "boom");
        assert_eq!(value.detail, "");
    }

    #[test]
    fn test_deserialize_keeps_unresolvable_prefix_verbatim() {
        let xml = concat!(
            r#"<env:Fault xmlns:env="http://www.w3.org/2003/05/soap-envelope">"#,
            r#"<env:Code><env:Value>mystery:Sender</env:Value></env:Code>"#,
            r#"</env:Fault>"#
        );
        let element = Element::parse(xml.as_bytes()).unwrap();
        let value = Soap12FaultCodec::new().deserialize(&element).unwrap();
        assert_eq!(value.primary_code, "mystery:Sender");
    }

    #[test]
    fn test_deserialize_missing_code_degrades_to_empty() {
        let xml = concat!(
            r#"<env:Fault xmlns:env="http://www.w3.org/2003/05/soap-envelope">"#,
            r#"<env:Reason><env:Text xml:lang="en">boom</env:Text></env:Reason>"#,
            r#"</env:Fault>"#
        );
        let element = Element::parse(xml.as_bytes()).unwrap();
        let value = Soap12FaultCodec::new().deserialize(&element).unwrap();
        assert_eq!(value.primary_code, "");
        assert!(value.subcodes.is_empty());
        assert_eq!(value.reason, "boom");
    }

    #[test]
    fn test_emit_schema_is_unsupported_and_registers_nothing() {
        let codec = Soap12FaultCodec::new();
        let mut registry = SchemaTable::new();
        match codec.emit_schema(&mut registry) {
            Err(FaultError::SchemaUnsupported(_)) => {}
            other => panic!("expected SchemaUnsupported, got {other:?}"),
        }
        assert!(registry.is_empty());
    }
}
