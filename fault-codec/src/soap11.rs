//! SOAP 1.1 fault codec
//!
//! The SOAP 1.1 fault shape is flat: a `Fault` element in the target
//! namespace with three unqualified children, `faultcode`, `faultstring`
//! and `detail`. There is no subcode concept; a value's `subcodes` are
//! ignored on this wire format.

use tracing::debug;
use xmltree::{Element, EmitterConfig, Namespace, XMLNode};

use crate::codec::{FaultCodec, FAULT_TYPE_NAME};
use crate::error::{FaultError, FaultResult};
use crate::schema::SchemaRegistry;
use crate::value::FaultValue;

/// Codec for the flat SOAP 1.1 fault shape.
#[derive(Debug, Default, Clone, Copy)]
pub struct Soap11FaultCodec;

impl Soap11FaultCodec {
    pub fn new() -> Self {
        Self
    }
}

impl FaultCodec for Soap11FaultCodec {
    fn serialize(
        &self,
        value: &FaultValue,
        target_namespace: &str,
        parent: &mut Element,
        name: Option<&str>,
    ) -> FaultResult<()> {
        if !value.subcodes.is_empty() {
            debug!(
                count = value.subcodes.len(),
                "SOAP 1.1 has no subcode concept, dropping subcodes"
            );
        }

        let mut fault = Element::new(name.unwrap_or(FAULT_TYPE_NAME));
        fault.namespace = Some(target_namespace.to_string());
        match parent_prefix_for(parent, target_namespace) {
            Some(prefix) => fault.prefix = Some(prefix),
            None => {
                // No binding in scope: declare the target namespace as the
                // default namespace of the fault element itself.
                let mut decls = Namespace::empty();
                decls.put("", target_namespace);
                fault.namespaces = Some(decls);
            }
        }

        for (child_name, text) in [
            ("faultcode", value.primary_code.as_str()),
            ("faultstring", value.reason.as_str()),
            ("detail", value.detail.as_str()),
        ] {
            fault.children.push(XMLNode::Element(text_element(child_name, text)));
        }

        parent.children.push(XMLNode::Element(fault));
        Ok(())
    }

    fn deserialize(&self, element: &Element) -> FaultResult<FaultValue> {
        let primary_code = element
            .get_child("faultcode")
            .ok_or(FaultError::MissingElement("faultcode"))?
            .get_text()
            .map(|t| t.into_owned())
            .unwrap_or_default();
        let reason = element
            .get_child("faultstring")
            .ok_or(FaultError::MissingElement("faultstring"))?
            .get_text()
            .map(|t| t.into_owned())
            .unwrap_or_default();

        let detail = match element.get_child("detail") {
            None => String::new(),
            Some(detail_el) => {
                let has_element_children = detail_el
                    .children
                    .iter()
                    .any(|node| matches!(node, XMLNode::Element(_)));
                if has_element_children {
                    // Structured detail payloads round-trip as an opaque
                    // XML blob rather than being flattened to text.
                    write_children(detail_el)?
                } else {
                    detail_el
                        .get_text()
                        .map(|t| t.into_owned())
                        .unwrap_or_default()
                }
            }
        };

        Ok(FaultValue::new(primary_code, reason, detail))
    }

    fn emit_schema(&self, registry: &mut dyn SchemaRegistry) -> FaultResult<()> {
        let mut sequence = Element::new("sequence");
        // The schema member is named `message` even though the wire element
        // is `faultstring`; existing schema consumers rely on this name.
        for member in ["detail", "message"] {
            sequence
                .children
                .push(XMLNode::Element(string_member(member)));
        }

        let mut complex_type = Element::new("complexType");
        complex_type
            .attributes
            .insert("name".to_string(), FAULT_TYPE_NAME.to_string());
        complex_type.children.push(XMLNode::Element(sequence));
        registry.add_complex_type(FAULT_TYPE_NAME, complex_type);

        let mut top_level = Element::new("element");
        top_level
            .attributes
            .insert("name".to_string(), "ExceptionFaultType".to_string());
        top_level
            .attributes
            .insert("type".to_string(), format!("tns:{FAULT_TYPE_NAME}"));
        registry.add_element(FAULT_TYPE_NAME, top_level);

        Ok(())
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

fn text_element(name: &str, text: &str) -> Element {
    let mut el = Element::new(name);
    if !text.is_empty() {
        el.children.push(XMLNode::Text(text.to_string()));
    }
    el
}

fn string_member(name: &str) -> Element {
    let mut el = Element::new("element");
    el.attributes.insert("name".to_string(), name.to_string());
    el.attributes
        .insert("type".to_string(), "xs:string".to_string());
    el
}

/// Serialize every child node of `element` back to markup, in order.
fn write_children(element: &Element) -> FaultResult<String> {
    let mut buf: Vec<u8> = Vec::new();
    for node in &element.children {
        match node {
            XMLNode::Element(child) => {
                let config = EmitterConfig::new()
                    .write_document_declaration(false)
                    .perform_indent(false);
                child
                    .write_with_config(&mut buf, config)
                    .map_err(|e| FaultError::Write(e.to_string()))?;
            }
            XMLNode::Text(text) | XMLNode::CData(text) => buf.extend_from_slice(text.as_bytes()),
            XMLNode::Comment(_) | XMLNode::ProcessingInstruction(..) => {}
        }
    }
    String::from_utf8(buf).map_err(|e| FaultError::Write(e.to_string()))
}
