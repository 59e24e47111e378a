//! The shared fault codec contract implemented once per protocol version

use xmltree::Element;

use crate::error::FaultResult;
use crate::schema::SchemaRegistry;
use crate::value::FaultValue;

/// Canonical fault type name, used as the registry key and as the default
/// element name when the caller supplies none.
pub const FAULT_TYPE_NAME: &str = "Fault";

/// One fault codec per wire format.
///
/// An external serializer selects the implementation matching the active
/// protocol version once, then drives it through this contract. The codecs
/// hold no per-call state: concurrent calls on independent values and parent
/// elements need no synchronization, but one parent element must not be
/// shared across concurrent `serialize` calls.
pub trait FaultCodec {
    /// Canonical type name of the fault shape (always [`FAULT_TYPE_NAME`]).
    fn type_name(&self) -> &'static str {
        FAULT_TYPE_NAME
    }

    /// Append the fault as a child element of `parent`, under
    /// `target_namespace`, named `name` or [`FaultCodec::type_name`] when
    /// `name` is `None`.
    fn serialize(
        &self,
        value: &FaultValue,
        target_namespace: &str,
        parent: &mut Element,
        name: Option<&str>,
    ) -> FaultResult<()>;

    /// Reconstruct a fault value from a received fault element.
    fn deserialize(&self, element: &Element) -> FaultResult<FaultValue>;

    /// Register this fault shape's schema fragments.
    fn emit_schema(&self, registry: &mut dyn SchemaRegistry) -> FaultResult<()>;
}
