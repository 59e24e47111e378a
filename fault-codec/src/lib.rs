//! # fault-codec
//!
//! SOAP fault serialization for the two incompatible fault wire formats,
//! SOAP 1.1 and SOAP 1.2, over an [`xmltree`] element tree.
//!
//! A protocol-neutral [`FaultValue`] is converted to and from the fault XML
//! fragment by the codec matching the active protocol version. Both codecs
//! implement the same [`FaultCodec`] contract; the surrounding serializer
//! picks one per exchange and hands it the value, the target namespace and
//! the parent element to append to.
//!
//! ## Usage
//!
//! ```rust
//! use fault_codec::{FaultCodec, FaultValue, Soap12FaultCodec};
//! use xmltree::Element;
//!
//! let fault = FaultValue::new(
//!     "{http://www.w3.org/2003/05/soap-envelope}Sender",
//!     "Bad input",
//!     "",
//! );
//! let mut body = Element::new("Body");
//! Soap12FaultCodec::new()
//!     .serialize(&fault, "urn:example", &mut body, None)
//!     .unwrap();
//! ```

pub mod codec;
pub mod error;
pub mod qname;
pub mod schema;
pub mod soap11;
pub mod soap12;
pub mod value;

// Re-export the working set for convenient top-level access
pub use codec::{FaultCodec, FAULT_TYPE_NAME};
pub use error::{FaultError, FaultResult};
pub use schema::{SchemaRegistry, SchemaTable};
pub use soap11::Soap11FaultCodec;
pub use soap12::Soap12FaultCodec;
pub use value::{FaultValue, DEFAULT_FAULT_CODE};
