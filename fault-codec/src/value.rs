//! The in-memory fault representation shared by both protocol versions

/// Fault code used when the application supplies none.
pub const DEFAULT_FAULT_CODE: &str = "Server";

/// A protocol-neutral SOAP fault.
///
/// One `FaultValue` describes a fault for either wire format. SOAP 1.1 uses
/// only `primary_code`, `reason` and `detail`; SOAP 1.2 additionally nests
/// `subcodes` inside the fault's `Code` element, outermost first.
///
/// Values are built once, by application code raising a fault or by a
/// codec's deserialize, and only borrowed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultValue {
    /// Primary fault code (`faultcode` / `Code/Value`). A qualified name in
    /// Clark notation (`{ns}local`), a prefixed QName, or a plain token.
    pub primary_code: String,
    /// SOAP 1.2 subcode chain, in nesting order. Empty for SOAP 1.1.
    pub subcodes: Vec<String>,
    /// Human-readable message (`faultstring` / `Reason/Text`).
    pub reason: String,
    /// Free-text diagnostic payload, or an opaque XML blob when a SOAP 1.1
    /// `detail` element carried structured content.
    pub detail: String,
}

impl FaultValue {
    /// Create a fault with a single code and no subcodes.
    pub fn new(
        primary_code: impl Into<String>,
        reason: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            primary_code: primary_code.into(),
            subcodes: Vec::new(),
            reason: reason.into(),
            detail: detail.into(),
        }
    }

    /// Create a fault from an ordered code chain.
    ///
    /// The first entry becomes `primary_code` and the remainder become
    /// `subcodes`, preserving order. An empty chain falls back to
    /// [`DEFAULT_FAULT_CODE`]. This mirrors the convenience convention of
    /// supplying the whole Code/Subcode chain as one sequence.
    pub fn from_code_chain(
        codes: Vec<String>,
        reason: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        let mut codes = codes.into_iter();
        let primary_code = codes.next().unwrap_or_else(|| DEFAULT_FAULT_CODE.to_string());
        Self {
            primary_code,
            subcodes: codes.collect(),
            reason: reason.into(),
            detail: detail.into(),
        }
    }

    /// Attach a subcode chain to this fault.
    pub fn with_subcodes(mut self, subcodes: Vec<String>) -> Self {
        self.subcodes = subcodes;
        self
    }
}

impl Default for FaultValue {
    fn default() -> Self {
        Self::new(DEFAULT_FAULT_CODE, "", "")
    }
}
