pub mod callback;
pub mod forwarder;
pub mod signer;
pub mod transport;

pub use callback::CallbackVerifier;
pub use forwarder::{Forwarder, WebhookRoute, join_url};
pub use signer::{SIGNATURE_HEADER, canonical_json, sign_payload, signatures_match};
pub use transport::{ReqwestTransport, Transport, TransportResponse, UPSTREAM_TIMEOUT};
