//! Filegate Processing Library
//!
//! Static file checks (MIME type, size, byte signatures), the validation
//! pipeline that sequences them with plugin steps, and output handling.

pub mod checksum;
pub mod mime;
pub mod output;
pub mod pipeline;
pub mod signature;
pub mod validator;

pub use checksum::sha256_base64;
pub use mime::{ContentSniffer, MimeDetector};
pub use pipeline::{PipelineBuilder, Stage, ValidationPipeline};
pub use signature::{footer_matches, header_matches, magic_bytes_present};
pub use validator::Rejection;
