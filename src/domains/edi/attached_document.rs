use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::warn;

/// Whether the attached document (base64 XML) references `number_formatted`
/// as its parent document. Undecodable content never matches.
pub fn is_attached_document_matched(attached_document_base64: &str, number_formatted: &str) -> bool {
    let bytes = match STANDARD.decode(attached_document_base64.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Documento adjunto no es base64 válido: {}", e);
            return false;
        }
    };

    let needle = format!("<cbc:ParentDocumentID>{}</cbc:ParentDocumentID>", number_formatted);
    String::from_utf8_lossy(&bytes)
        .lines()
        .any(|line| line.contains(&needle))
}
