use base64::Engine;

use super::content::{build_blocks, RenderStamp};
use super::layout::{paginate, DocumentLayout};
use super::pdf::write_pdf;
use super::types::ContractInput;
use super::ContractError;
use crate::models::DocumentKind;

/// PDF bytes for one `(order, kind)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl RenderedDocument {
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

/// Turns order data into a finished document.
///
/// `legal_text` is only read for `DocumentKind::PreInfo`. Implementations
/// must not fail on missing optional customer fields.
pub trait ContractRenderer: Send + Sync {
    fn render(
        &self,
        kind: DocumentKind,
        input: &ContractInput,
        legal_text: Option<&str>,
        stamp: &RenderStamp,
    ) -> Result<RenderedDocument, ContractError>;
}

/// Content model → pagination → printpdf.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfContractRenderer;

impl ContractRenderer for PdfContractRenderer {
    fn render(
        &self,
        kind: DocumentKind,
        input: &ContractInput,
        legal_text: Option<&str>,
        stamp: &RenderStamp,
    ) -> Result<RenderedDocument, ContractError> {
        let layout = layout_document(kind, input, legal_text, stamp);
        let bytes = write_pdf(&layout, kind.title())?;
        tracing::debug!(
            kind = kind.as_str(),
            pages = layout.page_count(),
            bytes = bytes.len(),
            "Contract document rendered"
        );
        Ok(RenderedDocument {
            kind,
            bytes,
            page_count: layout.page_count(),
        })
    }
}

/// Page layout without painting. Used for structure checks.
pub fn layout_document(
    kind: DocumentKind,
    input: &ContractInput,
    legal_text: Option<&str>,
    stamp: &RenderStamp,
) -> DocumentLayout {
    let legal_text = match kind {
        DocumentKind::PreInfo => legal_text,
        DocumentKind::DistanceSales => None,
    };
    paginate(&build_blocks(kind, input, legal_text, stamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::testing::{long_legal_text, sample_input, sample_stamp};

    #[test]
    fn renders_both_kinds() {
        let renderer = PdfContractRenderer;
        for kind in DocumentKind::ALL {
            let doc = renderer
                .render(kind, &sample_input(), None, &sample_stamp())
                .unwrap();
            assert_eq!(doc.kind, kind);
            assert!(doc.bytes.starts_with(b"%PDF"));
            assert!(doc.page_count >= 1);
        }
    }

    #[test]
    fn missing_optional_fields_still_render() {
        let mut input = sample_input();
        input.customer.phone = None;
        input.customer.address = None;
        input.customer.city = None;
        input.customer.postal_code = None;
        input.customer.tc_no = None;
        let doc = PdfContractRenderer
            .render(DocumentKind::PreInfo, &input, None, &sample_stamp())
            .unwrap();
        assert!(doc.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_template_gives_multiple_pages() {
        let legal = long_legal_text(120);
        let doc = PdfContractRenderer
            .render(DocumentKind::PreInfo, &sample_input(), Some(&legal), &sample_stamp())
            .unwrap();
        assert!(doc.page_count >= 2);
    }

    #[test]
    fn distance_sales_ignores_legal_text() {
        let legal = long_legal_text(120);
        let input = sample_input();
        let with =
            layout_document(DocumentKind::DistanceSales, &input, Some(&legal), &sample_stamp());
        let without = layout_document(DocumentKind::DistanceSales, &input, None, &sample_stamp());
        assert_eq!(with, without);
    }

    #[test]
    fn base64_encoding() {
        let doc = RenderedDocument {
            kind: DocumentKind::PreInfo,
            bytes: b"%PDF-1.3".to_vec(),
            page_count: 1,
        };
        assert_eq!(doc.to_base64(), "JVBERi0xLjM=");
    }
}
