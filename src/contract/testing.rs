//! Shared fixtures for the pipeline tests.

use std::sync::{Arc, Mutex};

use base64::Engine;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;

use super::content::RenderStamp;
use super::renderer::{ContractRenderer, RenderedDocument};
use super::store::{self, ContractBlobs};
use super::types::{ContractInput, CustomerData, PackageData};
use super::ContractError;
use crate::models::{CustomerType, DocumentKind, PaymentMethod};

pub fn sample_input() -> ContractInput {
    ContractInput {
        customer: CustomerData {
            name: "Ayşe".into(),
            surname: "Yılmaz".into(),
            email: "ayse@example.com".into(),
            phone: Some("+90 532 000 00 00".into()),
            tc_no: Some("12345678901".into()),
            address: Some("Bağdat Cad. No:10".into()),
            city: Some("İstanbul".into()),
            postal_code: Some("34710".into()),
            customer_type: CustomerType::Individual,
            company_name: None,
            tax_no: None,
            tax_office: None,
        },
        package: PackageData {
            name: "Kardiyoloji Check-up".into(),
            price: 1250.0,
            original_price: Some(1500.0),
        },
        payment_method: PaymentMethod::CreditCard,
        client_ip: "203.0.113.7".into(),
    }
}

pub fn sample_stamp() -> RenderStamp {
    RenderStamp {
        rendered_at: NaiveDate::from_ymd_opt(2026, 3, 15)
            .and_then(|d| d.and_hms_opt(14, 30, 0))
            .unwrap(),
    }
}

/// Rich-text template with `articles` numbered articles, each with two
/// sub-articles and a body paragraph.
pub fn long_legal_text(articles: usize) -> String {
    let mut html = String::from("<h1>ÖN BİLGİLENDİRME FORMU</h1>\n");
    for n in 1..=articles {
        html.push_str(&format!("<p>{n}. Madde başlığı {n}</p>\n"));
        html.push_str(&format!(
            "<p>{n}.1 Alıcı, hizmetin temel niteliklerini ve fiyatını okuduğunu kabul eder.</p>\n"
        ));
        html.push_str(&format!(
            "<p>{n}.2 Satıcı, hizmeti randevu tarihinde eksiksiz sunmayı taahhüt eder.</p>\n"
        ));
        html.push_str(
            "<p>Bu madde kapsamındaki hak ve yükümlülükler, yürürlükteki mevzuat \
             hükümleri çerçevesinde yorumlanır ve uygulanır.</p>\n<br>\n",
        );
    }
    html
}

/// Renderer that returns fixed bytes per kind and records each call.
#[derive(Clone, Default)]
pub struct CountingRenderer {
    calls: Arc<Mutex<Vec<(DocumentKind, Option<String>)>>>,
    stamps: Arc<Mutex<Vec<NaiveDateTime>>>,
    fail: bool,
}

impl CountingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn bytes_for(kind: DocumentKind) -> Vec<u8> {
        format!("%PDF-mock-{}", kind.as_str()).into_bytes()
    }

    pub fn base64_for(kind: DocumentKind) -> String {
        base64::engine::general_purpose::STANDARD.encode(Self::bytes_for(kind))
    }

    pub fn render_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Legal text received per call, in call order.
    pub fn legal_texts(&self) -> Vec<(DocumentKind, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stamps(&self) -> Vec<NaiveDateTime> {
        self.stamps.lock().unwrap().clone()
    }
}

impl ContractRenderer for CountingRenderer {
    fn render(
        &self,
        kind: DocumentKind,
        _input: &ContractInput,
        legal_text: Option<&str>,
        stamp: &RenderStamp,
    ) -> Result<RenderedDocument, ContractError> {
        self.stamps.lock().unwrap().push(stamp.rendered_at);
        self.calls
            .lock()
            .unwrap()
            .push((kind, legal_text.map(str::to_string)));
        if self.fail {
            return Err(ContractError::Render("mock render failure".into()));
        }
        Ok(RenderedDocument {
            kind,
            bytes: Self::bytes_for(kind),
            page_count: 1,
        })
    }
}

/// On its first call, stores a competing pair through a second connection,
/// as a parallel dispatch for the same order would.
pub struct RacingRenderer {
    conn: Mutex<Option<Connection>>,
    order_id: String,
}

impl RacingRenderer {
    pub const WINNER_PRE_INFO: &'static str = "V0lOTkVSLVBSRQ==";
    pub const WINNER_DISTANCE_SALES: &'static str = "V0lOTkVSLURT";

    pub fn new(conn: Connection, order_id: &str) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
            order_id: order_id.to_string(),
        }
    }
}

impl ContractRenderer for RacingRenderer {
    fn render(
        &self,
        kind: DocumentKind,
        _input: &ContractInput,
        _legal_text: Option<&str>,
        _stamp: &RenderStamp,
    ) -> Result<RenderedDocument, ContractError> {
        if let Some(conn) = self.conn.lock().unwrap().take() {
            let winner = ContractBlobs {
                pre_info: Self::WINNER_PRE_INFO.into(),
                distance_sales: Self::WINNER_DISTANCE_SALES.into(),
                generated_at: "2026-03-15 14:29:59.999".into(),
                client_ip: "198.51.100.20".into(),
            };
            store::save(&conn, &self.order_id, &winner, None).unwrap();
        }
        Ok(RenderedDocument {
            kind,
            bytes: CountingRenderer::bytes_for(kind),
            page_count: 1,
        })
    }
}
