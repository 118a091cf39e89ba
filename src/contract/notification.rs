//! Customer notification carrying both contract documents.

use super::email::{EmailAttachment, OutboundEmail};
use super::sanitize::{escape_html, format_price};
use super::seller::SELLER;
use super::types::ContractInput;
use crate::models::DocumentKind;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Fixed recipients besides the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    pub sender: String,
    pub sales_cc: String,
    pub general_bcc: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            sender: "Uzman Randevu <siparis@uzmanrandevu.com.tr>".into(),
            sales_cc: "satis@uzmanrandevu.com.tr".into(),
            general_bcc: "info@uzmanrandevu.com.tr".into(),
        }
    }
}

pub fn subject(input: &ContractInput) -> String {
    format!("Sipariş Sözleşmeleriniz - {}", input.package.name)
}

/// Builds the message. `documents` pairs each kind with its base64 PDF.
pub fn compose(
    config: &NotificationConfig,
    input: &ContractInput,
    documents: &[(DocumentKind, &str)],
) -> OutboundEmail {
    let attachments = documents
        .iter()
        .map(|(kind, content)| EmailAttachment {
            filename: kind.filename().to_string(),
            content_base64: content.to_string(),
            mime_type: PDF_MIME_TYPE.to_string(),
        })
        .collect();

    OutboundEmail {
        sender: config.sender.clone(),
        to: vec![input.customer.email.clone()],
        cc: non_blank(&config.sales_cc),
        bcc: non_blank(&config.general_bcc),
        subject: subject(input),
        html_body: html_body(input),
        attachments,
    }
}

fn non_blank(address: &str) -> Vec<String> {
    if address.trim().is_empty() {
        Vec::new()
    } else {
        vec![address.trim().to_string()]
    }
}

fn html_body(input: &ContractInput) -> String {
    let name = escape_html(&input.customer.full_name());
    let package = escape_html(&input.package.name);
    let total = escape_html(&format_price(input.package.price));
    let payment = escape_html(input.payment_method.label());
    let seller = escape_html(SELLER.trade_name);

    format!(
        "<div style=\"font-family:Arial,sans-serif;font-size:14px;color:#222\">\
<p>Sayın {name},</p>\
<p><strong>{package}</strong> siparişiniz alınmıştır. Siparişinize ait Ön Bilgilendirme \
Formu ve Mesafeli Satış Sözleşmesi bu e-postanın ekinde yer almaktadır.</p>\
<table style=\"border-collapse:collapse\">\
<tr><td style=\"padding:4px 12px 4px 0\">Hizmet Paketi</td><td>{package}</td></tr>\
<tr><td style=\"padding:4px 12px 4px 0\">Toplam Tutar</td><td>{total}</td></tr>\
<tr><td style=\"padding:4px 12px 4px 0\">Ödeme Şekli</td><td>{payment}</td></tr>\
</table>\
<p>Sorularınız için {phone} numaralı telefondan veya {email} adresinden bize ulaşabilirsiniz.</p>\
<p>Saygılarımızla,<br>{seller}</p>\
</div>",
        phone = escape_html(SELLER.phone),
        email = escape_html(SELLER.email),
    )
}
