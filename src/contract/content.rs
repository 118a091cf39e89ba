//! Content model: order data → ordered list of typed blocks.
//!
//! Builders here decide *what* goes on the page and in which order; the
//! layout engine decides *where*. Both document kinds share the same block
//! vocabulary so one pagination engine serves both.

use chrono::{Local, NaiveDateTime};

use super::classify::{classify_legal_text, LegalLine, LineClass};
use super::sanitize::{format_price, or_placeholder, NOT_SPECIFIED};
use super::seller::SELLER;
use super::types::ContractInput;
use crate::models::{CustomerType, DocumentKind};

/// Heading used when no pre-info template is configured.
pub const DEFAULT_PRE_INFO_HEADING: &str = "ÖN BİLGİLENDİRME FORMU";

pub const ACCEPTANCE_TEXT: &str = "İşbu belgede yer alan tüm bilgileri okuduğumu, anladığımı ve \
elektronik ortamda onayladığımı kabul ve beyan ederim. Onay tarihi ve IP adresi aşağıda \
kayıt altına alınmıştır.";

const GENERAL_TERMS: [&str; 5] = [
    "1. Alıcı, hizmet paketine ilişkin ön bilgilendirme formunu okuyup bilgi sahibi olduğunu ve elektronik ortamda gerekli onayı verdiğini kabul eder.",
    "2. Hizmet, satın alma tarihinden itibaren paket kapsamında belirtilen uzman hekim ve kurumlar aracılığıyla randevu usulü ile sunulur.",
    "3. Alıcı, randevusunu en geç 24 saat öncesine kadar ücretsiz olarak iptal edebilir veya erteleyebilir.",
    "4. Hizmetin ifasına alıcının onayı ile başlanmış ise cayma hakkı kullanılamaz; başlanmamış ise 14 gün içinde cayma hakkı kullanılabilir.",
    "5. Uyuşmazlıklarda Ticaret Bakanlığınca ilan edilen parasal sınırlar dahilinde tüketici hakem heyetleri ve tüketici mahkemeleri yetkilidir.",
];

const ARTICLES: &[(&str, &[&str])] = &[
    (
        "MADDE 1 - TARAFLAR",
        &[
            "1.1 İşbu sözleşme, aşağıda bilgileri yer alan SATICI ile ALICI arasında, ALICI'nın elektronik ortamda verdiği onay ile kurulmuştur.",
            "1.2 ALICI, sözleşme konusu hizmetin temel nitelikleri, satış fiyatı, ödeme şekli ve ifaya ilişkin ön bilgileri okuyarak bilgi sahibi olduğunu kabul eder.",
        ],
    ),
    (
        "MADDE 2 - SÖZLEŞMENİN KONUSU VE KAPSAMI",
        &[
            "2.1 Sözleşmenin konusu, ALICI'nın SATICI'ya ait internet sitesi üzerinden elektronik ortamda satın aldığı sağlık hizmeti paketinin satışı ve ifasına ilişkin tarafların hak ve yükümlülüklerinin belirlenmesidir.",
            "2.2 Taraflar, 6502 sayılı Tüketicinin Korunması Hakkında Kanun ve Mesafeli Sözleşmeler Yönetmeliği hükümleri uyarınca işbu sözleşmeden doğan hak ve yükümlülüklerini kabul eder.",
            "2.3 Paket kapsamındaki muayene ve tetkikler, randevu tarihinde ilgili sağlık kuruluşunda bizzat ALICI'ya sunulur; hizmetin tıbbi içeriğinden hizmeti veren sağlık kuruluşu sorumludur.",
        ],
    ),
    (
        "MADDE 3 - YÜRÜRLÜK",
        &[
            "3.1 İşbu sözleşme, ALICI tarafından elektronik ortamda onaylandığı tarihte yürürlüğe girer ve bir nüshası ALICI'nın e-posta adresine gönderilir.",
        ],
    ),
];

/// Text styles available to text blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Legal(LineClass),
    Paragraph,
    Note,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub label: String,
    pub value: String,
}

impl PanelRow {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Seller header box at the top of the first page.
    Header {
        company: String,
        lines: Vec<String>,
        title: String,
    },
    /// Coloured section banner.
    Banner { text: String },
    /// Bordered label/value panel.
    Panel { rows: Vec<PanelRow> },
    Text { text: String, style: TextStyle },
    /// Vertical space in millimetres.
    Gap(f32),
    PageBreak,
}

/// Values that change on every render and are excluded from determinism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStamp {
    pub rendered_at: NaiveDateTime,
}

impl RenderStamp {
    pub fn now() -> Self {
        Self {
            rendered_at: Local::now().naive_local(),
        }
    }

    pub fn formatted(&self) -> String {
        self.rendered_at.format("%d.%m.%Y %H:%M:%S").to_string()
    }
}

pub fn build_blocks(
    kind: DocumentKind,
    input: &ContractInput,
    legal_text: Option<&str>,
    stamp: &RenderStamp,
) -> Vec<Block> {
    match kind {
        DocumentKind::PreInfo => pre_info_blocks(input, legal_text, stamp),
        DocumentKind::DistanceSales => distance_sales_blocks(input, stamp),
    }
}

/// Header → Customer → Package → legal body → acceptance page.
pub fn pre_info_blocks(
    input: &ContractInput,
    legal_text: Option<&str>,
    stamp: &RenderStamp,
) -> Vec<Block> {
    let mut blocks = vec![header(DocumentKind::PreInfo)];

    blocks.push(banner("ALICI BİLGİLERİ"));
    blocks.push(Block::Panel {
        rows: customer_rows(input),
    });
    blocks.push(Block::Gap(4.0));

    blocks.push(banner("HİZMET PAKETİ BİLGİLERİ"));
    blocks.push(Block::Panel {
        rows: package_rows(input),
    });
    blocks.push(Block::Gap(6.0));

    let legal_lines = legal_text.map(classify_legal_text).unwrap_or_default();
    if legal_lines.is_empty() {
        blocks.push(Block::Text {
            text: DEFAULT_PRE_INFO_HEADING.to_string(),
            style: TextStyle::Legal(LineClass::MainTitle),
        });
    } else {
        for line in legal_lines {
            match line {
                LegalLine::Blank => blocks.push(Block::Gap(BLANK_LINE_GAP_MM)),
                LegalLine::Text { class, text } => blocks.push(Block::Text {
                    text,
                    style: TextStyle::Legal(class),
                }),
            }
        }
    }

    blocks.push(Block::PageBreak);
    blocks.extend(acceptance_blocks(input, stamp));
    blocks
}

/// Header → Seller → Buyer → Subject → General terms → (new page) Articles → acceptance.
pub fn distance_sales_blocks(input: &ContractInput, stamp: &RenderStamp) -> Vec<Block> {
    let mut blocks = vec![header(DocumentKind::DistanceSales)];

    blocks.push(banner("SATICI BİLGİLERİ"));
    blocks.push(Block::Panel { rows: seller_rows() });
    blocks.push(Block::Gap(4.0));

    blocks.push(banner("ALICI BİLGİLERİ"));
    blocks.push(Block::Panel {
        rows: customer_rows(input),
    });
    blocks.push(Block::Gap(4.0));

    blocks.push(banner("SÖZLEŞME KONUSU HİZMET"));
    blocks.push(Block::Panel {
        rows: package_rows(input),
    });
    blocks.push(Block::Gap(4.0));

    blocks.push(banner("GENEL HÜKÜMLER"));
    for term in GENERAL_TERMS {
        blocks.push(Block::Text {
            text: term.to_string(),
            style: TextStyle::Paragraph,
        });
    }

    blocks.push(Block::PageBreak);
    for (title, paragraphs) in ARTICLES {
        blocks.push(Block::Text {
            text: (*title).to_string(),
            style: TextStyle::Legal(LineClass::ArticleTitle),
        });
        for paragraph in *paragraphs {
            blocks.push(Block::Text {
                text: (*paragraph).to_string(),
                style: TextStyle::Legal(LineClass::SubArticle),
            });
        }
        blocks.push(Block::Gap(BLANK_LINE_GAP_MM));
    }

    blocks.push(Block::Gap(4.0));
    blocks.extend(acceptance_blocks(input, stamp));
    blocks
}

/// Gap emitted for a blank line of legal text.
pub const BLANK_LINE_GAP_MM: f32 = 2.5;

fn header(kind: DocumentKind) -> Block {
    Block::Header {
        company: SELLER.trade_name.to_string(),
        lines: vec![
            SELLER.address.to_string(),
            format!("Tel: {}  |  E-posta: {}", SELLER.phone, SELLER.email),
            format!("Web: {}  |  MERSİS: {}", SELLER.website, SELLER.mersis_no),
        ],
        title: kind.title().to_string(),
    }
}

fn banner(text: &str) -> Block {
    Block::Banner {
        text: text.to_string(),
    }
}

fn seller_rows() -> Vec<PanelRow> {
    vec![
        PanelRow::new("Ünvan", SELLER.trade_name),
        PanelRow::new("Adres", SELLER.address),
        PanelRow::new("Telefon", SELLER.phone),
        PanelRow::new("E-posta", SELLER.email),
        PanelRow::new(
            "Vergi Dairesi / No",
            format!("{} / {}", SELLER.tax_office, SELLER.tax_no),
        ),
        PanelRow::new("MERSİS No", SELLER.mersis_no),
    ]
}

fn customer_rows(input: &ContractInput) -> Vec<PanelRow> {
    let customer = &input.customer;
    let full_name = customer.full_name();

    let mut rows = vec![
        PanelRow::new("Ad Soyad", or_placeholder(Some(full_name.as_str()))),
        PanelRow::new("T.C. Kimlik No", or_placeholder(customer.tc_no.as_deref())),
        PanelRow::new("E-posta", or_placeholder(Some(customer.email.as_str()))),
        PanelRow::new("Telefon", or_placeholder(customer.phone.as_deref())),
        PanelRow::new("Adres", address_line(input)),
    ];

    if customer.customer_type == CustomerType::Company {
        rows.push(PanelRow::new(
            "Firma Ünvanı",
            or_placeholder(customer.company_name.as_deref()),
        ));
        rows.push(PanelRow::new(
            "Vergi Dairesi",
            or_placeholder(customer.tax_office.as_deref()),
        ));
        rows.push(PanelRow::new("Vergi No", or_placeholder(customer.tax_no.as_deref())));
    }
    rows
}

fn address_line(input: &ContractInput) -> String {
    let customer = &input.customer;
    let Some(address) = customer.address.as_deref().filter(|a| !a.trim().is_empty()) else {
        return NOT_SPECIFIED.to_string();
    };
    let locality = [customer.postal_code.as_deref(), customer.city.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if locality.is_empty() {
        address.trim().to_string()
    } else {
        format!("{}, {locality}", address.trim())
    }
}

fn package_rows(input: &ContractInput) -> Vec<PanelRow> {
    let package = &input.package;
    let mut rows = vec![PanelRow::new(
        "Hizmet Paketi",
        or_placeholder(Some(package.name.as_str())),
    )];
    if let (Some(original), Some(discount)) = (package.original_price, package.discount()) {
        rows.push(PanelRow::new("Liste Fiyatı", format_price(original)));
        rows.push(PanelRow::new("İndirim", format_price(discount)));
    }
    rows.push(PanelRow::new("Toplam Tutar (KDV Dahil)", format_price(package.price)));
    rows.push(PanelRow::new("Ödeme Şekli", input.payment_method.label()));
    rows
}

fn acceptance_blocks(input: &ContractInput, stamp: &RenderStamp) -> Vec<Block> {
    vec![
        banner("ONAY VE KABUL"),
        Block::Text {
            text: ACCEPTANCE_TEXT.to_string(),
            style: TextStyle::Paragraph,
        },
        Block::Gap(3.0),
        Block::Panel {
            rows: vec![
                PanelRow::new("Onay Tarihi", stamp.formatted()),
                PanelRow::new("IP Adresi", input.client_ip.clone()),
                PanelRow::new(
                    "Onaylayan",
                    or_placeholder(Some(input.customer.full_name().as_str())),
                ),
            ],
        },
        Block::Text {
            text: "Bu belge elektronik ortamda oluşturulmuştur ve imza gerektirmez.".to_string(),
            style: TextStyle::Note,
        },
    ]
}

/// Classified legal lines in document order; the basis for determinism checks.
pub fn classified_lines(blocks: &[Block]) -> Vec<(LineClass, String)> {
    blocks
        .iter()
        .filter_map(|block| match block {
            Block::Text {
                text,
                style: TextStyle::Legal(class),
            } => Some((*class, text.clone())),
            _ => None,
        })
        .collect()
}
