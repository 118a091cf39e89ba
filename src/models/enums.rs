use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(CustomerType {
    Individual => "individual",
    Company => "company",
});

str_enum!(PaymentMethod {
    BankTransfer => "bank_transfer",
    CreditCard => "credit_card",
});

str_enum!(OrderStatus {
    Pending => "pending",
    Approved => "approved",
    Completed => "completed",
    Cancelled => "cancelled",
});

str_enum!(DocumentKind {
    PreInfo => "pre_info",
    DistanceSales => "distance_sales",
});

impl Default for CustomerType {
    fn default() -> Self {
        Self::Individual
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        Self::BankTransfer
    }
}

impl PaymentMethod {
    /// Label printed on the contracts and in the notification email.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BankTransfer => "Havale / EFT",
            Self::CreditCard => "Kredi Kartı",
        }
    }
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 2] = [DocumentKind::PreInfo, DocumentKind::DistanceSales];

    pub fn title(&self) -> &'static str {
        match self {
            Self::PreInfo => "ÖN BİLGİLENDİRME FORMU",
            Self::DistanceSales => "MESAFELİ SATIŞ SÖZLEŞMESİ",
        }
    }

    /// Attachment filename used when the document is mailed.
    pub fn filename(&self) -> &'static str {
        match self {
            Self::PreInfo => "on-bilgilendirme-formu.pdf",
            Self::DistanceSales => "mesafeli-satis-sozlesmesi.pdf",
        }
    }
}
