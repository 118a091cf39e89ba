//! Fixed legal-entity data of the marketplace operator (the seller).

pub struct SellerInfo {
    pub trade_name: &'static str,
    pub address: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub website: &'static str,
    pub mersis_no: &'static str,
    pub tax_office: &'static str,
    pub tax_no: &'static str,
}

pub const SELLER: SellerInfo = SellerInfo {
    trade_name: "Uzman Randevu Sağlık Hizmetleri A.Ş.",
    address: "Barbaros Mah. Begonya Sok. No:3 Kat:4, Ataşehir / İstanbul",
    phone: "+90 216 555 00 00",
    email: "destek@uzmanrandevu.com.tr",
    website: "www.uzmanrandevu.com.tr",
    mersis_no: "0123456789000015",
    tax_office: "Ataşehir",
    tax_no: "1234567890",
};
