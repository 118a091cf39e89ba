use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::{CustomerType, OrderStatus, PaymentMethod};

/// One customer's package purchase. Anchor for both contract documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Full name in a single column; the resolver splits it on the first space.
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub customer_tc_no: Option<String>,
    pub customer_address: Option<String>,
    pub customer_city: Option<String>,
    pub customer_postal_code: Option<String>,
    pub customer_type: CustomerType,
    pub company_name: Option<String>,
    pub tax_no: Option<String>,
    pub tax_office: Option<String>,
    pub package_name: String,
    pub package_price: f64,
    pub package_original_price: Option<f64>,
    pub package_type: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub status: OrderStatus,
    pub created_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
    pub contract: ContractColumns,
}

/// Contract fields stored on the order row. All NULL until the first dispatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractColumns {
    pub pre_info_document: Option<String>,
    pub distance_sales_document: Option<String>,
    pub generated_at: Option<String>,
    pub client_ip: Option<String>,
}

/// Fields needed to create an order (checkout or admin "new order").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub customer_tc_no: Option<String>,
    pub customer_address: Option<String>,
    pub customer_city: Option<String>,
    pub customer_postal_code: Option<String>,
    pub customer_type: CustomerType,
    pub company_name: Option<String>,
    pub tax_no: Option<String>,
    pub tax_office: Option<String>,
    pub package_name: String,
    pub package_price: f64,
    pub package_original_price: Option<f64>,
    pub package_type: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub status: OrderStatus,
    pub client_ip: Option<String>,
}
